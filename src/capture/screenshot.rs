//! Full-screen capture of the primary monitor using xcap.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xcap::Monitor;

use crate::error::{PipelineError, PipelineResult};

/// Produces the raw screenshot a pipeline run starts from.
pub trait ScreenSource: Send {
    /// Grabs the screen and writes it to `dest`.
    fn grab(&mut self, dest: &Path) -> PipelineResult<()>;
}

/// Captures the primary monitor in absolute screen coordinates.
#[derive(Debug, Default)]
pub struct PrimaryMonitor;

impl ScreenSource for PrimaryMonitor {
    fn grab(&mut self, dest: &Path) -> PipelineResult<()> {
        info!("Generate screenshot at {}", dest.display());

        let monitors = Monitor::all().map_err(|e| PipelineError::capture_io(dest, e))?;
        let monitor = monitors
            .iter()
            .find(|m| m.is_primary())
            .or_else(|| monitors.first())
            .ok_or_else(|| PipelineError::capture_io(dest, "no monitors found"))?;

        let image = monitor
            .capture_image()
            .map_err(|e| PipelineError::capture_io(dest, e))?;
        if image.width() == 0 || image.height() == 0 {
            return Err(PipelineError::capture_io(dest, "captured empty screenshot"));
        }
        debug!("Captured {}x{}", image.width(), image.height());

        image
            .save(dest)
            .map_err(|e| PipelineError::capture_io(dest, e))?;
        Ok(())
    }
}

/// Copies an existing image instead of grabbing the screen. Used to replay
/// saved screenshots through the pipeline.
#[derive(Debug, Clone)]
pub struct ImageFile {
    source: PathBuf,
}

impl ImageFile {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl ScreenSource for ImageFile {
    fn grab(&mut self, dest: &Path) -> PipelineResult<()> {
        info!("Using {} as screenshot", self.source.display());
        std::fs::copy(&self.source, dest)
            .map_err(|e| PipelineError::capture_io(&self.source, e))?;
        Ok(())
    }
}
