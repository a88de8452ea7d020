//! Capture session: validated startup data plus the running worker.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::info;

use crate::capture::ScreenSource;
use crate::config::AppConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logline::{LogLinePatternMatcher, PatternRegistry};
use crate::ocr::{ImagePreprocessor, OcrInvoker};
use crate::pipeline::coordinator::ValidationCoordinator;
use crate::pipeline::messages::{create_channels, ShellChannels};
use crate::pipeline::sink::LogConcatenator;
use crate::pipeline::validator::Validator;
use crate::reference::ProvinceList;

/// Immutable inputs shared by every run of a session.
#[derive(Clone, Debug)]
pub struct CaptureSession {
    config: AppConfig,
    provinces: Arc<ProvinceList>,
    registry: Arc<PatternRegistry>,
    tesseract: PathBuf,
    runs_dir: PathBuf,
}

impl CaptureSession {
    /// Fails with `PipelineError::Initialization` when the province list
    /// is empty; no capture may start without it.
    pub fn new(
        config: AppConfig,
        provinces: Arc<ProvinceList>,
        registry: Arc<PatternRegistry>,
        tesseract: PathBuf,
        runs_dir: PathBuf,
    ) -> PipelineResult<Self> {
        provinces.ensure_ready()?;
        if registry.is_empty() {
            return Err(PipelineError::Initialization(
                "no event patterns registered".to_string(),
            ));
        }

        Ok(Self {
            config,
            provinces,
            registry,
            tesseract,
            runs_dir,
        })
    }

    pub fn provinces(&self) -> &ProvinceList {
        &self.provinces
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Spawns the single capture worker and returns the shell's channel
    /// ends together with the worker's join handle.
    pub fn start(
        &self,
        screen: Box<dyn ScreenSource>,
        validator: Box<dyn Validator>,
    ) -> (ShellChannels, JoinHandle<()>) {
        let (shell, worker) = create_channels();

        let coordinator = ValidationCoordinator::new(
            screen,
            ImagePreprocessor::new(self.config.capture_region, self.config.preprocess.clone()),
            OcrInvoker::new(&self.tesseract, self.runs_dir.join("ocr_output")),
            LogLinePatternMatcher::new(Arc::clone(&self.registry)),
            LogConcatenator::new(&self.config.concatenated_log_path),
            self.runs_dir.clone(),
            worker.events,
            worker.corrections,
        )
        .with_validator(validator);

        info!(
            "Starting capture worker ({} provinces, {} event patterns)",
            self.provinces.len(),
            self.registry.len()
        );
        let triggers = worker.triggers;
        let handle = thread::spawn(move || {
            super::worker::run_capture_worker(triggers, coordinator);
        });

        (shell, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ImageFile;
    use crate::pipeline::messages::{ShellEvent, TriggerSource};
    use crate::pipeline::validator::OperatorApproval;
    use tempfile::tempdir;

    fn registry() -> Arc<PatternRegistry> {
        Arc::new(PatternRegistry::with_defaults(&[]).unwrap())
    }

    #[test]
    fn test_empty_province_list_refuses_session() {
        let result = CaptureSession::new(
            AppConfig::default(),
            Arc::new(ProvinceList::default()),
            registry(),
            PathBuf::from("tesseract"),
            PathBuf::from("runs"),
        );

        assert!(matches!(result, Err(PipelineError::Initialization(_))));
    }

    #[test]
    fn test_session_runs_triggers_on_worker() {
        let dir = tempdir().unwrap();
        let session = CaptureSession::new(
            AppConfig::default(),
            Arc::new(ProvinceList::new(vec!["France".to_string()])),
            registry(),
            PathBuf::from("tesseract"),
            dir.path().join("runs"),
        )
        .unwrap();

        let (shell, handle) = session.start(
            Box::new(ImageFile::new(dir.path().join("missing.png"))),
            Box::new(OperatorApproval),
        );
        shell.triggers.send(TriggerSource::Shortcut).unwrap();
        drop(shell.triggers);
        handle.join().unwrap();

        let events: Vec<ShellEvent> = shell.events.try_iter().collect();
        assert!(matches!(events.first(), Some(ShellEvent::Status(s)) if s == "Generating screenshot"));
        assert!(matches!(events.last(), Some(ShellEvent::RunFailed { run_id: 1, .. })));
    }
}
