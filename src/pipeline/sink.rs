//! Append-only concatenation of validated log blocks.
//!
//! The file is opened in append mode for each block, so blocks written by
//! earlier runs survive a crash mid-run.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

#[derive(Clone, Debug)]
pub struct LogConcatenator {
    path: PathBuf,
}

impl LogConcatenator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one validated block under a `=== <timestamp> run <id> ===` header.
    pub fn append(&self, run_id: u64, block: &str) -> PipelineResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::capture_io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PipelineError::capture_io(&self.path, e))?;

        let mut entry = format!(
            "=== {} run {} ===\n{}",
            Local::now().format("%Y-%m-%dT%H:%M:%S"),
            run_id,
            block
        );
        if !entry.ends_with('\n') {
            entry.push('\n');
        }

        file.write_all(entry.as_bytes())
            .map_err(|e| PipelineError::capture_io(&self.path, e))?;
        Ok(())
    }
}
