//! Error taxonomy of the capture pipeline.
//!
//! Every variant aborts only the run that produced it. Waiting for an
//! operator correction is not an error; see `RunState::AwaitingCorrection`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reference data missing at session start; the session cannot begin.
    #[error("not correctly initialized: {0}")]
    Initialization(String),

    /// Screen grab or image read/write failure.
    #[error("capture I/O failed for {path}: {message}")]
    CaptureIo { path: PathBuf, message: String },

    /// External OCR executable failed or produced no readable output.
    #[error("OCR process failed{}: {message}", exit_code_suffix(.code))]
    OcrProcess { code: Option<i32>, message: String },

    /// The shell went away while a correction was outstanding.
    #[error("presentation shell disconnected while awaiting correction for run {0}")]
    ShellDisconnected(u64),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn capture_io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::CaptureIo {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

fn exit_code_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (exit code {})", c)).unwrap_or_default()
}

pub type PipelineResult<T> = Result<T, PipelineError>;
