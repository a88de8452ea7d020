use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::error::{PipelineError, PipelineResult};

const EXECUTABLE_NAME: &str = if cfg!(windows) { "tesseract.exe" } else { "tesseract" };

/// Common installation paths of the UB-Mannheim Windows builds.
const COMMON_WINDOWS_PATHS: [&str; 2] = [
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
];

/// Returns the directory for a locally bundled Tesseract.
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hoi3-log-capture")
        .join("tesseract")
}

/// Finds the Tesseract executable.
///
/// Checks, in order: the configured path, the local tool directory, the
/// system PATH and the common Windows installation paths.
pub fn find_tesseract_executable(configured: Option<&Path>) -> PipelineResult<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(PipelineError::Config(format!(
            "configured Tesseract executable not found: {}",
            path.display()
        )));
    }

    let local_exe = get_tesseract_dir().join(EXECUTABLE_NAME);
    if local_exe.exists() {
        info!("Tesseract found at: {}", local_exe.display());
        return Ok(local_exe);
    }

    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            info!("Found Tesseract in system PATH");
            return Ok(PathBuf::from("tesseract"));
        }
    }

    for path in &COMMON_WINDOWS_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            info!("Found Tesseract at: {}", path);
            return Ok(p);
        }
    }

    Err(PipelineError::OcrProcess {
        code: None,
        message: format!(
            "Tesseract not found. Install Tesseract-OCR (add it to PATH), copy it to {}, \
             or set \"tesseract_path\" in config.json",
            get_tesseract_dir().display()
        ),
    })
}
