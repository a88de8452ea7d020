use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};

/// Drives the external Tesseract executable.
///
/// Invocation is `<exe> <image> <output-base> quiet`; Tesseract appends
/// `.txt` to the output base itself.
#[derive(Clone, Debug)]
pub struct OcrInvoker {
    executable: PathBuf,
    output_base: PathBuf,
}

impl OcrInvoker {
    pub fn new(executable: impl Into<PathBuf>, output_base: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            output_base: output_base.into(),
        }
    }

    /// Same executable, writing its output under a different base path.
    pub fn with_output_base(&self, output_base: impl Into<PathBuf>) -> Self {
        Self {
            executable: self.executable.clone(),
            output_base: output_base.into(),
        }
    }

    /// Path of the text file Tesseract produces.
    pub fn output_path(&self) -> PathBuf {
        let mut path = self.output_base.clone().into_os_string();
        path.push(".txt");
        PathBuf::from(path)
    }

    /// Runs OCR over `image_path` and returns the recognized text.
    ///
    /// A non-zero exit status is fatal for the run; nothing is retried.
    pub fn recognize(&self, image_path: &Path) -> PipelineResult<String> {
        info!(
            "OCR on {} to {}",
            image_path.display(),
            self.output_base.display()
        );

        let output = Command::new(&self.executable)
            .arg(image_path)
            .arg(&self.output_base)
            .arg("quiet")
            .output()
            .map_err(|e| PipelineError::OcrProcess {
                code: None,
                message: format!("failed to start {}: {}", self.executable.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::OcrProcess {
                code: output.status.code(),
                message: format!("Tesseract failed: {}", stderr.trim()),
            });
        }

        let text_path = self.output_path();
        let text = std::fs::read_to_string(&text_path).map_err(|e| PipelineError::OcrProcess {
            code: Some(0),
            message: format!("failed to read {}: {}", text_path.display(), e),
        })?;

        debug!("OCR produced {} bytes", text.len());
        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_recognize_reads_output_file() {
        let dir = tempdir().unwrap();
        // Fails unless called as: <image> <base> quiet
        let exe = write_script(
            dir.path(),
            r#"[ "$3" = "quiet" ] || exit 9
printf '3:45, 12 June, 1939 We sank the Bismarck.\n\n' > "$2.txt""#,
        );
        let invoker = OcrInvoker::new(&exe, dir.path().join("ocr_output"));

        let text = invoker.recognize(&dir.path().join("image.png")).unwrap();

        assert_eq!(text, "3:45, 12 June, 1939 We sank the Bismarck.\n\n");
        assert_eq!(invoker.output_path(), dir.path().join("ocr_output.txt"));
    }

    #[test]
    fn test_non_zero_exit_is_ocr_error() {
        let dir = tempdir().unwrap();
        let exe = write_script(dir.path(), "echo 'cannot read image' >&2\nexit 3");
        let invoker = OcrInvoker::new(&exe, dir.path().join("ocr_output"));

        match invoker.recognize(&dir.path().join("image.png")) {
            Err(PipelineError::OcrProcess { code, message }) => {
                assert_eq!(code, Some(3));
                assert!(message.contains("cannot read image"));
            }
            other => panic!("expected OcrProcess error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_output_file_is_ocr_error() {
        let dir = tempdir().unwrap();
        let exe = write_script(dir.path(), "exit 0");
        let invoker = OcrInvoker::new(&exe, dir.path().join("ocr_output"));

        let result = invoker.recognize(&dir.path().join("image.png"));
        assert!(matches!(result, Err(PipelineError::OcrProcess { .. })));
    }

    #[test]
    fn test_missing_executable_is_ocr_error() {
        let dir = tempdir().unwrap();
        let invoker = OcrInvoker::new(dir.path().join("absent"), dir.path().join("ocr_output"));

        let result = invoker.recognize(&dir.path().join("image.png"));
        assert!(matches!(result, Err(PipelineError::OcrProcess { code: None, .. })));
    }
}
