//! End-to-end orchestration of one capture run.
//!
//! The coordinator walks the `RunState` machine, reporting every transition
//! to the shell. When validation fails it sends exactly one correction
//! request and blocks on the response channel until the operator answers.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use tracing::{info, warn};

use crate::capture::ScreenSource;
use crate::error::{PipelineError, PipelineResult};
use crate::logline::LogLinePatternMatcher;
use crate::ocr::{ImagePreprocessor, OcrInvoker};
use crate::pipeline::messages::{CorrectionRequest, CorrectionResponse, RunReport, ShellEvent};
use crate::pipeline::sink::LogConcatenator;
use crate::pipeline::state::RunState;
use crate::pipeline::validator::{OperatorApproval, TextBlock, Validator};

const SCREENSHOT_FILE: &str = "screenshot.png";
const OCR_OUTPUT_BASE: &str = "ocr_output";

pub struct ValidationCoordinator {
    screen: Box<dyn ScreenSource>,
    preprocessor: ImagePreprocessor,
    ocr: OcrInvoker,
    matcher: LogLinePatternMatcher,
    validator: Box<dyn Validator>,
    sink: LogConcatenator,
    runs_dir: PathBuf,
    events: Sender<ShellEvent>,
    corrections: Receiver<CorrectionResponse>,
    state: RunState,
}

impl ValidationCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        screen: Box<dyn ScreenSource>,
        preprocessor: ImagePreprocessor,
        ocr: OcrInvoker,
        matcher: LogLinePatternMatcher,
        sink: LogConcatenator,
        runs_dir: PathBuf,
        events: Sender<ShellEvent>,
        corrections: Receiver<CorrectionResponse>,
    ) -> Self {
        Self {
            screen,
            preprocessor,
            ocr,
            matcher,
            validator: Box::new(OperatorApproval),
            sink,
            runs_dir,
            events,
            corrections,
            state: RunState::Idle,
        }
    }

    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Sends a status line to the shell. The shell may already be gone;
    /// status updates are never required for the run to succeed.
    pub fn send_status(&self, text: impl Into<String>) {
        self.send_event(ShellEvent::Status(text.into()));
    }

    pub fn send_event(&self, event: ShellEvent) {
        let _ = self.events.send(event);
    }

    fn transition(&mut self, next: RunState) {
        if !self.state.can_transition_to(next) {
            warn!("Unexpected transition {:?} -> {:?}", self.state, next);
        }
        info!("{}", next);
        self.state = next;
        self.send_status(next.to_string());
    }

    /// Runs capture → preprocessing → OCR → matching → validation →
    /// concatenation. Intermediate files live in a temporary directory
    /// removed when the run ends.
    pub fn run(&mut self, run_id: u64) -> PipelineResult<RunReport> {
        // A failed run leaves the machine mid-way; each run starts fresh.
        self.state = RunState::Idle;

        std::fs::create_dir_all(&self.runs_dir)
            .map_err(|e| PipelineError::capture_io(&self.runs_dir, e))?;
        let run_dir = tempfile::Builder::new()
            .prefix(&format!("run-{}-", run_id))
            .tempdir_in(&self.runs_dir)
            .map_err(|e| PipelineError::capture_io(&self.runs_dir, e))?;

        self.transition(RunState::Capturing);
        let raw_path = run_dir.path().join(SCREENSHOT_FILE);
        self.screen.grab(&raw_path)?;

        self.transition(RunState::Preprocessing);
        let prepared_path = self.preprocessor.prepare(&raw_path)?;

        self.transition(RunState::Recognizing);
        let ocr = self.ocr.with_output_base(run_dir.path().join(OCR_OUTPUT_BASE));
        let recognized = ocr.recognize(&prepared_path)?;

        self.transition(RunState::PatternChecking);
        let matches = self.matcher.match_text(&recognized);
        info!("{} pattern match(es) in run {}", matches.len(), run_id);

        let text = self.validate_with_corrections(run_id, recognized)?;

        self.transition(RunState::Concatenating);
        self.sink.append(run_id, &text)?;
        info!("Validated block for run {}:\n{}", run_id, text);

        self.transition(RunState::Done);
        Ok(RunReport {
            run_id,
            text,
            matches,
        })
    }

    /// The validation gate. Loops until the validator accepts the current
    /// block, asking the operator for a replacement after each rejection.
    pub fn validate_with_corrections(
        &mut self,
        run_id: u64,
        recognized: String,
    ) -> PipelineResult<String> {
        let mut block = TextBlock::from_ocr(recognized);

        loop {
            self.transition(RunState::AwaitingValidation);
            let outcome = self.validator.validate(&block);
            if outcome.validated {
                self.transition(RunState::Valid);
                return Ok(outcome.text);
            }

            self.transition(RunState::AwaitingCorrection);
            let _ = self
                .events
                .send(ShellEvent::CorrectionRequested(CorrectionRequest {
                    run_id,
                    text: block.text.clone(),
                }));

            let response = self.await_correction(run_id)?;
            block = TextBlock::from_operator(response.text);
        }
    }

    /// Blocks until the response for `run_id` arrives. Responses for other
    /// runs are stale and dropped.
    fn await_correction(&self, run_id: u64) -> PipelineResult<CorrectionResponse> {
        loop {
            match self.corrections.recv() {
                Ok(response) if response.run_id == run_id => return Ok(response),
                Ok(response) => {
                    warn!(
                        "Discarding correction for run {} while waiting on run {}",
                        response.run_id, run_id
                    );
                }
                Err(_) => return Err(PipelineError::ShellDisconnected(run_id)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::ImageFile;
    use crate::config::{CaptureRegion, PreprocessConfig};
    use crate::logline::PatternRegistry;
    use crate::pipeline::messages::{create_channels, ShellChannels};
    use crate::pipeline::validator::ValidationOutcome;
    use std::path::Path;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    struct AlwaysInvalid;

    impl Validator for AlwaysInvalid {
        fn validate(&self, block: &TextBlock) -> ValidationOutcome {
            ValidationOutcome {
                text: block.text.clone(),
                validated: false,
            }
        }
    }

    fn coordinator(dir: &Path, screen: ImageFile, tesseract: PathBuf) -> (ValidationCoordinator, ShellChannels) {
        let (shell, worker) = create_channels();
        let coordinator = ValidationCoordinator::new(
            Box::new(screen),
            ImagePreprocessor::new(
                CaptureRegion { x: 100, y: 100, width: 50, height: 50 },
                PreprocessConfig::default(),
            ),
            OcrInvoker::new(tesseract, dir.join("unused")),
            LogLinePatternMatcher::new(Arc::new(PatternRegistry::with_defaults(&[]).unwrap())),
            LogConcatenator::new(dir.join("game_log.txt")),
            dir.join("runs"),
            worker.events,
            worker.corrections,
        );
        (coordinator, shell)
    }

    /// Receives events until the next correction request.
    fn next_request(shell: &ShellChannels) -> CorrectionRequest {
        loop {
            match shell.events.recv_timeout(Duration::from_secs(10)).unwrap() {
                ShellEvent::CorrectionRequested(request) => return request,
                _ => continue,
            }
        }
    }

    fn drain_requests(shell: &ShellChannels) -> usize {
        shell
            .events
            .try_iter()
            .filter(|e| matches!(e, ShellEvent::CorrectionRequested(_)))
            .count()
    }

    #[test]
    fn test_correction_replaces_recognized_text() {
        let dir = tempdir().unwrap();
        let (mut coordinator, shell) =
            coordinator(dir.path(), ImageFile::new(dir.path().join("none.png")), PathBuf::from("none"));

        let handle = thread::spawn(move || coordinator.validate_with_corrections(7, "0CR text".to_string()));

        let request = next_request(&shell);
        assert_eq!(request, CorrectionRequest { run_id: 7, text: "0CR text".to_string() });

        shell
            .corrections
            .send(CorrectionResponse { run_id: 7, text: "OCR text".to_string() })
            .unwrap();

        assert_eq!(handle.join().unwrap().unwrap(), "OCR text");
    }

    #[test]
    fn test_always_invalid_requests_once_per_iteration() {
        let dir = tempdir().unwrap();
        let (coordinator, shell) =
            coordinator(dir.path(), ImageFile::new(dir.path().join("none.png")), PathBuf::from("none"));
        let mut coordinator = coordinator.with_validator(Box::new(AlwaysInvalid));

        let handle = thread::spawn(move || coordinator.validate_with_corrections(1, "original".to_string()));

        let first = next_request(&shell);
        assert_eq!(first.text, "original");
        thread::sleep(Duration::from_millis(100));
        assert_eq!(drain_requests(&shell), 0, "No second request before the operator answers");

        shell
            .corrections
            .send(CorrectionResponse { run_id: 1, text: "first fix".to_string() })
            .unwrap();
        let second = next_request(&shell);
        assert_eq!(second.text, "first fix", "Operator text replaces the original");
        thread::sleep(Duration::from_millis(100));
        assert_eq!(drain_requests(&shell), 0);

        // Without a way out of the loop, the run ends only when the shell goes away
        drop(shell);
        let result = handle.join().unwrap();
        assert!(matches!(result, Err(PipelineError::ShellDisconnected(1))));
    }

    #[test]
    fn test_stale_correction_is_ignored() {
        let dir = tempdir().unwrap();
        let (mut coordinator, shell) =
            coordinator(dir.path(), ImageFile::new(dir.path().join("none.png")), PathBuf::from("none"));

        let handle = thread::spawn(move || coordinator.validate_with_corrections(2, "text".to_string()));
        next_request(&shell);

        shell
            .corrections
            .send(CorrectionResponse { run_id: 1, text: "stale".to_string() })
            .unwrap();
        shell
            .corrections
            .send(CorrectionResponse { run_id: 2, text: "fresh".to_string() })
            .unwrap();

        assert_eq!(handle.join().unwrap().unwrap(), "fresh");
    }

    #[test]
    fn test_capture_failure_aborts_run() {
        let dir = tempdir().unwrap();
        let (mut coordinator, _shell) =
            coordinator(dir.path(), ImageFile::new(dir.path().join("none.png")), PathBuf::from("none"));

        let result = coordinator.run(1);

        assert!(matches!(result, Err(PipelineError::CaptureIo { .. })));
        assert_eq!(coordinator.state(), RunState::Capturing);
        assert!(!dir.path().join("game_log.txt").exists());
    }

    #[cfg(unix)]
    mod end_to_end {
        use super::*;
        use image::{ImageBuffer, Rgb};
        use std::os::unix::fs::PermissionsExt;

        fn fake_tesseract(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-tesseract");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn white_screenshot(dir: &Path) -> PathBuf {
            let path = dir.join("saved.png");
            let white: ImageBuffer<Rgb<u8>, Vec<u8>> =
                ImageBuffer::from_pixel(300, 300, Rgb([255, 255, 255]));
            white.save(&path).unwrap();
            path
        }

        #[test]
        fn test_full_run_with_operator_correction() {
            let dir = tempdir().unwrap();
            // Records the prepared image size so the test can check it
            let tesseract = fake_tesseract(
                dir.path(),
                r#"cp "$1" "$(dirname "$0")/seen.png"
printf '3:45, 12 June, 1939 We sank the Bismarck. extra junk\n\nnoise\n' > "$2.txt""#,
            );
            let (mut coordinator, shell) =
                coordinator(dir.path(), ImageFile::new(white_screenshot(dir.path())), tesseract);

            let handle = thread::spawn(move || coordinator.run(5));

            let request = next_request(&shell);
            assert_eq!(request.run_id, 5);
            assert!(request.text.starts_with("3:45, 12 June, 1939"));
            shell
                .corrections
                .send(CorrectionResponse {
                    run_id: 5,
                    text: "3:45, 12 June, 1939 We sank the Bismarck.".to_string(),
                })
                .unwrap();

            let report = handle.join().unwrap().unwrap();
            assert_eq!(report.text, "3:45, 12 June, 1939 We sank the Bismarck.");
            assert_eq!(report.matches.len(), 1);
            assert_eq!(report.matches[0].captures["NAME"], "Bismarck");

            let seen = image::open(dir.path().join("seen.png")).unwrap().to_luma8();
            assert_eq!(seen.dimensions(), (135, 135));

            let log = std::fs::read_to_string(dir.path().join("game_log.txt")).unwrap();
            assert!(log.contains("We sank the Bismarck.\n"));
            assert!(!log.contains("extra junk"));

            let statuses: Vec<String> = shell
                .events
                .try_iter()
                .filter_map(|e| match e {
                    ShellEvent::Status(s) => Some(s),
                    _ => None,
                })
                .collect();
            assert_eq!(statuses.last().map(String::as_str), Some("Done"));
            assert!(statuses.iter().any(|s| s == "Concatenate logs"));

            // Run directory is cleaned up
            let leftover = std::fs::read_dir(dir.path().join("runs")).unwrap().count();
            assert_eq!(leftover, 0);
        }

        #[test]
        fn test_ocr_failure_is_fatal_for_the_run() {
            let dir = tempdir().unwrap();
            let tesseract = fake_tesseract(dir.path(), "exit 1");
            let (mut coordinator, shell) =
                coordinator(dir.path(), ImageFile::new(white_screenshot(dir.path())), tesseract);

            let result = coordinator.run(1);

            assert!(matches!(result, Err(PipelineError::OcrProcess { code: Some(1), .. })));
            assert_eq!(drain_requests(&shell), 0);
            assert!(!dir.path().join("game_log.txt").exists());
        }
    }
}
