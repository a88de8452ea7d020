//! Overlay state management.
//!
//! Folds worker events into what the overlay displays.

use crate::pipeline::{CorrectionRequest, ShellEvent};

/// What the worker is doing, as far as the overlay knows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CaptureStatus {
    /// Ready for a capture
    #[default]
    Idle,
    /// A run is in flight
    Running,
    /// The worker is blocked until the operator sends a correction
    AwaitingCorrection(CorrectionRequest),
}

/// Overlay state.
#[derive(Debug, Default)]
pub struct GuiState {
    /// Text of the status label
    pub status_text: String,
    pub status: CaptureStatus,
    /// Editable copy of the text under correction
    pub correction_buffer: String,
    /// Captures requested but not yet finished or failed
    pub pending_runs: u32,
    pub completed_runs: u32,
    pub failed_runs: u32,
    /// Last validated block
    pub last_block: Option<String>,
}

impl GuiState {
    pub fn new(status_text: impl Into<String>) -> Self {
        Self {
            status_text: status_text.into(),
            ..Default::default()
        }
    }

    /// Records a capture trigger sent to the worker.
    pub fn capture_requested(&mut self) {
        self.pending_runs += 1;
        if self.status == CaptureStatus::Idle {
            self.status = CaptureStatus::Running;
        }
    }

    pub fn apply_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Status(text) => {
                self.status_text = text;
            }
            ShellEvent::CorrectionRequested(request) => {
                self.correction_buffer = request.text.clone();
                self.status_text = "Please correct the recognized text".to_string();
                self.status = CaptureStatus::AwaitingCorrection(request);
            }
            ShellEvent::RunFinished(report) => {
                self.completed_runs += 1;
                self.last_block = Some(report.text);
                self.run_ended();
            }
            ShellEvent::RunFailed { run_id, message } => {
                self.failed_runs += 1;
                self.status_text = format!("Run {} failed: {}", run_id, message);
                self.run_ended();
            }
        }
    }

    /// Takes the outstanding request, if any, so a response is sent once.
    pub fn take_correction(&mut self) -> Option<(CorrectionRequest, String)> {
        match std::mem::replace(&mut self.status, CaptureStatus::Running) {
            CaptureStatus::AwaitingCorrection(request) => {
                let text = std::mem::take(&mut self.correction_buffer);
                Some((request, text))
            }
            other => {
                self.status = other;
                None
            }
        }
    }

    fn run_ended(&mut self) {
        self.pending_runs = self.pending_runs.saturating_sub(1);
        self.status = if self.pending_runs > 0 {
            CaptureStatus::Running
        } else {
            CaptureStatus::Idle
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::messages::RunReport;

    #[test]
    fn test_correction_round_trip() {
        let mut state = GuiState::new("ready");
        state.capture_requested();
        state.apply_event(ShellEvent::CorrectionRequested(CorrectionRequest {
            run_id: 1,
            text: "0CR".to_string(),
        }));
        assert_eq!(state.correction_buffer, "0CR");

        state.correction_buffer = "OCR".to_string();
        let (request, text) = state.take_correction().unwrap();
        assert_eq!(request.run_id, 1);
        assert_eq!(text, "OCR");
        assert_eq!(state.status, CaptureStatus::Running);

        assert!(state.take_correction().is_none(), "A request is answered once");
    }

    #[test]
    fn test_status_returns_to_idle_after_last_run() {
        let mut state = GuiState::new("ready");
        state.capture_requested();
        state.capture_requested();

        state.apply_event(ShellEvent::RunFailed { run_id: 1, message: "boom".to_string() });
        assert_eq!(state.status, CaptureStatus::Running);
        assert_eq!(state.status_text, "Run 1 failed: boom");

        state.apply_event(ShellEvent::RunFinished(RunReport {
            run_id: 2,
            text: "done".to_string(),
            matches: Vec::new(),
        }));
        assert_eq!(state.status, CaptureStatus::Idle);
        assert_eq!((state.completed_runs, state.failed_runs), (1, 1));
        assert_eq!(state.last_block.as_deref(), Some("done"));
    }
}
