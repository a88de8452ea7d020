//! Messages exchanged between the capture worker and the presentation shell.
//!
//! All channels are std::sync::mpsc. The shell sends triggers and
//! correction responses; the worker sends `ShellEvent`s back.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::logline::PatternMatch;

/// What caused a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerSource {
    Button,
    Hotkey,
    Shortcut,
}

/// Text the operator has to review before the run can finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrectionRequest {
    pub run_id: u64,
    pub text: String,
}

/// The operator's replacement for a `CorrectionRequest`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrectionResponse {
    pub run_id: u64,
    pub text: String,
}

/// Summary of a finished run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub run_id: u64,
    /// Validated text appended to the concatenated log
    pub text: String,
    /// Pattern hits on the recognized (uncorrected) text
    pub matches: Vec<PatternMatch>,
}

/// Worker → shell notifications.
#[derive(Clone, Debug)]
pub enum ShellEvent {
    /// Free-form progress text for the status label
    Status(String),
    CorrectionRequested(CorrectionRequest),
    RunFinished(RunReport),
    RunFailed { run_id: u64, message: String },
}

/// Shell-side ends of the worker channels.
pub struct ShellChannels {
    pub triggers: Sender<TriggerSource>,
    pub events: Receiver<ShellEvent>,
    pub corrections: Sender<CorrectionResponse>,
}

/// Worker-side ends of the worker channels.
pub struct WorkerChannels {
    pub triggers: Receiver<TriggerSource>,
    pub events: Sender<ShellEvent>,
    pub corrections: Receiver<CorrectionResponse>,
}

/// Creates the three channels connecting shell and worker.
///
/// Triggers are unbounded: captures requested while a run is in flight
/// queue up and run one after another.
pub fn create_channels() -> (ShellChannels, WorkerChannels) {
    let (trigger_tx, trigger_rx) = channel();
    let (event_tx, event_rx) = channel();
    let (correction_tx, correction_rx) = channel();

    (
        ShellChannels {
            triggers: trigger_tx,
            events: event_rx,
            corrections: correction_tx,
        },
        WorkerChannels {
            triggers: trigger_rx,
            events: event_tx,
            corrections: correction_rx,
        },
    )
}
