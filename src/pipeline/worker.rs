//! Capture worker thread.
//!
//! Receives capture triggers from the shell and runs one pipeline per
//! trigger, strictly one after another. A failed run is reported to the
//! shell and the worker waits for the next trigger.

use std::sync::mpsc::Receiver;
use tracing::{error, info};

use crate::error::PipelineError;
use crate::pipeline::coordinator::ValidationCoordinator;
use crate::pipeline::messages::{ShellEvent, TriggerSource};

/// Runs the worker loop until the trigger channel closes or the shell
/// disconnects during a correction.
///
/// Blocks, so it should be run in a dedicated thread.
pub fn run_capture_worker(triggers: Receiver<TriggerSource>, mut coordinator: ValidationCoordinator) {
    info!("Capture worker started");
    let mut run_id: u64 = 0;

    while let Ok(source) = triggers.recv() {
        run_id += 1;
        info!("Capture worker: run {} triggered by {:?}", run_id, source);

        match coordinator.run(run_id) {
            Ok(report) => {
                info!(
                    "Run {} complete: {} line(s) matched a pattern",
                    run_id,
                    report.matches.len()
                );
                coordinator.send_event(ShellEvent::RunFinished(report));
            }
            Err(PipelineError::ShellDisconnected(id)) => {
                info!("Shell disconnected during run {}, exiting", id);
                break;
            }
            Err(e) => {
                error!("Run {} failed: {}", run_id, e);
                coordinator.send_status(format!("Failed: {}", e));
                coordinator.send_event(ShellEvent::RunFailed {
                    run_id,
                    message: e.to_string(),
                });
            }
        }
    }

    info!("Capture worker finished");
}
