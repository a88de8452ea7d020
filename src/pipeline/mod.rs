//! Capture-to-validated-text pipeline.
//!
//! This module provides:
//! - The per-run state machine (`ValidationCoordinator`)
//! - Shell/worker channels and their messages
//! - Validation strategies and the concatenated log sink
//! - The single capture worker and the session that starts it

pub mod coordinator;
pub mod messages;
pub mod session;
pub mod sink;
pub mod state;
pub mod validator;
pub mod worker;

pub use messages::{CorrectionRequest, CorrectionResponse, ShellChannels, ShellEvent, TriggerSource};
pub use session::CaptureSession;
pub use validator::OperatorApproval;
