//! States of a single pipeline run.

/// Capture → Preprocessing → Recognizing → PatternChecking →
/// AwaitingValidation → (Valid | AwaitingCorrection) → Concatenating → Done.
///
/// `AwaitingCorrection` loops back to `AwaitingValidation` once the operator
/// has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Capturing,
    Preprocessing,
    Recognizing,
    PatternChecking,
    AwaitingValidation,
    AwaitingCorrection,
    Valid,
    Concatenating,
    Done,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Idle => write!(f, "Idle"),
            RunState::Capturing => write!(f, "Generating screenshot"),
            RunState::Preprocessing => write!(f, "Preprocessing"),
            RunState::Recognizing => write!(f, "Running OCR"),
            RunState::PatternChecking => write!(f, "Checking log patterns"),
            RunState::AwaitingValidation => write!(f, "Validation"),
            RunState::AwaitingCorrection => write!(f, "Waiting for correction"),
            RunState::Valid => write!(f, "Validated"),
            RunState::Concatenating => write!(f, "Concatenate logs"),
            RunState::Done => write!(f, "Done"),
        }
    }
}

impl RunState {
    /// Whether `next` is a legal successor of `self` within one run.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Idle, Capturing)
                | (Done, Capturing)
                | (Capturing, Preprocessing)
                | (Preprocessing, Recognizing)
                | (Recognizing, PatternChecking)
                | (PatternChecking, AwaitingValidation)
                | (AwaitingValidation, Valid)
                | (AwaitingValidation, AwaitingCorrection)
                | (AwaitingCorrection, AwaitingValidation)
                | (Valid, Concatenating)
                | (Concatenating, Done)
        )
    }
}
