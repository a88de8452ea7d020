//! Validation strategies for recognized text.

/// Where the text under validation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextOrigin {
    Ocr,
    Operator,
}

/// Text currently flowing through the validation gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    pub origin: TextOrigin,
}

impl TextBlock {
    pub fn from_ocr(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: TextOrigin::Ocr,
        }
    }

    pub fn from_operator(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: TextOrigin::Operator,
        }
    }
}

/// A text block paired with its validity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub text: String,
    pub validated: bool,
}

pub trait Validator: Send {
    fn validate(&self, block: &TextBlock) -> ValidationOutcome;
}

/// No automatic rules: recognized text always goes to the operator, and
/// whatever the operator sends back is accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct OperatorApproval;

impl Validator for OperatorApproval {
    fn validate(&self, block: &TextBlock) -> ValidationOutcome {
        ValidationOutcome {
            text: block.text.clone(),
            validated: block.origin == TextOrigin::Operator,
        }
    }
}
