//! Voice and typed input normalization
//!
//! Recognition results and typed fallback text go through the same
//! normalization before interpretation, so the command layer never sees
//! casing or whitespace differences between the two sources.

/// A piece of user input headed for the command interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSubmission {
    /// Final transcript from speech recognition
    Recognized(String),
    /// Manually typed fallback
    Typed(String),
}

impl TextSubmission {
    pub fn raw(&self) -> &str {
        match self {
            Self::Recognized(text) | Self::Typed(text) => text,
        }
    }

    /// Lowercased, whitespace-trimmed form used for matching
    pub fn normalized(&self) -> String {
        self.raw().trim().to_lowercase()
    }

    pub fn is_voice(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }
}
