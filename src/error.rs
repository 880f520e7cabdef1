//! Extraction failures. All of them are recovered per function.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// No strategy recognized a call signature in the text.
    #[error("failed to find function signature")]
    SignatureNotFound { text: String },

    /// A parameter token could not be split into type and name.
    #[error("malformed function parameter ({reason})")]
    MalformedParameter { text: String, reason: String },

    /// A value left of `=` is neither `Type name` nor a recognizable type.
    #[error("malformed return value")]
    MalformedReturnValue { text: String },
}

impl ExtractError {
    /// The literal text that failed to parse.
    pub fn text(&self) -> &str {
        match self {
            ExtractError::SignatureNotFound { text }
            | ExtractError::MalformedParameter { text, .. }
            | ExtractError::MalformedReturnValue { text } => text,
        }
    }

    /// Replace the failing fragment with the whole signature line.
    pub(crate) fn with_text(self, line: &str) -> Self {
        let text = line.to_string();
        match self {
            ExtractError::SignatureNotFound { .. } => ExtractError::SignatureNotFound { text },
            ExtractError::MalformedParameter { reason, .. } => {
                ExtractError::MalformedParameter { text, reason }
            }
            ExtractError::MalformedReturnValue { .. } => {
                ExtractError::MalformedReturnValue { text }
            }
        }
    }
}
