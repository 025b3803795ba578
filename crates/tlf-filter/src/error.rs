//! Error types for filter-expression parsing.

use thiserror::Error;

/// Errors raised while parsing a filter expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Malformed filter text: no atom matches the grammar, an unbalanced
    /// bracket, an unterminated quote, or an unknown operator. Carries the
    /// original text and the best-effort byte position of the failure.
    #[error("invalid filter expression at offset {position}: {message} (in {text:?})")]
    Syntax {
        text: String,
        position: usize,
        message: String,
    },
}

impl FilterError {
    /// Byte offset of the failure within the original text.
    pub fn position(&self) -> usize {
        match self {
            Self::Syntax { position, .. } => *position,
        }
    }
}

/// Result type for filter parsing.
pub type Result<T> = std::result::Result<T, FilterError>;
