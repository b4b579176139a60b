//! Error types for markup tokenization.

use au_span::Span;
use std::fmt;

/// Result type for tokenization.
pub type MarkupResult<T> = Result<T, MarkupError>;

/// An error that occurred while producing tag events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupError {
    /// The error message.
    pub message: String,
    /// The span where the error occurred.
    pub span: Span,
    /// The error code.
    pub code: ErrorCode,
}

impl MarkupError {
    /// Create a new markup error.
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// The source does not fit in 32-bit offsets.
    pub fn too_large(len: usize) -> Self {
        Self::new(
            format!("Document of {} bytes exceeds the 4 GiB offset limit", len),
            Span::default(),
            ErrorCode::TooLarge,
        )
    }
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MarkupError {}

/// Error codes for categorizing markup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Document too large for u32 spans.
    TooLarge,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TooLarge => "too-large",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
