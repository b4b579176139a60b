//! Error types for binding expression parsing.

use au_span::Span;
use std::fmt;

/// Result type for expression parsing.
pub type ExprResult<T> = Result<T, ExpressionError>;

/// An error that occurred while parsing a binding expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionError {
    /// The error message.
    pub message: String,
    /// The span where the error occurred, relative to the parsed string.
    pub span: Span,
    /// The error code.
    pub code: ExprErrorCode,
}

impl ExpressionError {
    /// Create a new expression error.
    pub fn new(message: impl Into<String>, span: Span, code: ExprErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// Create an unexpected token error.
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(
            format!("Expected {}, found {}", expected, found),
            span,
            ExprErrorCode::UnexpectedToken,
        )
    }

    /// Create an unexpected end of input error.
    pub fn unexpected_end(expected: &str, span: Span) -> Self {
        Self::new(
            format!("Expected {}, found end of expression", expected),
            span,
            ExprErrorCode::UnexpectedEnd,
        )
    }

    /// Create an unconsumed token error.
    pub fn unconsumed(found: &str, span: Span) -> Self {
        Self::new(
            format!("Unconsumed token {}", found),
            span,
            ExprErrorCode::UnconsumedToken,
        )
    }

    /// Create a not-assignable error.
    pub fn not_assignable(span: Span) -> Self {
        Self::new(
            "Left hand side of assignment is not assignable",
            span,
            ExprErrorCode::NotAssignable,
        )
    }
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExpressionError {}

/// Error codes for expression parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprErrorCode {
    /// Unexpected token.
    UnexpectedToken,
    /// Input ended too early.
    UnexpectedEnd,
    /// Tokens left over after a complete expression.
    UnconsumedToken,
    /// Unterminated string or template literal.
    UnterminatedString,
    /// Malformed number.
    InvalidNumber,
    /// Character that starts no token.
    InvalidCharacter,
    /// Assignment to something that is not a property.
    NotAssignable,
    /// Empty expression.
    Empty,
}

impl ExprErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected-token",
            Self::UnexpectedEnd => "unexpected-end",
            Self::UnconsumedToken => "unconsumed-token",
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidCharacter => "invalid-character",
            Self::NotAssignable => "not-assignable",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for ExprErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
