//! Template validation for Aurelia templates.
//!
//! [`HtmlValidator`] walks every element and attribute of a document and
//! applies a list of [`AttributeRule`]s, collecting a [`Diagnostic`] for
//! each rule that matches. The built-in rules are:
//! - `binding-one-way-deprecated`
//! - `attribute-invalid-casing`
//! - `if-conflicting-attributes`

pub mod document;
pub mod rule;
pub mod rules;
pub mod validator;

pub use document::TextDocument;
pub use rule::AttributeRule;
pub use validator::{HtmlValidator, ValidationError, ValidationResult, ValidationSettings};

use au_span::{LineColRange, Span};
use std::fmt;

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// The diagnostic message.
    pub message: String,
    /// Byte span in the document.
    pub span: Span,
    /// 0-based line/column range of `span`.
    pub range: LineColRange,
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// The tool that produced the diagnostic.
    pub source: &'static str,
}

/// Value of [`Diagnostic::source`] for built-in diagnostics.
pub const DIAGNOSTIC_SOURCE: &str = "aurelia";

impl Diagnostic {
    /// Create a diagnostic located in `document`.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        span: Span,
        code: DiagnosticCode,
        document: &TextDocument,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            range: document.range(span),
            severity,
            code,
            source: DIAGNOSTIC_SOURCE,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(
        message: impl Into<String>,
        span: Span,
        code: DiagnosticCode,
        document: &TextDocument,
    ) -> Self {
        Self::new(Severity::Error, message, span, code, document)
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        message: impl Into<String>,
        span: Span,
        code: DiagnosticCode,
        document: &TextDocument,
    ) -> Self {
        Self::new(Severity::Warning, message, span, code, document)
    }

    /// Create a new hint diagnostic.
    pub fn hint(
        message: impl Into<String>,
        span: Span,
        code: DiagnosticCode,
        document: &TextDocument,
    ) -> Self {
        Self::new(Severity::Hint, message, span, code, document)
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    /// Get the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "information",
            Self::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DiagnosticCode {
    /// `one-way` binding command.
    OneWayDeprecated,
    /// Binding target with upper-case letters.
    InvalidAttributeCasing,
    /// `if` next to another template controller.
    IfConflictingAttributes,
    /// Binding or interpolation expression that does not parse.
    InvalidExpression,
    /// Template whose file model could not be built.
    InvalidTemplate,
}

impl DiagnosticCode {
    /// Get the code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWayDeprecated => "binding-one-way-deprecated",
            Self::InvalidAttributeCasing => "attribute-invalid-casing",
            Self::IfConflictingAttributes => "if-conflicting-attributes",
            Self::InvalidExpression => "invalid-expression",
            Self::InvalidTemplate => "invalid-template",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_span::LineCol;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostic_located_in_document() {
        let doc = TextDocument::new("a.html", "<a>\n<b x.bind=\"y\">");
        let diag = Diagnostic::warning(
            "x",
            Span::new(7, 13),
            DiagnosticCode::InvalidAttributeCasing,
            &doc,
        );
        assert_eq!(diag.range.start, LineCol::new(1, 3));
        assert_eq!(diag.range.end, LineCol::new(1, 9));
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.source, "aurelia");
        assert_eq!(diag.code.to_string(), "attribute-invalid-casing");
    }
}
