//! The validation pipeline.

use crate::rules::builtin_rules;
use crate::{AttributeRule, Diagnostic, TextDocument};
use au_markup::{HtmlTagSource, MarkupError, TagSource};

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("failed to tokenize {uri}: {source}")]
    Markup {
        uri: String,
        #[source]
        source: MarkupError,
    },
}

/// Settings that switch validation on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSettings {
    pub validation: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self { validation: true }
    }
}

/// Applies attribute rules to every attribute of every element.
pub struct HtmlValidator {
    tags: Box<dyn TagSource>,
    rules: Vec<Box<dyn AttributeRule>>,
    settings: ValidationSettings,
}

impl HtmlValidator {
    /// Create a validator with an explicit rule list, applied in order.
    pub fn new(
        tags: impl TagSource + 'static,
        rules: Vec<Box<dyn AttributeRule>>,
        settings: ValidationSettings,
    ) -> Self {
        Self {
            tags: Box::new(tags),
            rules,
            settings,
        }
    }

    /// Create a validator with the built-in tokenizer and rules.
    pub fn with_builtins(settings: ValidationSettings) -> Self {
        Self::new(HtmlTagSource, builtin_rules(), settings)
    }

    /// Iterate over the registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &dyn AttributeRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// Validate `document`.
    ///
    /// Returns nothing, without tokenizing, when validation is disabled or
    /// the text is blank. Diagnostics are ordered by element, then
    /// attribute, then rule.
    pub async fn validate(&self, document: &TextDocument) -> ValidationResult<Vec<Diagnostic>> {
        if !self.settings.validation || document.is_blank() {
            return Ok(Vec::new());
        }

        tracing::debug!(uri = %document.uri, rules = self.rules.len(), "validating document");

        let elements = self
            .tags
            .elements(&document.text)
            .await
            .map_err(|source| ValidationError::Markup {
                uri: document.uri.clone(),
                source,
            })?;

        let mut diagnostics = Vec::new();
        for element in &elements {
            for attribute in &element.attributes {
                for rule in &self.rules {
                    if rule.matches(attribute, element, document) {
                        diagnostics.push(rule.diagnostic(attribute, element, document));
                    }
                }
            }
        }

        tracing::debug!(uri = %document.uri, count = diagnostics.len(), "validated document");
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagnosticCode, Severity};
    use async_trait::async_trait;
    use au_markup::{Attribute, MarkupResult, TagEvent};
    use au_span::LineCol;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts tokenize calls.
    struct CountingTags(Arc<AtomicUsize>);

    #[async_trait]
    impl TagSource for CountingTags {
        async fn tokenize(&self, text: &str) -> MarkupResult<Vec<TagEvent>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            HtmlTagSource.tokenize(text).await
        }
    }

    /// Matches every attribute and counts calls.
    struct CountingRule(Arc<AtomicUsize>);

    impl AttributeRule for CountingRule {
        fn code(&self) -> DiagnosticCode {
            DiagnosticCode::InvalidExpression
        }

        fn description(&self) -> &str {
            "counts"
        }

        fn matches(&self, _: &Attribute, _: &TagEvent, _: &TextDocument) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn diagnostic(&self, attribute: &Attribute, _: &TagEvent, document: &TextDocument) -> Diagnostic {
            Diagnostic::hint(attribute.raw_name.as_str(), attribute.span, self.code(), document)
        }
    }

    fn counting_validator(settings: ValidationSettings) -> (HtmlValidator, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let tokenized = Arc::new(AtomicUsize::new(0));
        let matched = Arc::new(AtomicUsize::new(0));
        let validator = HtmlValidator::new(
            CountingTags(tokenized.clone()),
            vec![Box::new(CountingRule(matched.clone()))],
            settings,
        );
        (validator, tokenized, matched)
    }

    #[tokio::test]
    async fn test_disabled_validation_returns_nothing() {
        let (validator, tokenized, matched) =
            counting_validator(ValidationSettings { validation: false });
        let doc = TextDocument::new("a.html", r#"<input value.one-way="x">"#);
        assert!(validator.validate(&doc).await.unwrap().is_empty());
        assert_eq!(tokenized.load(Ordering::SeqCst), 0);
        assert_eq!(matched.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_text_skips_tokenizer_and_rules() {
        let (validator, tokenized, matched) = counting_validator(ValidationSettings::default());
        for text in ["", "   \n\t  "] {
            let doc = TextDocument::new("a.html", text);
            assert!(validator.validate(&doc).await.unwrap().is_empty());
        }
        assert_eq!(tokenized.load(Ordering::SeqCst), 0);
        assert_eq!(matched.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_every_attribute_reaches_every_rule() {
        let (validator, tokenized, matched) = counting_validator(ValidationSettings::default());
        let doc = TextDocument::new("a.html", r#"<div a="1" b="2"><span c></span></div>"#);
        let diagnostics = validator.validate(&doc).await.unwrap();
        let names: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(tokenized.load(Ordering::SeqCst), 1);
        assert_eq!(matched.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_one_way_yields_exactly_one_diagnostic() {
        let validator = HtmlValidator::with_builtins(ValidationSettings::default());
        let doc = TextDocument::new(
            "file:///app.html",
            "<template>\n  <input value.one-way=\"name\">\n</template>",
        );
        let diagnostics = validator.validate(&doc).await.unwrap();
        assert_eq!(diagnostics.len(), 1);

        let diag = &diagnostics[0];
        assert_eq!(diag.code, DiagnosticCode::OneWayDeprecated);
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.message.contains("to-view"));
        assert_eq!(diag.range.start, LineCol::new(1, 9));
        assert_eq!(diag.range.end, LineCol::new(1, 22));
    }

    #[tokio::test]
    async fn test_diagnostics_ordered_by_attribute_then_rule() {
        let validator = HtmlValidator::with_builtins(ValidationSettings::default());
        let doc = TextDocument::new(
            "a.html",
            r#"<li if.bind="a" repeat.for="x of xs" itemName.one-way="x"></li>"#,
        );
        let codes: Vec<_> = validator
            .validate(&doc)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.code)
            .collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::IfConflictingAttributes,
                DiagnosticCode::OneWayDeprecated,
                DiagnosticCode::InvalidAttributeCasing,
            ]
        );
    }

    #[test]
    fn test_rules_keep_given_order() {
        let (validator, _, _) = counting_validator(ValidationSettings::default());
        let ids: Vec<_> = validator.rules().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["invalid-expression"]);
        assert_eq!(
            HtmlValidator::with_builtins(ValidationSettings::default())
                .rules()
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn test_clean_template_has_no_diagnostics() {
        let validator = HtmlValidator::with_builtins(ValidationSettings::default());
        let doc = TextDocument::new(
            "a.html",
            r#"<template><input value.bind="name"><p if.bind="show">${name}</p></template>"#,
        );
        assert!(validator.validate(&doc).await.unwrap().is_empty());
    }
}
