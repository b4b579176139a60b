//! Flags the deprecated `one-way` binding command.

use crate::{AttributeRule, Diagnostic, DiagnosticCode, TextDocument};
use au_markup::{Attribute, BindingType, TagEvent};

/// Flags the `one-way` binding command, superseded by `to-view`.
pub struct OneWayDeprecatedRule;

impl AttributeRule for OneWayDeprecatedRule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::OneWayDeprecated
    }

    fn description(&self) -> &str {
        "The one-way binding command is deprecated"
    }

    fn matches(&self, attribute: &Attribute, _element: &TagEvent, _document: &TextDocument) -> bool {
        attribute.binding == Some(BindingType::OneWay)
    }

    fn diagnostic(
        &self,
        attribute: &Attribute,
        _element: &TagEvent,
        document: &TextDocument,
    ) -> Diagnostic {
        Diagnostic::warning(
            format!(
                "'{}' uses the deprecated one-way command, use '{}.to-view' instead",
                attribute.raw_name, attribute.name
            ),
            attribute.name_span,
            self.code(),
            document,
        )
    }
}
