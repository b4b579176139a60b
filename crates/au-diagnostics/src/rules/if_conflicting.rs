//! Flags `if` on an element that also carries another template controller.

use crate::{AttributeRule, Diagnostic, DiagnosticCode, TextDocument};
use au_markup::{Attribute, TagEvent};

/// Template controllers that cannot share an element with `if`.
const CONFLICTING: &[&str] = &["repeat.for", "with.bind", "virtual-repeat.for"];

/// Flags `if` bindings on elements that carry another template controller.
pub struct IfConflictingAttributesRule;

impl IfConflictingAttributesRule {
    fn conflicting<'a>(element: &'a TagEvent) -> Option<&'a Attribute> {
        CONFLICTING
            .iter()
            .find_map(|name| element.attribute(name))
    }
}

impl AttributeRule for IfConflictingAttributesRule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::IfConflictingAttributes
    }

    fn description(&self) -> &str {
        "An if binding cannot share an element with another template controller"
    }

    fn matches(&self, attribute: &Attribute, element: &TagEvent, _document: &TextDocument) -> bool {
        attribute.is_binding()
            && attribute.name.eq_ignore_ascii_case("if")
            && Self::conflicting(element).is_some()
    }

    fn diagnostic(
        &self,
        attribute: &Attribute,
        element: &TagEvent,
        document: &TextDocument,
    ) -> Diagnostic {
        let other = Self::conflicting(element)
            .map(|a| a.raw_name.as_str())
            .unwrap_or("another template controller");
        Diagnostic::warning(
            format!(
                "'{}' conflicts with '{}' on <{}>, move one of them to a wrapping <template>",
                attribute.raw_name, other, element.name
            ),
            attribute.span,
            self.code(),
            document,
        )
    }
}
