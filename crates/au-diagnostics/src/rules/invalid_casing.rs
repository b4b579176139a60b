//! Flags binding targets not written in kebab-case.

use crate::{AttributeRule, Diagnostic, DiagnosticCode, TextDocument};
use au_markup::{Attribute, TagEvent};

/// Flags binding targets written in camelCase. Attribute names are
/// case-insensitive in HTML, so `firstName.bind` reaches the view-model as
/// `firstname`; the kebab-case form maps back to `firstName`.
pub struct InvalidAttributeCasingRule;

impl AttributeRule for InvalidAttributeCasingRule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::InvalidAttributeCasing
    }

    fn description(&self) -> &str {
        "Binding targets must be written in kebab-case"
    }

    fn matches(&self, attribute: &Attribute, _element: &TagEvent, _document: &TextDocument) -> bool {
        attribute.is_binding() && attribute.name.chars().any(|c| c.is_ascii_uppercase())
    }

    fn diagnostic(
        &self,
        attribute: &Attribute,
        _element: &TagEvent,
        document: &TextDocument,
    ) -> Diagnostic {
        let command = attribute
            .binding
            .as_ref()
            .map(|binding| binding.as_str())
            .unwrap_or_default();
        Diagnostic::warning(
            format!(
                "'{}' is not valid attribute casing, use '{}.{}'",
                attribute.raw_name,
                to_kebab_case(&attribute.name),
                command
            ),
            attribute.name_span,
            self.code(),
            document,
        )
    }
}

/// `firstName` -> `first-name`
fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::first_element;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("firstName"), "first-name");
        assert_eq!(to_kebab_case("URL"), "u-r-l");
        assert_eq!(to_kebab_case("Value"), "value");
        assert_eq!(to_kebab_case("aria-Label"), "aria-label");
    }

    #[test]
    fn test_matches_camel_case_bindings() {
        let (doc, element) =
            first_element(r#"<name-tag firstName.bind="a" last-name.bind="b" onClick="c">"#);
        let matched: Vec<_> = element
            .attributes
            .iter()
            .filter(|a| InvalidAttributeCasingRule.matches(a, &element, &doc))
            .collect();
        assert_eq!(matched.len(), 1);

        let diag = InvalidAttributeCasingRule.diagnostic(matched[0], &element, &doc);
        assert_eq!(
            diag.message,
            "'firstName.bind' is not valid attribute casing, use 'first-name.bind'"
        );
    }
}
