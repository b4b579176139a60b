//! Built-in attribute rules.

mod if_conflicting;
mod invalid_casing;
mod one_way_deprecated;

pub use if_conflicting::IfConflictingAttributesRule;
pub use invalid_casing::InvalidAttributeCasingRule;
pub use one_way_deprecated::OneWayDeprecatedRule;

use crate::AttributeRule;

/// The built-in rules, in the order they are applied.
pub fn builtin_rules() -> Vec<Box<dyn AttributeRule>> {
    vec![
        Box::new(OneWayDeprecatedRule),
        Box::new(InvalidAttributeCasingRule),
        Box::new(IfConflictingAttributesRule),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::TextDocument;
    use au_markup::{tokenize, TagEvent};

    /// The document and the first element of `source`.
    pub fn first_element(source: &str) -> (TextDocument, TagEvent) {
        let element = tokenize(source)
            .unwrap()
            .into_iter()
            .find(TagEvent::is_open)
            .unwrap();
        (TextDocument::new("test.html", source), element)
    }
}
