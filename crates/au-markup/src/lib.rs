//! Markup tokenizer for Aurelia templates.
//!
//! This crate turns template text into an ordered stream of [`TagEvent`]s
//! (open and close occurrences with attributes and byte offsets) and
//! classifies binding attributes such as `value.bind` or `click.delegate`.
//! The [`TagSource`] trait is the seam other crates depend on.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod source;
pub mod tokenizer;

pub use ast::*;
pub use error::{ErrorCode, MarkupError, MarkupResult};
pub use source::{HtmlTagSource, TagSource};
pub use tokenizer::tokenize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_template_file() {
        let source = r#"<template bindable="first, last">
  <require from="./name-tag"></require>
  <name-tag first.bind="first" click.delegate="greet()"></name-tag>
  <p>${first} ${last}</p>
</template>
"#;
        let events = tokenize(source).unwrap();
        let opens: Vec<_> = events.iter().filter(|e| e.is_open()).collect();
        assert_eq!(opens.len(), 4);
        assert_eq!(opens[0].attribute_value("bindable"), Some("first, last"));

        let bindings: Vec<_> = opens[2].binding_attributes().collect();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[1].binding, Some(BindingType::Delegate));
        assert!(bindings[1].binding.as_ref().unwrap().is_event());
    }
}
