//! Tokenizer turning template markup into an ordered stream of tag events.
//!
//! This is a lightweight, forgiving tokenizer, not an HTML5 parser: it never
//! fails on malformed markup, it does not build a tree, and it does not infer
//! implied end tags. Content of raw-text elements (`script`, `style`,
//! `textarea`, `title`) is skipped so code inside them never produces events.

use crate::ast::{Attribute, TagEvent};
use crate::error::{MarkupError, MarkupResult};
use crate::lexer::MarkupLexer;
use au_span::Span;

/// Tokenize template markup into tag events in document order.
pub fn tokenize(source: &str) -> MarkupResult<Vec<TagEvent>> {
    if source.len() > u32::MAX as usize {
        return Err(MarkupError::too_large(source.len()));
    }
    let mut tokenizer = Tokenizer::new(source);
    Ok(tokenizer.run())
}

/// Tokenizer state for one document.
struct Tokenizer<'a> {
    lexer: MarkupLexer<'a>,
    events: Vec<TagEvent>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lexer: MarkupLexer::new(source),
            events: Vec::new(),
        }
    }

    fn run(&mut self) -> Vec<TagEvent> {
        while !self.lexer.is_eof() {
            if self.lexer.starts_with("<!--") {
                self.lexer.read_comment();
                continue;
            }

            // Doctype, CDATA, processing instructions
            if self.lexer.starts_with("<!") || self.lexer.starts_with("<?") {
                self.lexer.consume_until(">");
                self.lexer.consume(">");
                continue;
            }

            if self.lexer.starts_with("</") {
                self.close_tag();
                continue;
            }

            if self.lexer.starts_with("<")
                && self.lexer.peek_second().is_some_and(|c| c.is_ascii_alphabetic())
            {
                self.open_tag();
                continue;
            }

            // Text content
            self.lexer.next_char();
        }

        std::mem::take(&mut self.events)
    }

    /// Tokenize `</name ...>`.
    fn close_tag(&mut self) {
        let start = self.lexer.pos();
        self.lexer.consume("</");
        self.lexer.skip_whitespace();

        let name = match self.lexer.read_tag_name() {
            Some(name) => name.to_ascii_lowercase(),
            None => {
                // `</ >` or `</3`: not a tag, treat as text
                return;
            }
        };

        self.lexer.consume_until(">");
        self.lexer.consume(">");

        let span = self.lexer.span_from(start);
        self.events.push(TagEvent::close(name, span));
    }

    /// Tokenize `<name attr ...>` or `<name ... />`.
    fn open_tag(&mut self) {
        let start = self.lexer.pos();
        self.lexer.consume("<");

        let name = match self.lexer.read_tag_name() {
            Some(name) => name.to_ascii_lowercase(),
            None => return,
        };

        let attributes = self.parse_attributes();

        self.lexer.skip_whitespace();
        let self_closing = self.lexer.consume("/>");
        if !self_closing {
            self.lexer.consume(">");
        }

        let span = self.lexer.span_from(start);
        let mut event = TagEvent::open(name.as_str(), attributes, span);
        event.self_closing = self_closing;
        self.events.push(event);

        if !self_closing && is_raw_text_element(&name) {
            self.lexer.read_raw_text(&name);
        }
    }

    /// Parse attributes of an open tag.
    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attrs = Vec::new();

        loop {
            self.lexer.skip_whitespace();

            if self.lexer.starts_with(">") || self.lexer.starts_with("/>") || self.lexer.is_eof() {
                break;
            }

            // A new tag starting means this one was never closed
            if self.lexer.starts_with("<") {
                break;
            }

            let attr_start = self.lexer.pos();

            let name = match self.lexer.read_attr_name() {
                Some(n) => n,
                None => {
                    // Stray `/`, `=` or quote
                    self.lexer.next_char();
                    continue;
                }
            };
            let name_span = self.lexer.span_from(attr_start);

            let before_eq = self.lexer.pos();
            self.lexer.skip_whitespace();

            if self.lexer.consume("=") {
                self.lexer.skip_whitespace();

                let (value, value_span) =
                    if self.lexer.starts_with("\"") || self.lexer.starts_with("'") {
                        let value_start = self.lexer.pos() + 1;
                        let (v, _quote) = self.lexer.read_quoted_string().unwrap_or(("", '"'));
                        (v, Span::new(value_start as u32, (value_start + v.len()) as u32))
                    } else {
                        let value_start = self.lexer.pos();
                        let v = self.lexer.read_unquoted_value();
                        (v, self.lexer.span_from(value_start))
                    };

                let span = self.lexer.span_from(attr_start);
                attrs.push(Attribute::new(
                    name,
                    Some(value.to_string()),
                    span,
                    name_span,
                    Some(value_span),
                ));
            } else {
                // Boolean attribute; whitespace after it belongs to the next one
                let span = Span::new(attr_start as u32, before_eq as u32);
                attrs.push(Attribute::new(name, None, span, name_span, None));
            }
        }

        attrs
    }
}

/// Elements whose content is raw text rather than markup.
fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BindingType, TagKind};
    use pretty_assertions::assert_eq;

    fn kinds(events: &[TagEvent]) -> Vec<(TagKind, &str)> {
        events.iter().map(|e| (e.kind, e.name.as_str())).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("just text").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_nested_tags() {
        let events = tokenize("<template><div>Hi</div></template>").unwrap();
        assert_eq!(
            kinds(&events),
            vec![
                (TagKind::Open, "template"),
                (TagKind::Open, "div"),
                (TagKind::Close, "div"),
                (TagKind::Close, "template"),
            ]
        );
    }

    #[test]
    fn test_tokenize_offsets() {
        let source = "<script type=\"application/typescript\">let x;</script>";
        let events = tokenize(source).unwrap();
        assert_eq!(events.len(), 2);
        let open = &events[0];
        let close = &events[1];
        assert_eq!(&source[open.span.to_range()], "<script type=\"application/typescript\">");
        assert_eq!(&source[close.span.to_range()], "</script>");
        assert_eq!(
            &source[open.end_offset() as usize..close.start_offset() as usize],
            "let x;"
        );
    }

    #[test]
    fn test_tokenize_attributes() {
        let source = r#"<input value.two-way="name" disabled class='a b' data-x=1>"#;
        let events = tokenize(source).unwrap();
        let attrs = &events[0].attributes;
        assert_eq!(attrs.len(), 4);

        assert_eq!(attrs[0].raw_name.as_str(), "value.two-way");
        assert_eq!(attrs[0].name.as_str(), "value");
        assert_eq!(attrs[0].binding, Some(BindingType::TwoWay));
        assert_eq!(attrs[0].value.as_deref(), Some("name"));
        assert_eq!(&source[attrs[0].value_span.unwrap().to_range()], "name");
        assert_eq!(&source[attrs[0].name_span.to_range()], "value.two-way");

        assert_eq!(attrs[1].raw_name.as_str(), "disabled");
        assert_eq!(attrs[1].value, None);
        assert_eq!(&source[attrs[1].span.to_range()], "disabled");

        assert_eq!(attrs[2].value.as_deref(), Some("a b"));
        assert_eq!(attrs[3].value.as_deref(), Some("1"));
    }

    #[test]
    fn test_attribute_case_is_preserved() {
        let events = tokenize(r#"<DIV innerHTML.bind="html"></DIV>"#).unwrap();
        assert_eq!(events[0].name.as_str(), "div");
        assert_eq!(events[0].attributes[0].name.as_str(), "innerHTML");
        assert_eq!(events[1].name.as_str(), "div");
    }

    #[test]
    fn test_script_content_is_not_tokenized() {
        let source = "<script>if (a < b) { x = '<div>'; }</script><p></p>";
        let events = tokenize(source).unwrap();
        assert_eq!(
            kinds(&events),
            vec![
                (TagKind::Open, "script"),
                (TagKind::Close, "script"),
                (TagKind::Open, "p"),
                (TagKind::Close, "p"),
            ]
        );
    }

    #[test]
    fn test_self_closing_and_comments() {
        let source = "<!DOCTYPE html><!-- <div> --><require from=\"./a\" />";
        let events = tokenize(source).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].self_closing);
        assert_eq!(events[0].attribute_value("from"), Some("./a"));
    }

    #[test]
    fn test_unterminated_tag_is_tolerated() {
        let events = tokenize("<div class=\"a\"<span>").unwrap();
        assert_eq!(kinds(&events), vec![(TagKind::Open, "div"), (TagKind::Open, "span")]);
    }

    #[test]
    fn test_less_than_in_text() {
        let events = tokenize("<p>a < b</p>").unwrap();
        assert_eq!(events.len(), 2);
    }
}
