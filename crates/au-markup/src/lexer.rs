//! Character-level lexer for template markup.

use au_span::Span;

/// A cursor over template source with markup-aware helpers.
pub struct MarkupLexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> MarkupLexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Get the current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Get the remaining source.
    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Peek at the next character.
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Peek at the character after the next one.
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.remaining().chars();
        chars.next();
        chars.next()
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace and return the number of bytes skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        self.consume_while(char::is_whitespace);
        self.pos - start
    }

    /// Check if the remaining source starts with the given string.
    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    /// Consume a string if the remaining source starts with it.
    pub fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate is true.
    pub fn consume_while<F>(&mut self, pred: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if pred(c) {
                self.next_char();
            } else {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    /// Consume until the given string is found (or EOF).
    pub fn consume_until(&mut self, s: &str) -> &'a str {
        let start = self.pos;
        match self.remaining().find(s) {
            Some(idx) => self.pos += idx,
            None => self.pos = self.source.len(),
        }
        &self.source[start..self.pos]
    }

    /// Read a tag name. Must start with an ASCII letter.
    pub fn read_tag_name(&mut self) -> Option<&'a str> {
        let start = self.pos;
        match self.peek_char() {
            Some(c) if c.is_ascii_alphabetic() => {
                self.next_char();
            }
            _ => return None,
        }
        self.consume_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
        Some(&self.source[start..self.pos])
    }

    /// Read an attribute name. Binding syntax (`value.bind`,
    /// `click.delegate`) and framework prefixes are all accepted, so the
    /// name runs until whitespace, `=`, or the end of the tag.
    pub fn read_attr_name(&mut self) -> Option<&'a str> {
        let name = self.consume_while(|c| {
            !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
        });
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Read a quoted string value. HTML has no escapes inside attribute
    /// values, so the value runs to the matching quote.
    pub fn read_quoted_string(&mut self) -> Option<(&'a str, char)> {
        let quote = self.peek_char()?;
        if quote != '"' && quote != '\'' {
            return None;
        }
        self.next_char();

        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == quote {
                let value = &self.source[start..self.pos];
                self.next_char();
                return Some((value, quote));
            }
            self.next_char();
        }
        // Unterminated string - return what we have
        Some((&self.source[start..self.pos], quote))
    }

    /// Read an unquoted attribute value.
    pub fn read_unquoted_value(&mut self) -> &'a str {
        self.consume_while(|c| !c.is_whitespace() && c != '>')
    }

    /// Read a comment, returning its content.
    pub fn read_comment(&mut self) -> Option<&'a str> {
        if !self.consume("<!--") {
            return None;
        }
        let content = self.consume_until("-->");
        self.consume("-->");
        Some(content)
    }

    /// Read raw text content until the closing tag of `tag_name`
    /// (case-insensitive). The closing tag itself is not consumed.
    pub fn read_raw_text(&mut self, tag_name: &str) -> &'a str {
        let start = self.pos;
        let pattern = format!("</{}", tag_name);

        while !self.remaining().is_empty() {
            let remaining = self.remaining();
            if remaining.len() >= pattern.len()
                && remaining.is_char_boundary(pattern.len())
                && remaining[..pattern.len()].eq_ignore_ascii_case(&pattern)
            {
                let after = remaining[pattern.len()..].chars().next();
                if matches!(after, Some('>') | Some('/') | None) || after.is_some_and(char::is_whitespace)
                {
                    break;
                }
            }
            self.next_char();
        }
        &self.source[start..self.pos]
    }

    /// Check if at end of input.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Get a span from start to current position.
    pub fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }
}
