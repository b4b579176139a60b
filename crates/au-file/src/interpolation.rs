//! `${...}` occurrences in template text.
//!
//! The opening `${` is found with a regex. The closing brace is found by
//! walking the body with a brace stack that skips quoted strings and
//! template literals, so `${ {a: 1}.a }` and `${ x | join:'}' }` are
//! matched whole and bodies may span lines.

use au_span::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Peekable;
use std::str::CharIndices;

static INTERPOLATION_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{").expect("interpolation pattern"));

/// One `${...}` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpolationMatch<'a> {
    /// The whole match, `${` and `}` included. Runs to the end of the text
    /// when unclosed.
    pub raw: &'a str,
    pub span: Span,
    /// The text between the braces.
    pub inner: &'a str,
    pub inner_span: Span,
    /// False when no matching `}` was found.
    pub closed: bool,
}

/// Iterator returned by [`find_interpolations`].
pub struct Interpolations<'a> {
    text: &'a str,
    pos: usize,
}

/// Find interpolations left to right.
///
/// An unclosed `${` is yielded with `closed: false`, and scanning resumes
/// right after it.
pub fn find_interpolations(text: &str) -> Interpolations<'_> {
    Interpolations { text, pos: 0 }
}

impl<'a> Iterator for Interpolations<'a> {
    type Item = InterpolationMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.text.len() {
            return None;
        }
        let start = INTERPOLATION_START.find_at(self.text, self.pos)?.start();
        let inner_start = start + 2;

        let found = match closing_brace(&self.text[inner_start..]) {
            Some(len) => {
                let inner_end = inner_start + len;
                self.pos = inner_end + 1;
                InterpolationMatch {
                    raw: &self.text[start..=inner_end],
                    span: Span::from_range(start..inner_end + 1),
                    inner: &self.text[inner_start..inner_end],
                    inner_span: Span::from_range(inner_start..inner_end),
                    closed: true,
                }
            }
            None => {
                self.pos = inner_start;
                InterpolationMatch {
                    raw: &self.text[start..],
                    span: Span::from_range(start..self.text.len()),
                    inner: &self.text[inner_start..],
                    inner_span: Span::from_range(inner_start..self.text.len()),
                    closed: false,
                }
            }
        };
        Some(found)
    }
}

enum Frame {
    Brace,
    Template,
}

/// Byte offset of the `}` closing an interpolation body.
fn closing_brace(body: &str) -> Option<usize> {
    let mut frames = vec![Frame::Brace];
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(frames.last(), Some(Frame::Template)) {
            match c {
                '\\' => {
                    chars.next();
                }
                '`' => {
                    frames.pop();
                }
                '$' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    frames.push(Frame::Brace);
                }
                _ => {}
            }
            continue;
        }

        match c {
            '\'' | '"' => skip_string(&mut chars, c)?,
            '`' => frames.push(Frame::Template),
            '{' => frames.push(Frame::Brace),
            '}' => {
                frames.pop();
                if frames.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Consume a quoted string up to and including `quote`.
fn skip_string(chars: &mut Peekable<CharIndices<'_>>, quote: char) -> Option<()> {
    while let Some((_, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return Some(());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inners(text: &str) -> Vec<&str> {
        find_interpolations(text).map(|m| m.inner).collect()
    }

    #[test]
    fn test_find_each_interpolation() {
        let found: Vec<_> = find_interpolations("<p>${first} ${last}</p>").collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].raw, "${first}");
        assert_eq!(found[0].inner, "first");
        assert_eq!(found[0].span, Span::new(3, 11));
        assert_eq!(found[0].inner_span, Span::new(5, 10));
        assert!(found[0].closed);
        assert_eq!(found[1].inner, "last");
    }

    #[test]
    fn test_no_interpolation() {
        assert_eq!(find_interpolations("$ {x} $").count(), 0);
    }

    #[test]
    fn test_braces_inside_strings_and_objects() {
        assert_eq!(
            inners("<p>${ items | join:'}' }</p><p>${ {a: 1}.a }</p>"),
            vec![" items | join:'}' ", " {a: 1}.a "]
        );
        assert_eq!(inners(r#"${ "a\"}" }"#), vec![r#" "a\"}" "#]);
    }

    #[test]
    fn test_nested_template_literal() {
        assert_eq!(inners("${ `x${ {b: 1}.b }}` } tail"), vec![" `x${ {b: 1}.b }}` "]);
    }

    #[test]
    fn test_body_spans_lines() {
        assert_eq!(inners("<p>${ a +\n b }</p>"), vec![" a +\n b "]);
    }

    #[test]
    fn test_unclosed_resumes_after_opening() {
        let found: Vec<_> = find_interpolations("${ 'open ${ok}").collect();
        assert_eq!(found.len(), 2);
        assert!(!found[0].closed);
        assert_eq!(found[0].inner_span, Span::new(2, 14));
        assert_eq!(found[1].inner, "ok");
        assert!(found[1].closed);
    }
}
