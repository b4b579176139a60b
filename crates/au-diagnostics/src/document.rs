//! The text document being validated.

use au_span::{LineColRange, LineIndex, Span};

/// A document's identity and full text, with offset to line/column
/// conversion.
#[derive(Debug, Clone)]
pub struct TextDocument {
    pub uri: String,
    pub text: String,
    line_index: LineIndex,
}

impl TextDocument {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            uri: uri.into(),
            text,
            line_index,
        }
    }

    /// Convert a byte span to a 0-based line/column range.
    pub fn range(&self, span: Span) -> LineColRange {
        self.line_index.range(span)
    }

    /// Check if the document has nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_span::LineCol;

    #[test]
    fn test_range_across_lines() {
        let doc = TextDocument::new("file:///a.html", "<div>\n  <p one-way></p>\n</div>");
        let range = doc.range(Span::new(11, 18));
        assert_eq!(range.start, LineCol::new(1, 5));
        assert_eq!(range.end, LineCol::new(1, 12));
    }

    #[test]
    fn test_is_blank() {
        assert!(TextDocument::new("a", " \n\t ").is_blank());
        assert!(!TextDocument::new("a", " <p></p> ").is_blank());
    }
}
