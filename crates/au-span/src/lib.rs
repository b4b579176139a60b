//! Source position tracking for Aurelia templates.
//!
//! Tag events, attributes and expressions carry byte [`Span`]s into the
//! template text. Diagnostics are reported in line/column coordinates, which
//! [`LineIndex`] converts to.

use std::ops::Range;

/// A span in the source code, representing a half-open range [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create an empty span at the given offset.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Create a span from a range.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    /// Get the length of the span.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift both ends of the span forward by `delta` bytes.
    ///
    /// Used to move spans produced against a substring (an attribute value,
    /// an interpolation body) back into whole-document coordinates.
    #[inline]
    pub const fn offset_by(self, delta: u32) -> Span {
        Span {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Slice `text` with this span. Returns `None` when the span falls
    /// outside the text or splits a UTF-8 sequence.
    #[inline]
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(self.to_range())
    }

    /// Convert to a Range<usize>.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// A line index for converting between byte offsets and line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets of the start of each line.
    line_starts: Vec<u32>,
    /// Total length of the source.
    len: u32,
}

impl LineIndex {
    /// Create a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Get the line and column for a byte offset.
    /// Line and column are 0-indexed. Offsets past the end clamp to it.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: offset - line_start,
        }
    }

    /// Convert a byte span into a line/column range.
    pub fn range(&self, span: Span) -> LineColRange {
        LineColRange {
            start: self.line_col(span.start),
            end: self.line_col(span.end),
        }
    }
}

/// A line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within line).
    pub col: u32,
}

impl LineCol {
    /// Create a new line/column position.
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Convert to 1-indexed for display.
    #[inline]
    pub const fn to_display(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}

/// A range between two line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineColRange {
    pub start: LineCol,
    pub end: LineCol,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::empty(4).is_empty());
        assert_eq!(Span::from_range(3..7), Span::new(3, 7));
    }

    #[test]
    fn test_span_offset_and_slice() {
        let text = "<div title=\"x\">";
        let span = Span::new(1, 2).offset_by(12);
        assert_eq!(span, Span::new(13, 14));
        assert_eq!(span.slice(text), Some("x"));
        assert_eq!(Span::new(10, 99).slice(text), None);
    }

    #[test]
    fn test_line_index() {
        let text = "hello\nworld\nfoo";
        let index = LineIndex::new(text);

        assert_eq!(index.line_col(0), LineCol::new(0, 0));
        assert_eq!(index.line_col(5), LineCol::new(0, 5));
        assert_eq!(index.line_col(6), LineCol::new(1, 0));
        assert_eq!(index.line_col(11), LineCol::new(1, 5));
        assert_eq!(index.line_col(12), LineCol::new(2, 0));
        assert_eq!(index.line_col(15), LineCol::new(2, 3));
    }

    #[test]
    fn test_line_index_range_clamps() {
        let index = LineIndex::new("ab\ncd");
        let range = index.range(Span::new(3, 40));
        assert_eq!(range.start, LineCol::new(1, 0));
        assert_eq!(range.end, LineCol::new(1, 2));
    }
}
