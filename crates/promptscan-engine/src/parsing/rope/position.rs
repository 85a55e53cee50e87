use std::fmt;

use serde::Serialize;

use super::{lines::LineRef, span::Span};

/// A 1-based, half-open line/column range.
///
/// Columns count UTF-16 code units so that ranges line up with editor
/// positions regardless of the characters on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl SourceRange {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Builds a range for a byte span lying on a single line.
    ///
    /// `span` is absolute (rope offsets); it is clamped to the line content.
    pub fn on_line(line: &LineRef, span: Span) -> Self {
        let start = column_of(line, span.start);
        let end = column_of(line, span.end);
        Self::new(line.number, start, line.number, end)
    }

    /// The smallest range covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: SourceRange) -> Self {
        let (start_line, start_column) =
            (self.start_line, self.start_column).min((other.start_line, other.start_column));
        let (end_line, end_column) =
            (self.end_line, self.end_column).max((other.end_line, other.end_column));
        Self::new(start_line, start_column, end_line, end_column)
    }

    /// Start position as a `(line, column)` pair, used for ordering diagnostics.
    pub fn start(&self) -> (usize, usize) {
        (self.start_line, self.start_column)
    }

    pub fn is_empty(&self) -> bool {
        self.start_line == self.end_line && self.start_column == self.end_column
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// Converts an absolute byte offset into a 1-based UTF-16 column on `line`.
pub fn column_of(line: &LineRef, offset: usize) -> usize {
    let local = offset
        .saturating_sub(line.span.start)
        .min(line.text.len());
    // Offsets produced by the scanners always sit on char boundaries; fall
    // back to the nearest earlier boundary if one does not.
    let mut boundary = local;
    while !line.text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    line.text[..boundary].encode_utf16().count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::lines_with_spans;
    use xi_rope::Rope;

    fn first_line(text: &str) -> LineRef {
        let rope = Rope::from(text);
        lines_with_spans(&rope).next().unwrap()
    }

    #[test]
    fn ascii_columns_are_one_based() {
        let line = first_line("hello world");
        assert_eq!(column_of(&line, 0), 1);
        assert_eq!(column_of(&line, 6), 7);
        assert_eq!(column_of(&line, 11), 12);
    }

    #[test]
    fn columns_count_utf16_units() {
        // 'é' is 2 bytes / 1 unit, '𝄞' is 4 bytes / 2 units
        let line = first_line("é𝄞x");
        assert_eq!(column_of(&line, 2), 2);
        assert_eq!(column_of(&line, 6), 4);
        assert_eq!(column_of(&line, 7), 5);
    }

    #[test]
    fn offsets_past_the_line_clamp_to_its_end() {
        let line = first_line("abc\n");
        assert_eq!(column_of(&line, 100), 4);
    }

    #[test]
    fn on_line_uses_line_number() {
        let rope = Rope::from("one\ntwo three");
        let line = lines_with_spans(&rope).nth(1).unwrap();
        let range = SourceRange::on_line(&line, Span::new(8, 13));
        assert_eq!(range, SourceRange::new(2, 5, 2, 10));
        assert_eq!(range.to_string(), "2:5-2:10");
    }

    #[test]
    fn cover_spans_both_ranges() {
        let a = SourceRange::new(2, 1, 2, 5);
        let b = SourceRange::new(2, 8, 2, 12);
        assert_eq!(a.cover(b), SourceRange::new(2, 1, 2, 12));
        assert_eq!(b.cover(a), SourceRange::new(2, 1, 2, 12));
    }
}
