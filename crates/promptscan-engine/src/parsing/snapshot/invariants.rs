use xi_rope::Rope;

use crate::parsing::{ParseResult, rope::SourceRange};

fn check_range(what: &str, range: SourceRange, line_count: usize) {
    assert!(
        range.start_line >= 1 && range.start_column >= 1,
        "{what} range is not 1-based: {range}"
    );
    assert!(
        range.start() <= (range.end_line, range.end_column),
        "{what} range ends before it starts: {range}"
    );
    assert!(
        range.end_line <= line_count,
        "{what} range past the last line: {range} (line count: {line_count})"
    );
}

/// Validates parser output invariants.
///
/// Asserts that:
/// - All ranges are 1-based, ordered, and within the document's lines
/// - Each reference's path range lies inside its full range
/// - References and diagnostics are in ascending position order
/// - References never start inside the header block
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(rope: &Rope, result: &ParseResult) {
    let line_count = rope.line_of_offset(rope.len()) + 1;

    if let Some(header) = &result.header {
        check_range("header", header.range, line_count);
        for record in &header.records {
            check_range("record name", record.name_range, line_count);
            check_range("record value", record.value_range, line_count);
        }
        for diagnostic in &header.diagnostics {
            check_range("diagnostic", diagnostic.range, line_count);
        }
        assert!(
            header
                .diagnostics
                .windows(2)
                .all(|w| w[0].range.start() <= w[1].range.start()),
            "diagnostics out of order"
        );
        assert_eq!(
            header.range.start_line, 1,
            "header must start on the first line"
        );
    }

    for r in &result.references {
        check_range("reference", r.range, line_count);
        check_range("reference path", r.path_range, line_count);
        assert!(
            r.range.start() <= r.path_range.start()
                && (r.path_range.end_line, r.path_range.end_column)
                    <= (r.range.end_line, r.range.end_column),
            "path range {} not inside reference range {}",
            r.path_range,
            r.range
        );
        if let Some(header) = &result.header {
            assert!(
                r.range.start_line > header.range.end_line,
                "reference {} inside header {}",
                r.range,
                header.range
            );
        }
    }
    assert!(
        result
            .references
            .windows(2)
            .all(|w| w[0].range.start() < w[1].range.start()),
        "references out of order"
    );
}
