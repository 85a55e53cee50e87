use log::trace;

use crate::{
    parsing::{
        cursor::Cursor,
        rope::{LineRef, SourceRange, Span},
    },
    uri::{ResourceUri, resolve_reference},
};

use super::{
    kinds::{FileTag, MarkdownLink},
    types::{FileReference, ReferenceKind},
};

/// A reference located in a line, before its path is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReference {
    pub kind: ReferenceKind,
    /// Absolute byte span of the whole token.
    pub full: Span,
    /// Absolute byte span of the path inside the token.
    pub path: Span,
}

/// Scans one line left to right for non-overlapping references.
pub fn scan_line(line: &LineRef) -> Vec<RawReference> {
    let mut cur = Cursor::new(&line.text, line.span.start);
    let mut out = vec![];

    while !cur.eof() {
        if let Some(reference) = try_parse_file_tag(&mut cur) {
            out.push(reference);
            continue;
        }
        if let Some(reference) = try_parse_markdown_link(&mut cur) {
            out.push(reference);
            continue;
        }
        cur.bump();
    }

    out
}

/// Scans body lines and resolves every reference against `document`'s directory.
///
/// References come out in (line, column) order.
pub fn scan_references<'a>(
    lines: impl IntoIterator<Item = &'a LineRef>,
    document: &ResourceUri,
) -> Vec<FileReference> {
    let mut out = vec![];
    for line in lines {
        for raw in scan_line(line) {
            let reference = to_reference(line, raw, document);
            trace!(
                "line {}: {} -> {}",
                line.number,
                reference.raw_path,
                reference.resolved_uri
            );
            out.push(reference);
        }
    }
    out
}

fn to_reference(line: &LineRef, raw: RawReference, document: &ResourceUri) -> FileReference {
    let local = |sp: Span| {
        let start = sp.start - line.span.start;
        let end = sp.end - line.span.start;
        line.text[start..end].to_string()
    };
    let raw_path = local(raw.path);

    FileReference {
        kind: raw.kind,
        full_text: local(raw.full),
        resolved_uri: resolve_reference(document, &raw_path),
        raw_path,
        range: SourceRange::on_line(line, raw.full),
        path_range: SourceRange::on_line(line, raw.path),
    }
}

/// Attempts to parse `#file:<path>` at the current position.
///
/// Returns `None` if not at the marker or if the path is empty.
/// On failure, cursor position is restored.
fn try_parse_file_tag(cur: &mut Cursor<'_>) -> Option<RawReference> {
    if !cur.starts_with(FileTag::MARKER) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump_str(FileTag::MARKER);
    let path_start = cur.pos();
    cur.bump_while(|c| !FileTag::ends_path(c));
    let path_end = cur.pos();

    if path_end == path_start {
        // Nothing to resolve
        *cur = saved;
        return None;
    }

    Some(RawReference {
        kind: ReferenceKind::FileTag,
        full: Span::new(start, path_end),
        path: Span::new(path_start, path_end),
    })
}

/// Attempts to parse `[label](path)` at the current position.
///
/// The path runs to the first unescaped `)`. Returns `None` for unterminated
/// links and empty targets. On failure, cursor position is restored.
fn try_parse_markdown_link(cur: &mut Cursor<'_>) -> Option<RawReference> {
    if cur.peek() != Some(MarkdownLink::LABEL_OPEN) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump(); // [
    cur.bump_while(|c| c != MarkdownLink::LABEL_CLOSE);
    if cur.bump() != Some(MarkdownLink::LABEL_CLOSE) || cur.peek() != Some(MarkdownLink::TARGET_OPEN)
    {
        *cur = saved;
        return None;
    }
    cur.bump(); // (
    let path_start = cur.pos();

    loop {
        match cur.peek() {
            None => {
                // Not closed, restore cursor
                *cur = saved;
                return None;
            }
            Some(MarkdownLink::TARGET_CLOSE) => break,
            Some(MarkdownLink::ESCAPE) => {
                cur.bump();
                cur.bump();
            }
            Some(_) => {
                cur.bump();
            }
        }
    }
    let path_end = cur.pos();
    cur.bump(); // )
    let end = cur.pos();

    if path_end == path_start {
        *cur = saved;
        return None;
    }

    Some(RawReference {
        kind: ReferenceKind::MarkdownLink,
        full: Span::new(start, end),
        path: Span::new(path_start, path_end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::lines_with_spans;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use xi_rope::Rope;

    fn lines(text: &str) -> Vec<LineRef> {
        lines_with_spans(&Rope::from(text)).collect()
    }

    fn paths(text: &str) -> Vec<String> {
        let doc = ResourceUri::file("/foo/bar.md");
        scan_references(&lines(text), &doc)
            .into_iter()
            .map(|r| r.raw_path)
            .collect()
    }

    #[test]
    fn file_tag_in_running_text() {
        let doc = ResourceUri::file("/foo/bar.md");
        let refs = scan_references(
            &lines("Critical #file:./folder/binary.file thinking..."),
            &doc,
        );
        assert_eq!(refs.len(), 1);
        let r = &refs[0];
        assert_eq!(r.kind, ReferenceKind::FileTag);
        assert_eq!(r.full_text, "#file:./folder/binary.file");
        assert_eq!(r.raw_path, "./folder/binary.file");
        assert_eq!(r.resolved_uri.to_string(), "file:///foo/folder/binary.file");
        assert_eq!(r.range, SourceRange::new(1, 10, 1, 36));
        assert_eq!(r.path_range, SourceRange::new(1, 16, 1, 36));
    }

    #[test]
    fn markdown_link_spans() {
        let doc = ResourceUri::file("/foo/bar.md");
        let refs = scan_references(&lines("see [the docs](../docs/a.md)."), &doc);
        assert_eq!(refs.len(), 1);
        let r = &refs[0];
        assert_eq!(r.kind, ReferenceKind::MarkdownLink);
        assert_eq!(r.full_text, "[the docs](../docs/a.md)");
        assert_eq!(r.raw_path, "../docs/a.md");
        assert_eq!(r.resolved_uri.to_string(), "file:///docs/a.md");
        assert_eq!(r.range, SourceRange::new(1, 5, 1, 29));
        assert_eq!(r.path_range, SourceRange::new(1, 16, 1, 28));
    }

    #[rstest]
    #[case::empty_tag("ends with #file:", vec![])]
    #[case::tag_then_space("#file: spaced.md", vec![])]
    #[case::unterminated_link("[text](./never-closed.md", vec![])]
    #[case::label_without_target("[text] (./gap.md)", vec![])]
    #[case::empty_target("[text]()", vec![])]
    #[case::two_per_line("#file:a.md and [b](b.md)", vec!["a.md", "b.md"])]
    #[case::adjacent_tags("#file:a.md #file:b.md", vec!["a.md", "b.md"])]
    #[case::escaped_paren("[x](a\\)b.md)", vec!["a\\)b.md"])]
    #[case::tag_inside_label("[#file:x.md](y.md)", vec!["y.md"])]
    #[case::case_preserved("#file:./Docs/README.MD", vec!["./Docs/README.MD"])]
    fn scanning_edge_cases(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(paths(text), expected);
    }

    #[test]
    fn references_are_in_line_then_column_order() {
        let refs = scan_references(
            &lines("[a](a.md) #file:b.md\nno refs here\n#file:c.md [d](d.md)"),
            &ResourceUri::file("/x/doc.md"),
        );
        let order: Vec<_> = refs.iter().map(|r| r.range.start()).collect();
        assert_eq!(order, vec![(1, 1), (1, 11), (3, 1), (3, 12)]);
    }

    #[test]
    fn utf16_columns_after_wide_characters() {
        let refs = scan_references(&lines("𝄞 #file:a.md"), &ResourceUri::file("/d.md"));
        assert_eq!(refs[0].range, SourceRange::new(1, 4, 1, 14));
    }
}
