use crate::parsing::rope::{LineRef, SourceRange, Span};

/// The `---` delimiter that opens and closes the header block.
pub const DELIMITER: &str = "---";

/// The located header block of a document.
#[derive(Debug, Clone)]
pub struct HeaderBlock {
    /// Range from the opening delimiter through the end of the closing one.
    pub range: SourceRange,
    /// Byte span of the same region.
    pub span: Span,
    /// Lines strictly between the two delimiters.
    pub content: Vec<LineRef>,
    /// 1-based number of the closing delimiter line.
    pub closing_line: usize,
}

impl HeaderBlock {
    /// Header content with one logical line per source line, joined by `\n`.
    pub fn raw_text(&self) -> String {
        self.content
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_delimiter(line: &LineRef) -> bool {
    line.trimmed_end() == DELIMITER
}

/// Finds the header block at the very start of the document.
///
/// A header exists iff line 1 is `---` (trailing whitespace ignored) and a
/// later line is `---` as well. Anything else means the whole document is body.
pub fn find_header_block(lines: &[LineRef]) -> Option<HeaderBlock> {
    let opening = lines.first().filter(|l| is_delimiter(l))?;
    let closing_index = lines.iter().skip(1).position(is_delimiter)? + 1;
    let closing = &lines[closing_index];

    Some(HeaderBlock {
        range: SourceRange::new(
            opening.number,
            1,
            closing.number,
            closing.text.encode_utf16().count() + 1,
        ),
        span: Span::new(opening.span.start, closing.span.end),
        content: lines[1..closing_index].to_vec(),
        closing_line: closing.number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::rope::lines_with_spans;
    use xi_rope::Rope;

    fn find(text: &str) -> Option<HeaderBlock> {
        let lines: Vec<_> = lines_with_spans(&Rope::from(text)).collect();
        find_header_block(&lines)
    }

    #[test]
    fn finds_block_with_content() {
        let block = find("---\ndescription: x\ntools: []\n---\nbody\n").unwrap();
        assert_eq!(block.range, SourceRange::new(1, 1, 4, 4));
        assert_eq!(block.closing_line, 4);
        assert_eq!(block.raw_text(), "description: x\ntools: []");
        assert_eq!(block.content.len(), 2);
        assert_eq!(block.content[0].number, 2);
    }

    #[test]
    fn trailing_whitespace_on_delimiters_is_ignored() {
        let block = find("---  \r\na: b\r\n--- \t\r\n").unwrap();
        assert_eq!(block.raw_text(), "a: b");
        assert_eq!(block.range, SourceRange::new(1, 1, 3, 6));
    }

    #[test]
    fn empty_header() {
        let block = find("---\n---\n").unwrap();
        assert!(block.content.is_empty());
        assert_eq!(block.raw_text(), "");
    }

    #[test]
    fn no_header_without_opening_on_line_one() {
        assert!(find("\n---\na: b\n---\n").is_none());
        assert!(find(" ---\na: b\n---\n").is_none());
        assert!(find("----\na: b\n---\n").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn no_header_without_closing_delimiter() {
        assert!(find("---\ndescription: never closed\n").is_none());
    }
}
