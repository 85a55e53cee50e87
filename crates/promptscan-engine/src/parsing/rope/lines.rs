use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of the line content, excluding the `\n` / `\r\n` terminator.
    pub span: Span,
    /// The line text without its terminator.
    pub text: String,
}

impl LineRef {
    /// The line text with trailing whitespace removed.
    pub fn trimmed_end(&self) -> &str {
        self.text.trim_end()
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so that span arithmetic stays exact for both `\n` and
/// `\r\n` documents; the terminator is stripped from `text` and `span` so the
/// two line-ending styles produce identical line contents.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).enumerate().map(move |(index, line)| {
        let start = offset;
        offset += line.len();
        let text = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line.as_ref())
            .to_string();
        LineRef {
            number: index + 1,
            span: Span {
                start,
                end: start + text.len(),
            },
            text,
        }
    })
}
