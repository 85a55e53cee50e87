//! Reference syntaxes with their owned delimiters.
//!
//! The scanner calls these constants; it never hardcodes `#file:` or `](`.

/// Inline tag reference: `#file:<path>`.
pub struct FileTag;

impl FileTag {
    pub const MARKER: &'static str = "#file:";

    /// The path token ends at the first whitespace character.
    pub fn ends_path(c: char) -> bool {
        c.is_whitespace()
    }
}

/// Inline Markdown link reference: `[label](<path>)`.
pub struct MarkdownLink;

impl MarkdownLink {
    pub const LABEL_OPEN: char = '[';
    pub const LABEL_CLOSE: char = ']';
    pub const TARGET_OPEN: char = '(';
    pub const TARGET_CLOSE: char = ')';
    /// Escapes the following character inside the target.
    pub const ESCAPE: char = '\\';
}
