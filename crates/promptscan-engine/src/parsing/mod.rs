pub mod cursor;
pub mod header;
pub mod references;
pub mod rope;
pub mod snapshot;

use serde::Serialize;
use xi_rope::Rope;

use crate::{
    glob::GlobValidator,
    metadata::{Diagnostic, PromptMetadata, PromptType, validate},
    uri::ResourceUri,
};

use header::{PromptHeader, find_header_block, parse_records};
use references::{FileReference, scan_references};
use rope::{LineRef, lines_with_spans};

/// Everything one parse pass learns about a prompt document.
///
/// `header` and `metadata` are `None` exactly when the document does not open
/// with a complete `---` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub header: Option<PromptHeader>,
    pub metadata: Option<PromptMetadata>,
    pub references: Vec<FileReference>,
}

impl ParseResult {
    /// Header diagnostics, sorted by position; empty without a header.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.header
            .as_ref()
            .map(|h| h.diagnostics.as_slice())
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().iter().any(Diagnostic::is_error)
    }
}

/// Runs the whole pipeline over `rope`: header, metadata, then references.
pub fn parse_prompt(
    rope: &Rope,
    uri: &ResourceUri,
    prompt_type: PromptType,
    globs: &dyn GlobValidator,
) -> ParseResult {
    let lines: Vec<LineRef> = lines_with_spans(rope).collect();
    let parsed = parse_header(&lines, prompt_type, globs);
    let references = scan_body(&lines, parsed.as_ref().map(|(h, _)| h), uri);
    let (header, metadata) = parsed.unzip();

    ParseResult {
        header,
        metadata,
        references,
    }
}

/// Extracts, parses and validates the header block, if the document has one.
pub fn parse_header(
    lines: &[LineRef],
    prompt_type: PromptType,
    globs: &dyn GlobValidator,
) -> Option<(PromptHeader, PromptMetadata)> {
    let block = find_header_block(lines)?;
    let records = parse_records(&block.content);
    let (metadata, diagnostics) = validate(prompt_type, &records, globs);

    let header = PromptHeader {
        raw_text: block.raw_text(),
        range: block.range,
        records,
        diagnostics,
    };
    Some((header, metadata))
}

/// Scans the lines after the header (or every line without one) for references.
pub fn scan_body(
    lines: &[LineRef],
    header: Option<&PromptHeader>,
    uri: &ResourceUri,
) -> Vec<FileReference> {
    let body_start = header.map_or(0, |h| h.range.end_line).min(lines.len());
    scan_references(&lines[body_start..], uri)
}

#[cfg(test)]
mod tests;
