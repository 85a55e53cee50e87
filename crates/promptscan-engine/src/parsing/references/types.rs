use serde::Serialize;

use crate::{parsing::rope::SourceRange, uri::ResourceUri};

/// Which syntax produced a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceKind {
    /// `#file:<path>`
    FileTag,
    /// `[label](<path>)`
    MarkdownLink,
}

/// A located pointer to another file found in the document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub kind: ReferenceKind,
    /// The entire matched token, e.g. `#file:./a.md` or `[label](./a.md)`.
    pub full_text: String,
    /// Path text exactly as written, before resolution.
    pub raw_path: String,
    /// Absolute locator of the referenced file.
    pub resolved_uri: ResourceUri,
    /// Range of `full_text`.
    pub range: SourceRange,
    /// Range of `raw_path` only.
    pub path_range: SourceRange,
}
