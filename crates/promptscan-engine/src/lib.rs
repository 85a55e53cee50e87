pub mod document;
pub mod error;
pub mod glob;
pub mod io;
pub mod metadata;
pub mod model;
pub mod parsing;
pub mod uri;

// Re-export key types for easier usage
pub use document::{ParserStatus, PromptParser};
pub use error::{IoError, ParserError};
pub use glob::{GlobPatternValidator, GlobValidator};
pub use io::*;
pub use metadata::{ChatMode, Diagnostic, PromptMetadata, PromptType, Severity};
pub use model::{ModelState, RopeTextModel, TextModel, TextSnapshot};
pub use parsing::{
    ParseResult,
    header::{PromptHeader, RawHeaderRecord, RawValue},
    parse_prompt,
    references::{FileReference, ReferenceKind},
    rope::SourceRange,
};
pub use uri::ResourceUri;
