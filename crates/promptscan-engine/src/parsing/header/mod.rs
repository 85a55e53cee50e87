//! # Header Parsing
//!
//! Front matter handling in two phases:
//!
//! 1. **Block extraction** (`block`): locate the `---` delimited block that
//!    starts on line 1
//! 2. **Grammar** (`grammar`): turn each content line into a
//!    [`RawHeaderRecord`] with exact name/value ranges
//!
//! Validation of the records against a prompt type lives in
//! [`crate::metadata`].

pub mod block;
pub mod grammar;

use serde::Serialize;

use crate::{metadata::Diagnostic, parsing::rope::SourceRange};

pub use block::{DELIMITER, HeaderBlock, find_header_block};
pub use grammar::{RawHeaderRecord, RawItem, RawValue, parse_record, parse_records};

/// A parsed header: raw text, records, and the diagnostics found validating them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptHeader {
    pub raw_text: String,
    pub range: SourceRange,
    pub records: Vec<RawHeaderRecord>,
    pub diagnostics: Vec<Diagnostic>,
}
