//! # Reference Scanning
//!
//! Line-by-line scan of body text for file references.
//!
//! Two syntaxes are recognized, both producing a [`FileReference`]:
//! - **Tag**: `#file:<path>`, the path ending at whitespace or end of line
//! - **Markdown link**: `[label](<path>)`, the path ending at the first
//!   unescaped `)`
//!
//! Matches are greedy and non-overlapping, left to right. Malformed or empty
//! references produce nothing.

pub mod kinds;
pub mod scanner;
pub mod types;

pub use scanner::{RawReference, scan_line, scan_references};
pub use types::{FileReference, ReferenceKind};
