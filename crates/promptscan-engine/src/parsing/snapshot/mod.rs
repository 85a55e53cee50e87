//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! - **`normalize`**: converts a [`ParseResult`](super::ParseResult) into a
//!   stable `Snap` that serializes (for `insta` YAML/JSON snapshots) and
//!   renders as compact text (for inline snapshots)
//! - **`invariants`**: runtime checks for parser correctness (ranges well
//!   formed and inside the document, references ordered, path ranges inside
//!   reference ranges, diagnostics sorted)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
