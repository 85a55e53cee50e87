//! # Host Text Model
//!
//! The parser reads documents through the [`TextModel`] trait: full or
//! ranged text, line access, the document's locator, and a change stream.
//!
//! Changes are published on a `tokio::sync::watch` channel of
//! [`ModelState`]. A watch channel only keeps the latest value, so a burst of
//! edits coalesces into a single wake-up for the parser.
//!
//! [`RopeTextModel`] is the in-process implementation backed by an
//! `xi_rope::Rope`.

pub mod rope_model;

use tokio::sync::watch;

use crate::uri::ResourceUri;

pub use rope_model::RopeTextModel;

/// The observable state of a text model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelState {
    /// Incremented on every content change.
    pub version: u64,
    /// Set once; a disposed model never changes again.
    pub disposed: bool,
}

/// Text and version captured atomically.
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    pub version: u64,
    pub text: String,
}

/// A document the parser can read and observe.
pub trait TextModel: Send + Sync + 'static {
    /// Absolute locator of this document; the base for reference resolution.
    fn uri(&self) -> &ResourceUri;

    /// The full text.
    fn text(&self) -> String;

    /// The text of a byte range, clamped to the document.
    fn slice(&self, range: std::ops::Range<usize>) -> String;

    /// Number of lines; an empty document has one (empty) line.
    fn line_count(&self) -> usize;

    /// Text and version read under one lock.
    fn snapshot(&self) -> TextSnapshot;

    /// Current content version.
    fn version(&self) -> u64 {
        self.state().version
    }

    fn is_disposed(&self) -> bool {
        self.state().disposed
    }

    /// The latest published state.
    fn state(&self) -> ModelState;

    /// Subscribes to content changes and disposal.
    fn subscribe(&self) -> watch::Receiver<ModelState>;
}
