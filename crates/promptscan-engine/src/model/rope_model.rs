use std::{
    borrow::Cow,
    ops::Range,
    sync::{PoisonError, RwLock},
};

use tokio::sync::watch;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::uri::ResourceUri;

use super::{ModelState, TextModel, TextSnapshot};

/// In-memory text model over an `xi_rope::Rope` buffer.
///
/// Every mutation bumps the version and publishes a [`ModelState`] to
/// subscribers. Once disposed, mutations are ignored.
pub struct RopeTextModel {
    uri: ResourceUri,
    /// Buffer and the version it corresponds to, updated together.
    buffer: RwLock<(Rope, u64)>,
    state: watch::Sender<ModelState>,
}

impl RopeTextModel {
    pub fn new(uri: ResourceUri, text: &str) -> Self {
        let (state, _) = watch::channel(ModelState::default());
        Self {
            uri,
            buffer: RwLock::new((Rope::from(text), 0)),
            state,
        }
    }

    /// Create a model from raw bytes, rejecting invalid UTF-8.
    pub fn from_bytes(uri: ResourceUri, bytes: &[u8]) -> Result<Self, std::str::Utf8Error> {
        Ok(Self::new(uri, std::str::from_utf8(bytes)?))
    }

    /// Replaces the whole content.
    pub fn set_text(&self, text: &str) {
        self.mutate(|rope| *rope = Rope::from(text));
    }

    /// Replaces `range` (byte offsets, clamped to the buffer) with `text`.
    pub fn apply_edit(&self, range: Range<usize>, text: &str) {
        self.mutate(|rope| {
            let range = clamp(rope, range);
            let delta: Delta<RopeInfo> = Delta::simple_edit(range, Rope::from(text), rope.len());
            *rope = delta.apply(rope);
        });
    }

    /// Text of the 1-based line `number`, without its terminator.
    pub fn line(&self, number: usize) -> Option<String> {
        let guard = self.buffer.read().unwrap_or_else(PoisonError::into_inner);
        let rope = &guard.0;
        let index = number.checked_sub(1)?;
        if index >= line_count(rope) {
            return None;
        }
        let start = rope.offset_of_line(index);
        let end = rope.offset_of_line(index + 1);
        let raw: Cow<'_, str> = rope.slice_to_cow(start..end);
        Some(raw.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Marks the model disposed and notifies subscribers.
    pub fn dispose(&self) {
        self.state.send_if_modified(|state| {
            if state.disposed {
                return false;
            }
            state.disposed = true;
            true
        });
    }

    fn mutate(&self, edit: impl FnOnce(&mut Rope)) {
        if self.is_disposed() {
            return;
        }
        let version = {
            let mut guard = self.buffer.write().unwrap_or_else(PoisonError::into_inner);
            edit(&mut guard.0);
            guard.1 += 1;
            guard.1
        };
        self.state.send_modify(|state| state.version = state.version.max(version));
    }
}

fn clamp(rope: &Rope, range: Range<usize>) -> Range<usize> {
    let len = rope.len();
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    start..end
}

fn line_count(rope: &Rope) -> usize {
    rope.line_of_offset(rope.len()) + 1
}

impl TextModel for RopeTextModel {
    fn uri(&self) -> &ResourceUri {
        &self.uri
    }

    fn text(&self) -> String {
        self.snapshot().text
    }

    fn slice(&self, range: Range<usize>) -> String {
        let guard = self.buffer.read().unwrap_or_else(PoisonError::into_inner);
        let range = clamp(&guard.0, range);
        guard.0.slice_to_cow(range).into_owned()
    }

    fn line_count(&self) -> usize {
        let guard = self.buffer.read().unwrap_or_else(PoisonError::into_inner);
        line_count(&guard.0)
    }

    fn snapshot(&self) -> TextSnapshot {
        let guard = self.buffer.read().unwrap_or_else(PoisonError::into_inner);
        TextSnapshot {
            version: guard.1,
            text: guard.0.to_string(),
        }
    }

    fn state(&self) -> ModelState {
        *self.state.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<ModelState> {
        self.state.subscribe()
    }
}
