//! # Document Parser
//!
//! [`PromptParser`] keeps a [`ParseResult`] in step with a [`TextModel`].
//!
//! ## Lifecycle
//!
//! ```text
//! Created ──parse()──▶ Parsing{v} ──pass done, nothing pending──▶ Settled{v}
//!                         ▲                                           │
//!                         └────────────── model changed ──────────────┘
//!
//! any state ──model disposed / dispose()──▶ Disposed
//! ```
//!
//! ## Passes
//!
//! A single worker task per parser runs passes one at a time. Each pass
//! captures the model version with the text, then checks the version again
//! after the header phase and after the body scan; a pass whose version has
//! been superseded is dropped without publishing. Change notifications arrive
//! on a `watch` channel, so any number of rapid edits wake the worker once.
//!
//! ## Settlement
//!
//! Status is broadcast through a `watch` channel of [`ParserStatus`].
//! [`PromptParser::all_settled`] waits on it, so every concurrent waiter
//! observes the same terminal state, and disposal wakes them with
//! [`ParserError::Disposed`].

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use log::{debug, trace};
use tokio::{
    runtime::Handle,
    sync::{Notify, watch},
    task::JoinHandle,
};
use xi_rope::Rope;

use crate::{
    error::ParserError,
    glob::{GlobPatternValidator, GlobValidator},
    metadata::{PromptMetadata, PromptType},
    model::{TextModel, TextSnapshot},
    parsing::{
        ParseResult,
        header::PromptHeader,
        parse_header,
        references::FileReference,
        rope::{LineRef, lines_with_spans},
        scan_body,
    },
    uri::ResourceUri,
};

/// Where a [`PromptParser`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserStatus {
    /// No pass has been requested yet.
    Created,
    /// A pass for this model version is running.
    Parsing { version: u64 },
    /// The result reflects this model version and no pass is pending.
    Settled { version: u64 },
    /// Terminal.
    Disposed,
}

/// Parses a prompt document and re-parses it whenever its text model changes.
pub struct PromptParser {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    model: Arc<dyn TextModel>,
    prompt_type: PromptType,
    globs: Arc<dyn GlobValidator>,
    result: RwLock<Option<Arc<ParseResult>>>,
    status: watch::Sender<ParserStatus>,
    requests: Notify,
}

impl PromptParser {
    /// A parser validating `applyTo` with [`GlobPatternValidator`].
    pub fn new<M: TextModel>(model: Arc<M>, prompt_type: PromptType) -> Self {
        Self::with_glob_validator(model, prompt_type, Arc::new(GlobPatternValidator))
    }

    pub fn with_glob_validator<M: TextModel>(
        model: Arc<M>,
        prompt_type: PromptType,
        globs: Arc<dyn GlobValidator>,
    ) -> Self {
        let model: Arc<dyn TextModel> = model;
        let initial = if model.is_disposed() {
            ParserStatus::Disposed
        } else {
            ParserStatus::Created
        };
        let (status, _) = watch::channel(initial);

        Self {
            shared: Arc::new(Shared {
                model,
                prompt_type,
                globs,
                result: RwLock::new(None),
                status,
                requests: Notify::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Requests a pass over the current text.
    ///
    /// The first call starts the worker task and fails with
    /// [`ParserError::NoRuntime`] outside a tokio runtime. Later model
    /// changes are picked up without further calls.
    pub fn parse(&self) -> Result<(), ParserError> {
        self.ensure_live()?;

        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.is_none() {
            let runtime = Handle::try_current().map_err(|_| ParserError::NoRuntime {
                uri: self.shared.model.uri().to_string(),
            })?;
            let shared = Arc::clone(&self.shared);
            *worker = Some(runtime.spawn(run(shared)));
        }
        self.shared.requests.notify_one();
        Ok(())
    }

    /// Resolves once the result reflects the model's current version.
    ///
    /// Starts parsing if nothing has been requested yet. Fails with
    /// [`ParserError::Disposed`] if the parser is, or becomes, disposed.
    pub async fn all_settled(&self) -> Result<&Self, ParserError> {
        self.ensure_live()?;
        if self.status() == ParserStatus::Created {
            self.parse()?;
        }

        let model = &self.shared.model;
        let mut status = self.shared.status.subscribe();
        let disposed = match status
            .wait_for(|status| match status {
                ParserStatus::Disposed => true,
                ParserStatus::Settled { version } => {
                    *version == model.version() && !model.is_disposed()
                }
                _ => false,
            })
            .await
        {
            Ok(status) => *status == ParserStatus::Disposed,
            Err(_) => true,
        };

        if disposed {
            return Err(self.shared.disposed_error());
        }
        Ok(self)
    }

    /// Stops the worker, releases the result and wakes every waiter.
    pub fn dispose(&self) {
        if let Some(worker) = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            worker.abort();
        }
        self.shared.finish();
    }

    pub fn status(&self) -> ParserStatus {
        *self.shared.status.borrow()
    }

    /// True once the parser or its model has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.status() == ParserStatus::Disposed || self.shared.model.is_disposed()
    }

    pub fn uri(&self) -> &ResourceUri {
        self.shared.model.uri()
    }

    pub fn prompt_type(&self) -> PromptType {
        self.shared.prompt_type
    }

    /// The latest published result; empty until the first pass completes.
    pub fn result(&self) -> Result<Arc<ParseResult>, ParserError> {
        self.ensure_live()?;
        let result = self
            .shared
            .result
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Ok(result.unwrap_or_default())
    }

    pub fn header(&self) -> Result<Option<PromptHeader>, ParserError> {
        Ok(self.result()?.header.clone())
    }

    pub fn metadata(&self) -> Result<Option<PromptMetadata>, ParserError> {
        Ok(self.result()?.metadata.clone())
    }

    pub fn references(&self) -> Result<Vec<FileReference>, ParserError> {
        Ok(self.result()?.references.clone())
    }

    fn ensure_live(&self) -> Result<(), ParserError> {
        if self.is_disposed() {
            return Err(self.shared.disposed_error());
        }
        Ok(())
    }
}

impl fmt::Display for PromptParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.shared.fmt(f)
    }
}

impl fmt::Debug for PromptParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptParser")
            .field("uri", &self.uri().to_string())
            .field("prompt_type", &self.shared.prompt_type)
            .field("status", &self.status())
            .finish()
    }
}

impl Drop for PromptParser {
    fn drop(&mut self) {
        if let Some(worker) = self
            .worker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            worker.abort();
        }
    }
}

impl fmt::Display for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text-model-prompt:{}", self.model.uri().path())
    }
}

impl Shared {
    fn disposed_error(&self) -> ParserError {
        ParserError::Disposed {
            uri: self.model.uri().to_string(),
        }
    }

    fn superseded(&self, version: u64) -> bool {
        self.model.is_disposed() || self.model.version() != version
    }

    /// One pass over `snapshot`. `None` when a newer version arrived meanwhile.
    async fn pass(&self, snapshot: TextSnapshot) -> Option<ParseResult> {
        let version = snapshot.version;
        let rope = Rope::from(snapshot.text);
        let lines: Vec<LineRef> = lines_with_spans(&rope).collect();

        let parsed = parse_header(&lines, self.prompt_type, self.globs.as_ref());
        tokio::task::yield_now().await;
        if self.superseded(version) {
            trace!("{self}: pass for version {version} superseded after header");
            return None;
        }

        let references = scan_body(&lines, parsed.as_ref().map(|(h, _)| h), self.model.uri());
        tokio::task::yield_now().await;
        if self.superseded(version) {
            trace!("{self}: pass for version {version} superseded after body scan");
            return None;
        }

        let (header, metadata) = parsed.unzip();
        Some(ParseResult {
            header,
            metadata,
            references,
        })
    }

    fn publish(&self, result: ParseResult) {
        *self.result.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(result));
    }

    fn finish(&self) {
        *self.result.write().unwrap_or_else(PoisonError::into_inner) = None;
        let previous = self.status.send_replace(ParserStatus::Disposed);
        if previous != ParserStatus::Disposed {
            debug!("{self}: disposed");
        }
    }
}

/// Worker loop: wait for a request or a model change, then run a pass.
async fn run(shared: Arc<Shared>) {
    let mut events = shared.model.subscribe();

    loop {
        tokio::select! {
            _ = shared.requests.notified() => {}
            changed = events.changed() => {
                if changed.is_err() {
                    shared.finish();
                    return;
                }
            }
        }

        if events.borrow_and_update().disposed {
            shared.finish();
            return;
        }

        let snapshot = shared.model.snapshot();
        let version = snapshot.version;
        shared.status.send_replace(ParserStatus::Parsing { version });
        debug!("{shared}: parse pass started for version {version}");

        let Some(result) = shared.pass(snapshot).await else {
            continue;
        };
        debug!(
            "{shared}: published version {version} ({} references, {} diagnostics)",
            result.references.len(),
            result.diagnostics().len()
        );
        shared.publish(result);

        if !events.has_changed().unwrap_or(false) {
            shared.status.send_replace(ParserStatus::Settled { version });
        }
    }
}
