use std::path::PathBuf;

/// Lifecycle failures of a [`crate::document::PromptParser`].
///
/// Content problems are never errors; they surface as diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    #[error("Prompt parser for '{uri}' is disposed")]
    Disposed { uri: String },
    #[error("Prompt parser for '{uri}' needs a tokio runtime to start parsing")]
    NoRuntime { uri: String },
}

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("File is not valid UTF-8: {0}")]
    InvalidUtf8(PathBuf),
    #[error("Invalid prompts directory: {0}")]
    InvalidRoot(String),
}
