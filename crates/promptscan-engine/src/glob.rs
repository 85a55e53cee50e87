//! Glob syntax validation for `applyTo`.
//!
//! The validator only answers "is this a syntactically valid glob?"; matching
//! files against the pattern is left to consumers.

/// Decides whether a string is a syntactically valid glob pattern.
pub trait GlobValidator: Send + Sync {
    fn is_valid_glob(&self, pattern: &str) -> bool;
}

/// Validates patterns with the `glob` crate's pattern syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobPatternValidator;

impl GlobValidator for GlobPatternValidator {
    fn is_valid_glob(&self, pattern: &str) -> bool {
        glob::Pattern::new(pattern).is_ok()
    }
}

impl<F> GlobValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid_glob(&self, pattern: &str) -> bool {
        self(pattern)
    }
}
