//! # Metadata Validation
//!
//! Turns raw header records into typed [`PromptMetadata`] plus
//! [`Diagnostic`]s, driven by a static per-[`PromptType`] schema.
//!
//! | record        | prompt | instructions | mode |
//! |---------------|:------:|:------------:|:----:|
//! | `description` |   ✓    |      ✓       |  ✓   |
//! | `mode`        |   ✓    |              |  ✓   |
//! | `tools`       |   ✓    |              |  ✓   |
//! | `applyTo`     |        |      ✓       |  ✓   |
//!
//! Cross-field rule: a non-empty `tools` list forces `mode` to `agent`.

pub mod diagnostic;
pub mod schema;
pub mod types;
pub mod validator;

pub use diagnostic::{Diagnostic, Severity};
pub use schema::MetadataKey;
pub use types::{
    ChatMode, InstructionsMetadata, ModeMetadata, PromptFileMetadata, PromptMetadata, PromptType,
    UnknownPromptType,
};
pub use validator::validate;
