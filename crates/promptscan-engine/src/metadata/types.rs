use std::{fmt, str::FromStr};

use serde::Serialize;

use super::schema::MetadataKey;

/// The flavor of a prompt document, decided by the host from its file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    Prompt,
    Instructions,
    Mode,
}

impl PromptType {
    pub const ALL: [PromptType; 3] = [PromptType::Prompt, PromptType::Instructions, PromptType::Mode];

    pub fn as_str(self) -> &'static str {
        match self {
            PromptType::Prompt => "prompt",
            PromptType::Instructions => "instructions",
            PromptType::Mode => "mode",
        }
    }

    /// Metadata records this prompt type understands.
    pub fn schema(self) -> &'static [MetadataKey] {
        match self {
            PromptType::Prompt => &[MetadataKey::Description, MetadataKey::Mode, MetadataKey::Tools],
            PromptType::Instructions => &[MetadataKey::Description, MetadataKey::ApplyTo],
            PromptType::Mode => &[
                MetadataKey::Description,
                MetadataKey::Mode,
                MetadataKey::Tools,
                MetadataKey::ApplyTo,
            ],
        }
    }

    pub fn accepts(self, key: MetadataKey) -> bool {
        self.schema().contains(&key)
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown prompt type '{0}', expected one of 'prompt' | 'instructions' | 'mode'")]
pub struct UnknownPromptType(pub String);

impl FromStr for PromptType {
    type Err = UnknownPromptType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownPromptType(s.to_string()))
    }
}

/// The chat mode a prompt runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Ask,
    Edit,
    Agent,
}

impl ChatMode {
    /// Matches one of the literal tokens `ask`, `edit`, `agent`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ask" => Some(ChatMode::Ask),
            "edit" => Some(ChatMode::Edit),
            "agent" => Some(ChatMode::Agent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Ask => "ask",
            ChatMode::Edit => "edit",
            ChatMode::Agent => "agent",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of a `prompt` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptFileMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ChatMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

/// Metadata of an `instructions` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstructionsMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "applyTo", skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<String>,
}

/// Metadata of a `mode` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ChatMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(rename = "applyTo", skip_serializing_if = "Option::is_none")]
    pub apply_to: Option<String>,
}

/// Typed metadata, one variant per [`PromptType`].
///
/// A field is `None` when no record for it was accepted, so consumers can
/// test presence rather than value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "promptType", rename_all = "lowercase")]
pub enum PromptMetadata {
    Prompt(PromptFileMetadata),
    Instructions(InstructionsMetadata),
    Mode(ModeMetadata),
}

impl PromptMetadata {
    pub fn prompt_type(&self) -> PromptType {
        match self {
            PromptMetadata::Prompt(_) => PromptType::Prompt,
            PromptMetadata::Instructions(_) => PromptType::Instructions,
            PromptMetadata::Mode(_) => PromptType::Mode,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            PromptMetadata::Prompt(m) => m.description.as_deref(),
            PromptMetadata::Instructions(m) => m.description.as_deref(),
            PromptMetadata::Mode(m) => m.description.as_deref(),
        }
    }

    pub fn mode(&self) -> Option<ChatMode> {
        match self {
            PromptMetadata::Prompt(m) => m.mode,
            PromptMetadata::Instructions(_) => None,
            PromptMetadata::Mode(m) => m.mode,
        }
    }

    pub fn tools(&self) -> Option<&[String]> {
        match self {
            PromptMetadata::Prompt(m) => m.tools.as_deref(),
            PromptMetadata::Instructions(_) => None,
            PromptMetadata::Mode(m) => m.tools.as_deref(),
        }
    }

    pub fn apply_to(&self) -> Option<&str> {
        match self {
            PromptMetadata::Prompt(_) => None,
            PromptMetadata::Instructions(m) => m.apply_to.as_deref(),
            PromptMetadata::Mode(m) => m.apply_to.as_deref(),
        }
    }
}
