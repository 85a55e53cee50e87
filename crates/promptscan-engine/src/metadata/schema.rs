use std::fmt;

/// A metadata record name known to at least one prompt type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    /// `description`: a string.
    Description,
    /// `mode`: one of `ask` | `edit` | `agent`.
    Mode,
    /// `tools`: an array of tool names.
    Tools,
    /// `applyTo`: a glob pattern.
    ApplyTo,
}

impl MetadataKey {
    pub const ALL: [MetadataKey; 4] = [
        MetadataKey::Description,
        MetadataKey::Mode,
        MetadataKey::Tools,
        MetadataKey::ApplyTo,
    ];

    /// The record name as written in a header. Matching is case-sensitive.
    pub fn name(self) -> &'static str {
        match self {
            MetadataKey::Description => "description",
            MetadataKey::Mode => "mode",
            MetadataKey::Tools => "tools",
            MetadataKey::ApplyTo => "applyTo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
