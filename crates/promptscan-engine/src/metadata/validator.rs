use log::debug;

use crate::{
    glob::GlobValidator,
    parsing::{
        header::{RawHeaderRecord, RawValue},
        rope::SourceRange,
    },
};

use super::{
    diagnostic::Diagnostic,
    schema::MetadataKey,
    types::{
        ChatMode, InstructionsMetadata, ModeMetadata, PromptFileMetadata, PromptMetadata,
        PromptType,
    },
};

/// Validates raw header records against the schema of `prompt_type`.
///
/// Records are processed in header order; the first accepted occurrence of a
/// name wins. Returns the accepted metadata and all diagnostics, sorted by
/// start position (stable, so same-position findings keep evaluation order).
pub fn validate(
    prompt_type: PromptType,
    records: &[RawHeaderRecord],
    globs: &dyn GlobValidator,
) -> (PromptMetadata, Vec<Diagnostic>) {
    let mut validator = Validator {
        prompt_type,
        globs,
        accepted: Accepted::default(),
        diagnostics: vec![],
    };
    for record in records {
        validator.record(record);
    }
    validator.finish()
}

#[derive(Default)]
struct Accepted {
    description: Option<String>,
    /// The explicitly declared mode with the range of its record.
    mode: Option<(ChatMode, SourceRange)>,
    tools: Option<Vec<String>>,
    apply_to: Option<String>,
}

impl Accepted {
    fn has(&self, key: MetadataKey) -> bool {
        match key {
            MetadataKey::Description => self.description.is_some(),
            MetadataKey::Mode => self.mode.is_some(),
            MetadataKey::Tools => self.tools.is_some(),
            MetadataKey::ApplyTo => self.apply_to.is_some(),
        }
    }
}

struct Validator<'a> {
    prompt_type: PromptType,
    globs: &'a dyn GlobValidator,
    accepted: Accepted,
    diagnostics: Vec<Diagnostic>,
}

impl Validator<'_> {
    fn record(&mut self, record: &RawHeaderRecord) {
        let Some(key) =
            MetadataKey::from_name(&record.name).filter(|k| self.prompt_type.accepts(*k))
        else {
            self.warn(record.name_range, unknown(&record.name));
            return;
        };

        if self.accepted.has(key) {
            self.warn(
                record.range(),
                format!("Duplicate metadata '{}' will be ignored.", record.name),
            );
            return;
        }

        match key {
            MetadataKey::Description => self.description(record),
            MetadataKey::Mode => self.mode(record),
            MetadataKey::Tools => self.tools(record),
            MetadataKey::ApplyTo => self.apply_to(record),
        }
    }

    fn description(&mut self, record: &RawHeaderRecord) {
        match record.value.as_str() {
            Some(text) => self.accepted.description = Some(text.to_string()),
            None => self.expected_string(record),
        }
    }

    fn mode(&mut self, record: &RawHeaderRecord) {
        let token = record.value.as_str().map(str::trim);
        if let Some(mode) = token.and_then(ChatMode::from_token) {
            self.accepted.mode = Some((mode, record.range()));
            return;
        }

        match token {
            // With tools already declared an invalid mode is reported precisely
            Some(t) if self.accepted.tools.is_some() && is_single_token(t) => {
                self.error(
                    record.value_range,
                    format!(
                        "The 'mode' metadata must be one of 'ask' | 'edit' | 'agent', got '{t}'."
                    ),
                );
            }
            _ => self.warn(record.name_range, unknown(&record.name)),
        }
    }

    fn tools(&mut self, record: &RawHeaderRecord) {
        let RawValue::Array(items) = &record.value else {
            debug!(
                "ignoring {} 'tools' value on line {}",
                record.value.kind_name(),
                record.name_range.start_line
            );
            return;
        };

        let mut tools: Vec<String> = vec![];
        for item in items {
            let Some(name) = item.value.as_str() else {
                self.warn(
                    item.range,
                    format!("Unexpected tool name '{}', expected 'string'.", item.value),
                );
                continue;
            };
            if name.trim().is_empty() {
                self.warn(item.range, "Tool name cannot be empty.");
            } else if tools.iter().any(|t| t == name) {
                self.warn(item.range, format!("Duplicate tool name '{name}'."));
            } else {
                tools.push(name.to_string());
            }
        }
        self.accepted.tools = Some(tools);
    }

    fn apply_to(&mut self, record: &RawHeaderRecord) {
        match record.value.as_str() {
            Some(pattern) if !pattern.trim().is_empty() && self.globs.is_valid_glob(pattern) => {
                self.accepted.apply_to = Some(pattern.to_string());
            }
            Some(pattern) => self.warn(
                record.value_range,
                format!("Invalid glob pattern '{pattern}'."),
            ),
            None => self.expected_string(record),
        }
    }

    fn expected_string(&mut self, record: &RawHeaderRecord) {
        self.error(
            record.value_range,
            format!(
                "The '{}' metadata must be a 'string', got '{}'.",
                record.name,
                record.value.kind_name()
            ),
        );
    }

    fn warn(&mut self, range: SourceRange, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(range, message));
    }

    fn error(&mut self, range: SourceRange, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(range, message));
    }

    fn finish(mut self) -> (PromptMetadata, Vec<Diagnostic>) {
        let has_tools = self.accepted.tools.as_ref().is_some_and(|t| !t.is_empty());
        let mut mode = self.accepted.mode.map(|(mode, _)| mode);
        if has_tools {
            if let Some((declared, range)) = self.accepted.mode
                && declared != ChatMode::Agent
            {
                self.warn(
                    range,
                    "Record 'mode' is implied to have the 'agent' value if 'tools' record is present so the specified value will be ignored.",
                );
            }
            mode = Some(ChatMode::Agent);
        }

        self.diagnostics.sort_by_key(|d| d.range.start());

        let Accepted {
            description,
            tools,
            apply_to,
            ..
        } = self.accepted;
        let metadata = match self.prompt_type {
            PromptType::Prompt => PromptMetadata::Prompt(PromptFileMetadata {
                description,
                mode,
                tools,
            }),
            PromptType::Instructions => PromptMetadata::Instructions(InstructionsMetadata {
                description,
                apply_to,
            }),
            PromptType::Mode => PromptMetadata::Mode(ModeMetadata {
                description,
                mode,
                tools,
                apply_to,
            }),
        };
        (metadata, self.diagnostics)
    }
}

fn unknown(name: &str) -> String {
    format!("Unknown metadata '{name}' will be ignored.")
}

/// Non-empty text without inner whitespace, i.e. something that looks like a mode name.
fn is_single_token(text: &str) -> bool {
    !text.is_empty() && !text.contains(char::is_whitespace)
}
