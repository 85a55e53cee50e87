use std::fmt;

use serde::Serialize;

use crate::{metadata::PromptMetadata, parsing::ParseResult};

#[derive(Debug, Serialize)]
pub struct Snap {
    pub header: Option<HeaderSnap>,
    pub metadata: Option<PromptMetadata>,
    pub diagnostics: Vec<String>,
    pub references: Vec<ReferenceSnap>,
}

#[derive(Debug, Serialize)]
pub struct HeaderSnap {
    pub range: String,
    pub records: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReferenceSnap {
    pub range: String,
    pub path_range: String,
    pub text: String,
    pub resolved: String,
}

pub fn normalize(result: &ParseResult) -> Snap {
    let header = result.header.as_ref().map(|h| HeaderSnap {
        range: h.range.to_string(),
        records: h
            .records
            .iter()
            .map(|r| {
                format!(
                    "{} {} = {} {} ({})",
                    r.name_range,
                    r.name,
                    r.value_range,
                    r.value,
                    r.value.kind_name()
                )
            })
            .collect(),
    });

    let references = result
        .references
        .iter()
        .map(|r| ReferenceSnap {
            range: r.range.to_string(),
            path_range: r.path_range.to_string(),
            text: r.full_text.clone(),
            resolved: r.resolved_uri.to_string(),
        })
        .collect();

    Snap {
        header,
        metadata: result.metadata.clone(),
        diagnostics: result.diagnostics().iter().map(|d| d.to_string()).collect(),
        references,
    }
}

impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.header {
            Some(h) => {
                writeln!(f, "header {}", h.range)?;
                for record in &h.records {
                    writeln!(f, "  {record}")?;
                }
            }
            None => writeln!(f, "no header")?,
        }
        if let Some(metadata) = &self.metadata {
            writeln!(f, "metadata {}", metadata.prompt_type())?;
            if let Some(description) = metadata.description() {
                writeln!(f, "  description: {description}")?;
            }
            if let Some(mode) = metadata.mode() {
                writeln!(f, "  mode: {mode}")?;
            }
            if let Some(tools) = metadata.tools() {
                writeln!(f, "  tools: [{}]", tools.join(", "))?;
            }
            if let Some(apply_to) = metadata.apply_to() {
                writeln!(f, "  applyTo: {apply_to}")?;
            }
        }
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        for r in &self.references {
            writeln!(f, "ref {} {} ({}) -> {}", r.range, r.text, r.path_range, r.resolved)?;
        }
        Ok(())
    }
}
