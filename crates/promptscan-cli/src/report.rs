use std::{
    fmt::{self, Write},
    path::PathBuf,
};

use promptscan_engine::{ParseResult, PromptType, Severity};
use serde::Serialize;

/// What one file produced, ready for printing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: PathBuf,
    pub prompt_type: PromptType,
    #[serde(flatten)]
    pub result: ParseResult,
}

impl FileReport {
    fn count(&self, severity: Severity) -> usize {
        self.result
            .diagnostics()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

pub fn render_text(reports: &[FileReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for report in reports {
        write_report(&mut out, report)?;
    }

    let errors: usize = reports.iter().map(|r| r.count(Severity::Error)).sum();
    let warnings: usize = reports.iter().map(|r| r.count(Severity::Warning)).sum();
    writeln!(
        out,
        "{} file(s), {errors} error(s), {warnings} warning(s)",
        reports.len()
    )?;
    Ok(out)
}

fn write_report(out: &mut impl Write, report: &FileReport) -> fmt::Result {
    writeln!(out, "{} [{}]", report.path.display(), report.prompt_type)?;

    match &report.result.metadata {
        Some(metadata) => {
            if let Some(description) = metadata.description() {
                writeln!(out, "  description: {description}")?;
            }
            if let Some(mode) = metadata.mode() {
                writeln!(out, "  mode: {mode}")?;
            }
            if let Some(tools) = metadata.tools() {
                writeln!(out, "  tools: {}", tools.join(", "))?;
            }
            if let Some(apply_to) = metadata.apply_to() {
                writeln!(out, "  applyTo: {apply_to}")?;
            }
        }
        None => writeln!(out, "  no header")?,
    }

    for diagnostic in report.result.diagnostics() {
        writeln!(out, "  {diagnostic}")?;
    }
    for reference in &report.result.references {
        writeln!(
            out,
            "  reference {} {} -> {}",
            reference.range, reference.raw_path, reference.resolved_uri
        )?;
    }
    Ok(())
}

pub fn render_json(reports: &[FileReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
