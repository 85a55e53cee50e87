mod report;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, warn};
use promptscan_config::Config;
use promptscan_engine::{PromptParser, PromptType, io};

use report::{FileReport, render_json, render_text};

/// Parse prompt, instructions and chat mode files; report their metadata,
/// file references and diagnostics.
#[derive(Debug, Parser)]
#[command(name = "promptscan", version, about)]
struct Cli {
    /// Config file to use instead of ~/.config/promptscan/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Treat every file as this prompt type instead of deciding by suffix
    #[arg(long = "type", value_name = "prompt|instructions|mode")]
    prompt_type: Option<PromptType>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log parser activity at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Files or directories; defaults to the configured prompts_path
    paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, config.log_filter.as_deref());

    let targets = collect_targets(&cli, &config)?;
    if targets.is_empty() {
        warn!("no prompt files found");
    }

    let mut reports = Vec::with_capacity(targets.len());
    for (path, prompt_type) in targets {
        reports.push(parse_file(path, prompt_type).await?);
    }

    let output = match cli.format {
        Format::Text => render_text(&reports)?,
        Format::Json => render_json(&reports)?,
    };
    println!("{}", output.trim_end());

    if reports.iter().any(|r| r.result.has_errors()) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file '{}' does not exist", path.display())),
        None => Ok(Config::load()?.unwrap_or_default()),
    }
}

/// `RUST_LOG` wins; otherwise `-v` means debug, then the configured filter, then warn.
fn init_logging(verbose: bool, configured: Option<&str>) {
    let default_filter = if verbose {
        "debug"
    } else {
        configured.unwrap_or("warn")
    };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Expands the requested paths into files paired with the prompt type to parse them as.
fn collect_targets(cli: &Cli, config: &Config) -> Result<Vec<(PathBuf, PromptType)>> {
    let roots = if cli.paths.is_empty() {
        match &config.prompts_path {
            Some(path) => vec![path.clone()],
            None => bail!(
                "No paths given and no prompts_path set in {}",
                Config::config_path().display()
            ),
        }
    } else {
        cli.paths.clone()
    };

    let mut targets = Vec::new();
    for root in roots {
        if root.is_dir() {
            let files = io::scan_prompt_files(&root, |path| {
                let relative = path.strip_prefix(&root).unwrap_or(path);
                config.suffixes.prompt_type_for_path(path).is_some()
                    && !config.is_excluded(relative)
            })
            .with_context(|| format!("Failed to scan '{}'", root.display()))?;
            for file in files {
                let prompt_type = cli
                    .prompt_type
                    .or_else(|| config.suffixes.prompt_type_for_path(&file))
                    .unwrap_or(PromptType::Prompt);
                targets.push((file, prompt_type));
            }
        } else {
            let prompt_type = cli
                .prompt_type
                .or_else(|| config.suffixes.prompt_type_for_path(&root))
                .unwrap_or(PromptType::Prompt);
            targets.push((root, prompt_type));
        }
    }
    Ok(targets)
}

async fn parse_file(path: PathBuf, prompt_type: PromptType) -> Result<FileReport> {
    let model = Arc::new(
        io::load_prompt_model(&path)
            .with_context(|| format!("Failed to load '{}'", path.display()))?,
    );
    let parser = PromptParser::new(model, prompt_type);
    debug!("{parser}: parsing as {prompt_type}");

    parser.all_settled().await?;
    let result = parser.result()?.as_ref().clone();
    parser.dispose();

    Ok(FileReport {
        path,
        prompt_type,
        result,
    })
}
