use glob::Pattern;
use promptscan_engine::PromptType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid exclude pattern '{pattern}' in {config_path}: {source}")]
    InvalidExcludePattern {
        config_path: PathBuf,
        pattern: String,
        source: glob::PatternError,
    },
}

/// File name suffixes that decide a document's prompt type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSuffixes {
    pub prompt: String,
    pub instructions: String,
    pub mode: String,
}

impl Default for FileSuffixes {
    fn default() -> Self {
        Self {
            prompt: ".prompt.md".to_string(),
            instructions: ".instructions.md".to_string(),
            mode: ".chatmode.md".to_string(),
        }
    }
}

impl FileSuffixes {
    /// The prompt type whose suffix is the longest match for `file_name`.
    pub fn prompt_type_for(&self, file_name: &str) -> Option<PromptType> {
        [
            (&self.prompt, PromptType::Prompt),
            (&self.instructions, PromptType::Instructions),
            (&self.mode, PromptType::Mode),
        ]
        .into_iter()
        .filter(|(suffix, _)| !suffix.is_empty() && file_name.ends_with(suffix.as_str()))
        .max_by_key(|(suffix, _)| suffix.len())
        .map(|(_, prompt_type)| prompt_type)
    }

    pub fn prompt_type_for_path(&self, path: &Path) -> Option<PromptType> {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| self.prompt_type_for(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned when no paths are given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts_path: Option<PathBuf>,
    /// Glob patterns, relative to the scanned directory, of files to skip.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    pub suffixes: FileSuffixes,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        for pattern in &config.exclude {
            Pattern::new(pattern).map_err(|source| ConfigError::InvalidExcludePattern {
                config_path: config_path.to_path_buf(),
                pattern: pattern.clone(),
                source,
            })?;
        }

        // Expand shell variables and tilde in the loaded config path
        config.prompts_path = config
            .prompts_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/promptscan");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// True when `relative_path` matches one of the `exclude` patterns.
    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.exclude
            .iter()
            .filter_map(|pattern| Pattern::new(pattern).ok())
            .any(|pattern| pattern.matches_path(relative_path))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
