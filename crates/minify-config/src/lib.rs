use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the project-level config file searched for from the working directory up
pub const PROJECT_FILE: &str = "minify.toml";

/// Configuration for minify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,

    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// tiktoken encoding used for every token count in a run
    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            target: default_target(),
            file_pattern: default_file_pattern(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            encoding: default_encoding(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_source() -> String {
    "src".to_string()
}

fn default_target() -> String {
    "templates/base/.roo".to_string()
}

fn default_file_pattern() -> String {
    "**/*.md".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["rules-docs/examples/".to_string()]
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_encoding() -> String {
    "o200k_base".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl Config {
    /// Load config from `explicit` if given, else the nearest `minify.toml`
    /// above the working directory, else the user config file, else defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let current = std::env::current_dir()?;
        if let Some(path) = Self::find_project_file_from(&current) {
            return Self::load_from(&path);
        }

        match Self::user_config_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a config file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Find `minify.toml` by walking up from `start`
    pub fn find_project_file_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(PROJECT_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// User-level config file path
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "minify", "minify")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
