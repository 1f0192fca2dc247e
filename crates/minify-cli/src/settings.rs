//! Merges CLI flags, environment and config file into one run configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use minify_config::Config;
use minify_llm::{ApiSettings, CompressionMode};
use minify_tokens::Encoding;

use crate::cli::Cli;

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub source: PathBuf,
    pub target: PathBuf,
    pub single_file: Option<PathBuf>,
    pub file_pattern: String,
    pub exclude_patterns: Vec<String>,
    pub encoding: Encoding,
    pub mode: CompressionMode,
    pub json: bool,
}

impl RunSettings {
    /// CLI flags (and the env vars clap reads for them) win over the config
    /// file. `api_key` comes from `OPENAI_API_KEY` and is only required in
    /// API mode.
    pub fn resolve(cli: &Cli, config: &Config, api_key: Option<String>) -> Result<Self> {
        let encoding: Encoding = cli
            .encoding
            .as_deref()
            .unwrap_or(&config.llm.encoding)
            .parse()?;

        let mode = if cli.use_llm {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or(minify_core::Error::MissingApiKey)?;

            CompressionMode::Api(ApiSettings {
                endpoint: cli
                    .llm_endpoint
                    .clone()
                    .unwrap_or_else(|| config.llm.endpoint.clone()),
                api_key,
                model: cli
                    .llm_model
                    .clone()
                    .unwrap_or_else(|| config.llm.model.clone()),
                timeout: Duration::from_secs(config.llm.timeout_secs),
            })
        } else {
            CompressionMode::PassThrough
        };

        let exclude_patterns = if cli.exclude_patterns.is_empty() {
            config.sync.exclude_patterns.clone()
        } else {
            cli.exclude_patterns.clone()
        };

        Ok(Self {
            source: cli
                .source
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.sync.source)),
            target: cli
                .target
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.sync.target)),
            single_file: cli.file.clone(),
            file_pattern: cli
                .file_pattern
                .clone()
                .unwrap_or_else(|| config.sync.file_pattern.clone()),
            exclude_patterns,
            encoding,
            mode,
            json: cli.json,
        })
    }

    pub fn uses_llm(&self) -> bool {
        matches!(self.mode, CompressionMode::Api(_))
    }

    pub fn model(&self) -> Option<&str> {
        match &self.mode {
            CompressionMode::Api(api) => Some(&api.model),
            CompressionMode::PassThrough => None,
        }
    }
}
