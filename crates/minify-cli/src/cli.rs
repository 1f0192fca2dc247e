use std::path::PathBuf;

use clap::Parser;

/// Synchronize instruction files from a source tree to a target tree.
///
/// By default files are copied unchanged. With `--use-llm` each file is
/// rewritten by an OpenAI-compatible model to use fewer tokens.
#[derive(Parser, Debug)]
#[command(name = "minify")]
#[command(about = "Sync instruction files, optionally compressing them with an LLM")]
#[command(version)]
pub struct Cli {
    /// Source directory containing instruction files [default: src]
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Target directory for compressed files [default: templates/base/.roo]
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Process a single file instead of a directory
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Glob pattern of files to include in directory mode [default: **/*.md]
    #[arg(long)]
    pub file_pattern: Option<String>,

    /// Skip any path containing this substring (repeatable) [default: rules-docs/examples/]
    #[arg(long = "exclude-patterns", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Enable external LLM compression
    #[arg(long)]
    pub use_llm: bool,

    /// OpenAI-compatible API endpoint
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub llm_endpoint: Option<String>,

    /// Model to use for LLM compression
    #[arg(long, env = "LLM_MODEL")]
    pub llm_model: Option<String>,

    /// Token encoding (o200k_base, cl100k_base, p50k_base, r50k_base)
    #[arg(long)]
    pub encoding: Option<String>,

    /// Config file (defaults to the nearest minify.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}
