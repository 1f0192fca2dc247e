use anyhow::{Context, Result};
use colored::Colorize;
use minify_config::Config;
use minify_core::NoopObserver;
use minify_engine::{SyncReport, Synchronizer};
use minify_llm::{CompressionMode, Compressor};
use minify_sources::resolve_files;
use minify_tokens::TokenCounter;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::console::ConsoleObserver;
use crate::report;
use crate::settings::RunSettings;

pub async fn handle(cli: Cli) -> Result<()> {
    execute(&cli, std::env::var("OPENAI_API_KEY").ok()).await
}

/// Run one sync. Every fatal check happens before the target root is touched.
pub async fn execute(cli: &Cli, api_key: Option<String>) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let settings = RunSettings::resolve(cli, &config, api_key)?;

    let counter = TokenCounter::new(settings.encoding)?;
    debug!("Counting tokens with {}", counter.encoding());

    if let CompressionMode::Api(api) = &settings.mode {
        info!("Using LLM endpoint: {}", api.endpoint);
        info!("Using model: {}", api.model);
    }

    let files = resolve_files(
        &settings.source,
        &settings.file_pattern,
        &settings.exclude_patterns,
        settings.single_file.as_deref(),
    )?;

    let compressor = Compressor::new(&settings.mode, counter)?;

    if !settings.target.exists() {
        tokio::fs::create_dir_all(&settings.target)
            .await
            .with_context(|| {
                format!(
                    "Failed to create target directory {}",
                    settings.target.display()
                )
            })?;
        if settings.json {
            info!("Created target directory {}", settings.target.display());
        } else {
            println!(
                "{} Created target directory {}",
                "=>".blue().bold(),
                settings.target.display()
            );
        }
    }

    let sync = Synchronizer::new(compressor, &settings.source, &settings.target);

    if settings.json {
        let run = sync.run(&files, &NoopObserver).await;
        println!("{}", serde_json::to_string_pretty(&json_output(&run))?);
        return Ok(());
    }

    if files.is_empty() {
        println!(
            "{} No files found in {}",
            "!".yellow().bold(),
            settings.source.display()
        );
        return Ok(());
    }

    report::print_configuration(&settings, files.len());

    let observer = ConsoleObserver::new(&settings.source, files.len());
    let run = sync.run(&files, &observer).await;
    observer.finish();

    report::print_results(&run, &settings.source, settings.uses_llm());
    report::print_failures(run.failures(), &settings.source);
    report::print_timing(&run);
    report::print_banner(&run.summary(), run.elapsed);

    Ok(())
}

fn json_output(report: &SyncReport) -> Value {
    json!({
        "results": report.results,
        "summary": report.summary(),
        "elapsed_secs": report.elapsed.as_secs_f64(),
    })
}
