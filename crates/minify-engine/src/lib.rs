//! Sequential file synchronization: read, compress, write, record.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use minify_core::{CompressionStats, FileResult, RunSummary, SyncObserver};
use minify_llm::Compressor;
use minify_sources::target_path;
use tracing::{debug, error};

/// Everything a run produced, in processing order
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub results: Vec<FileResult>,
    /// Wall-clock time for the whole run
    pub elapsed: Duration,
}

impl SyncReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary::aggregate(&self.results)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

pub struct Synchronizer {
    compressor: Compressor,
    source_root: PathBuf,
    target_root: PathBuf,
}

impl Synchronizer {
    pub fn new(
        compressor: Compressor,
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            compressor,
            source_root: source_root.into(),
            target_root: target_root.into(),
        }
    }

    pub fn target_for(&self, source: &Path) -> PathBuf {
        target_path(source, &self.source_root, &self.target_root)
    }

    /// Process `files` one at a time, in order. Individual failures are
    /// recorded and never stop the run.
    pub async fn run(&self, files: &[PathBuf], observer: &dyn SyncObserver) -> SyncReport {
        let start = Instant::now();
        let total = files.len();
        let mut results = Vec::with_capacity(total);

        for (index, file) in files.iter().enumerate() {
            observer.on_file_start(file, index, total);

            let result = self.process(file).await;
            match result.error_message() {
                Some(message) => observer.on_file_error(file, message),
                None => observer.on_file_done(&result),
            }

            results.push(result);
        }

        SyncReport {
            results,
            elapsed: start.elapsed(),
        }
    }

    /// Read, compress and write a single file
    pub async fn process(&self, source: &Path) -> FileResult {
        let start = Instant::now();
        let target = self.target_for(source);

        match self.sync_file(source, &target).await {
            Ok(stats) => {
                debug!(
                    "{} -> {} ({} -> {} bytes)",
                    source.display(),
                    target.display(),
                    stats.original_size,
                    stats.final_size
                );
                FileResult::success(source.to_path_buf(), target, start.elapsed(), stats)
            }
            Err(e) => {
                error!("Failed to process {}: {:#}", source.display(), e);
                FileResult::error(
                    source.to_path_buf(),
                    target,
                    start.elapsed(),
                    format!("{:#}", e),
                )
            }
        }
    }

    async fn sync_file(&self, source: &Path, target: &Path) -> Result<CompressionStats> {
        let content = tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read file {}", source.display()))?;

        let compressed = self.compressor.compress(&content).await;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        tokio::fs::write(target, compressed.text.as_bytes())
            .await
            .with_context(|| format!("Failed to write file {}", target.display()))?;

        if let Some(reason) = &compressed.fallback {
            debug!("{} kept its original content: {}", source.display(), reason);
        }

        let api = self.compressor.is_api();
        Ok(CompressionStats {
            original_size: content.len(),
            final_size: compressed.text.len(),
            llm_size: api.then_some(compressed.text.len()),
            tokens: api.then_some(compressed.tokens),
            fallback: compressed.fallback,
        })
    }
}
