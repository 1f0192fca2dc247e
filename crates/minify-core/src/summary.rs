//! Run-level aggregation over file results

use std::time::Duration;

use serde::Serialize;

use crate::result::{FileResult, TokenStats, ratio, serialize_secs};

/// Totals over every successful file in a run. Failed files are only counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total_original: usize,
    pub total_final: usize,
    /// Successful files whose model output was discarded
    pub fallbacks: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub total_processing_time: Duration,
    /// Summed token counts; present when at least one file carried them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenStats>,
}

impl RunSummary {
    pub fn aggregate(results: &[FileResult]) -> Self {
        let mut summary = Self {
            succeeded: 0,
            failed: 0,
            total_original: 0,
            total_final: 0,
            fallbacks: 0,
            total_processing_time: Duration::ZERO,
            tokens: None,
        };

        for result in results {
            let Some(stats) = result.stats() else {
                summary.failed += 1;
                continue;
            };

            summary.succeeded += 1;
            summary.total_original += stats.original_size;
            summary.total_final += stats.final_size;
            summary.total_processing_time += result.processing_time;
            if stats.fallback.is_some() {
                summary.fallbacks += 1;
            }

            if let Some(tokens) = stats.tokens {
                let total = summary.tokens.get_or_insert_with(TokenStats::default);
                total.before += tokens.before;
                total.after += tokens.after;
            }
        }

        summary
    }

    pub fn total_files(&self) -> usize {
        self.succeeded + self.failed
    }

    /// `total_original / max(total_final, 1)`
    pub fn overall_ratio(&self) -> f64 {
        ratio(self.total_original, self.total_final)
    }

    pub fn average_processing_time(&self) -> Duration {
        if self.succeeded == 0 {
            return Duration::ZERO;
        }
        self.total_processing_time / self.succeeded as u32
    }

    pub fn token_ratio(&self) -> Option<f64> {
        self.tokens.map(|t| t.ratio())
    }
}
