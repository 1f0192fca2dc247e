//! Per-file outcome records

use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Token counts taken before and after compression, under one encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TokenStats {
    pub before: usize,
    pub after: usize,
}

impl TokenStats {
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }

    /// Stats for text that was left untouched
    pub fn unchanged(count: usize) -> Self {
        Self::new(count, count)
    }

    pub fn reduction(&self) -> isize {
        self.before as isize - self.after as isize
    }

    pub fn ratio(&self) -> f64 {
        ratio(self.before, self.after)
    }
}

/// Byte and token statistics for one successfully processed file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionStats {
    pub original_size: usize,
    pub final_size: usize,
    /// Size of the model output; only set in API mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_size: Option<usize>,
    /// Only set in API mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenStats>,
    /// Why the model output was discarded and the original text kept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl CompressionStats {
    pub fn total_ratio(&self) -> f64 {
        ratio(self.original_size, self.final_size)
    }

    pub fn llm_ratio(&self) -> Option<f64> {
        self.llm_size.map(|size| ratio(self.original_size, size))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Success(CompressionStats),
    Error { message: String },
}

/// Result of processing a single source file. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub target: PathBuf,
    #[serde(serialize_with = "serialize_secs")]
    pub processing_time: Duration,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileResult {
    pub fn success(
        file: PathBuf,
        target: PathBuf,
        processing_time: Duration,
        stats: CompressionStats,
    ) -> Self {
        Self {
            file,
            target,
            processing_time,
            status: FileStatus::Success(stats),
        }
    }

    pub fn error(
        file: PathBuf,
        target: PathBuf,
        processing_time: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file,
            target,
            processing_time,
            status: FileStatus::Error {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Success(_))
    }

    pub fn stats(&self) -> Option<&CompressionStats> {
        match &self.status {
            FileStatus::Success(stats) => Some(stats),
            FileStatus::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            FileStatus::Error { message } => Some(message),
            FileStatus::Success(_) => None,
        }
    }
}

/// `original / max(final, 1)`
pub fn ratio(original: usize, compressed: usize) -> f64 {
    original as f64 / compressed.max(1) as f64
}

pub(crate) fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
