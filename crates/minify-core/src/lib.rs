//! Core domain types for minify
//!
//! This crate contains:
//! - Per-file result records and compression statistics
//! - Run summary aggregation
//! - The observer interface the pipeline reports progress through

pub mod error;
pub mod observer;
pub mod result;
pub mod summary;

pub use error::{Error, Result};
pub use observer::{NoopObserver, SyncObserver};
pub use result::{CompressionStats, FileResult, FileStatus, TokenStats, ratio};
pub use summary::RunSummary;
