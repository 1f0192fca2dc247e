//! Progress hooks for the sync pipeline

use std::path::Path;

use crate::result::FileResult;

/// Receives progress events while files are processed.
///
/// All methods default to no-ops so implementors only override what they show.
pub trait SyncObserver: Send + Sync {
    /// Called before a file is read. `index` is zero-based.
    fn on_file_start(&self, _file: &Path, _index: usize, _total: usize) {}

    /// Called after a file was written successfully
    fn on_file_done(&self, _result: &FileResult) {}

    /// Called when a file could not be processed
    fn on_file_error(&self, _file: &Path, _message: &str) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}
