//! Source file discovery and target path mapping

pub mod resolve;
pub mod target;

pub use resolve::{DEFAULT_PATTERN, is_excluded, resolve_files};
pub use target::{relative_path, target_path};
