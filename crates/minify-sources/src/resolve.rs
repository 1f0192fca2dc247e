use std::path::{Path, PathBuf};

use glob::MatchOptions;
use minify_core::{Error, Result};
use tracing::{debug, warn};

/// Pattern served by a plain recursive walk instead of glob expansion
pub const DEFAULT_PATTERN: &str = "**/*.md";

/// Resolve the files a run should process.
///
/// A single file bypasses pattern matching and exclusions. Otherwise every
/// regular file under `source_root` matching `pattern` is returned, minus any
/// path containing one of the `exclude` substrings. Results are sorted.
pub fn resolve_files(
    source_root: &Path,
    pattern: &str,
    exclude: &[String],
    single_file: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    if let Some(file) = single_file {
        if !file.is_file() {
            return Err(Error::FileNotFound(file.to_path_buf()));
        }
        return Ok(vec![file.to_path_buf()]);
    }

    if !source_root.is_dir() {
        return Err(Error::SourceNotFound(source_root.to_path_buf()));
    }

    let mut files = if pattern == DEFAULT_PATTERN {
        walk_markdown(source_root, exclude)
    } else {
        expand_glob(source_root, pattern)?
    };

    files.retain(|path| !is_excluded(path, exclude));

    // Sort for determinism
    files.sort();

    debug!(
        "Resolved {} files under {} matching {}",
        files.len(),
        source_root.display(),
        pattern
    );

    Ok(files)
}

/// Whether the full path string contains any of the exclusion substrings
pub fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    let path_str = path.display().to_string();
    exclude.iter().any(|pattern| path_str.contains(pattern.as_str()))
}

// Unreadable directories are skipped, not fatal
fn walk_markdown(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded(e.path(), exclude))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                None
            }
        })
        .filter(|entry| entry.path().is_file() && is_markdown(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn expand_glob(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&root.display().to_string());
    let full = format!("{}/{}", root.trim_end_matches('/'), pattern);

    // `*` stays within one path segment; `**` crosses directories
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut files = Vec::new();
    for entry in glob::glob_with(&full, options)
        .map_err(|e| Error::InvalidPattern(format!("{}: {}", pattern, e)))?
    {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable path: {}", e),
        }
    }

    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
