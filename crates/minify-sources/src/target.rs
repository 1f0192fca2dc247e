use std::path::{Component, Path, PathBuf};

/// Map a source file onto the target tree.
///
/// Files under `source_root` keep their relative layout; anything else lands
/// directly in `target_root` under its file name.
pub fn target_path(source: &Path, source_root: &Path, target_root: &Path) -> PathBuf {
    target_root.join(relative_path(source, source_root))
}

/// Path of `source` relative to `source_root`, or just its file name when it
/// lies outside the root
pub fn relative_path(source: &Path, source_root: &Path) -> PathBuf {
    let source = lexical(source);
    match source.strip_prefix(lexical(source_root)) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| source.clone()),
    }
}

// Drops `.` components so `./src/a.md` and `src/a.md` compare equal
fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
