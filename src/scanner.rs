//! Recursive collection of regular files under a root directory.

use crate::config::CompiledFilters;
use crate::error::{RenameError, RenameResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Lists every regular file under `root`, depth first, sorted by file name
/// within each directory.
///
/// Unless `include_hidden` is set, any entry whose own name starts with `.`
/// is skipped, and hidden directories are not descended into. The root itself
/// is never treated as hidden.
pub fn scan(root: &Path, include_hidden: bool) -> RenameResult<Vec<PathBuf>> {
    scan_with_filters(root, include_hidden, None)
}

/// Like [`scan`], additionally dropping files rejected by `filters`.
///
/// Filters see the path relative to `root`.
pub fn scan_with_filters(
    root: &Path,
    include_hidden: bool,
    filters: Option<&CompiledFilters>,
) -> RenameResult<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|e| RenameError::InvalidRoot {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(RenameError::InvalidRoot {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    info!(root = %root.display(), include_hidden, "scanning");

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| RenameError::ScanFailed {
            path: e.path().unwrap_or(root).to_path_buf(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let keep = filters.is_none_or(|f| f.should_include(path.strip_prefix(root).unwrap_or(&path)));
        if keep {
            files.push(path);
        } else {
            debug!(path = %path.display(), "excluded by filter");
        }
    }

    debug!(count = files.len(), "scan complete");
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
