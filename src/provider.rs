//! Suggestion providers propose a new file name for every scanned file.
//!
//! A provider receives the whole batch at once and must return exactly one
//! name per input path, in the same order. The names it returns are raw:
//! the planner sanitizes and validates them before use.

use crate::error::{RenameError, RenameResult};
use crate::naming::{is_valid, sanitize, title_case};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Produces one proposed file name per input path.
///
/// Any `Fn(&[PathBuf]) -> Vec<String>` closure is a provider too.
pub trait SuggestionProvider {
    fn suggest(&self, paths: &[PathBuf]) -> Vec<String>;
}

impl<F> SuggestionProvider for F
where
    F: Fn(&[PathBuf]) -> Vec<String>,
{
    fn suggest(&self, paths: &[PathBuf]) -> Vec<String> {
        self(paths)
    }
}

/// Default provider: title-cases the file stem.
///
/// `my_holiday-photo.JPG` becomes `My_Holiday_Photo.jpg`. If the result is not
/// a valid name the sanitized original file name is proposed instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicProvider;

impl HeuristicProvider {
    pub fn suggest_one(path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let words = stem.replace(['_', '-'], " ");
        let mut proposed = title_case(&words);
        if let Some(ext) = path.extension() {
            proposed.push('.');
            proposed.push_str(&ext.to_string_lossy().to_lowercase());
        }

        let candidate = sanitize(&proposed);
        if is_valid(&candidate) {
            candidate
        } else {
            debug!(path = %path.display(), "heuristic name invalid, keeping original");
            sanitize(&file_name_of(path))
        }
    }
}

impl SuggestionProvider for HeuristicProvider {
    fn suggest(&self, paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| Self::suggest_one(p)).collect()
    }
}

#[derive(Debug, Deserialize)]
struct MappingRecord {
    from: String,
    to: String,
}

/// User-supplied mapping from current file name to new file name.
///
/// Files without an entry keep their current name.
#[derive(Debug, Clone, Default)]
pub struct MappingProvider {
    names: HashMap<String, String>,
}

impl MappingProvider {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// Loads a mapping from a CSV file with a `from,to` header.
    pub fn from_csv(path: &Path) -> RenameResult<Self> {
        let load_failed = |reason: String| RenameError::MappingLoadFailed {
            path: path.to_path_buf(),
            reason,
        };
        let mut reader = csv::Reader::from_path(path).map_err(|e| load_failed(e.to_string()))?;
        let mut names = HashMap::new();
        for record in reader.deserialize::<MappingRecord>() {
            let record = record.map_err(|e| load_failed(e.to_string()))?;
            names.insert(record.from, record.to);
        }
        debug!(entries = names.len(), path = %path.display(), "loaded name mapping");
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SuggestionProvider for MappingProvider {
    fn suggest(&self, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|path| {
                let current = file_name_of(path);
                self.names.get(&current).cloned().unwrap_or(current)
            })
            .collect()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
