//! Rename plans and their on-disk encodings.
//!
//! A plan is an ordered list of `(src, dst)` moves. It is written both as a
//! pretty-printed JSON array of `{"src": .., "dst": ..}` objects and as a CSV
//! file with a `src,dst` header; either file can later drive an undo.
use crate::error::{RenameError, RenameResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single pending move. `src` and `dst` always differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanItem {
    /// Current path of the file.
    pub src: PathBuf,
    /// Path the file will be moved to.
    pub dst: PathBuf,
}

impl PlanItem {
    pub fn new(src: PathBuf, dst: PathBuf) -> Self {
        Self { src, dst }
    }
}

/// Ordered sequence of moves, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    items: Vec<PlanItem>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: PlanItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanItem> {
        self.items.iter()
    }

    /// Writes the plan as a JSON array of `{src, dst}` records.
    pub fn save_json(&self, path: &Path) -> RenameResult<()> {
        let json = serde_json::to_string_pretty(&self.items).map_err(|e| {
            RenameError::PlanWriteFailed {
                path: path.to_path_buf(),
                reason: format!("JSON serialization failed: {}", e),
            }
        })?;

        fs::write(path, json).map_err(|e| RenameError::PlanWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), items = self.len(), "wrote JSON plan");
        Ok(())
    }

    /// Writes the plan as CSV with a `src,dst` header. The header is present
    /// even for an empty plan.
    pub fn save_csv(&self, path: &Path) -> RenameResult<()> {
        let write_failed = |reason: String| RenameError::PlanWriteFailed {
            path: path.to_path_buf(),
            reason,
        };

        let mut writer = csv::Writer::from_path(path).map_err(|e| write_failed(e.to_string()))?;
        writer
            .write_record(["src", "dst"])
            .map_err(|e| write_failed(e.to_string()))?;
        for item in &self.items {
            writer
                .write_record([
                    item.src.to_string_lossy().as_ref(),
                    item.dst.to_string_lossy().as_ref(),
                ])
                .map_err(|e| write_failed(e.to_string()))?;
        }
        writer.flush().map_err(|e| write_failed(e.to_string()))?;

        debug!(path = %path.display(), items = self.len(), "wrote CSV plan");
        Ok(())
    }

    /// Reads a plan written by [`Plan::save_json`].
    pub fn load_json(path: &Path) -> RenameResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| RenameError::PlanReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let items: Vec<PlanItem> =
            serde_json::from_str(&json).map_err(|e| RenameError::InvalidPlanFormat {
                path: path.to_path_buf(),
                reason: format!("JSON parse error: {}", e),
            })?;

        Ok(Self { items })
    }

    /// Reads a plan written by [`Plan::save_csv`].
    pub fn load_csv(path: &Path) -> RenameResult<Self> {
        let content = fs::read(path).map_err(|e| RenameError::PlanReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut reader = csv::Reader::from_reader(content.as_slice());
        let items = reader
            .deserialize::<PlanItem>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RenameError::InvalidPlanFormat {
                path: path.to_path_buf(),
                reason: format!("CSV parse error: {}", e),
            })?;

        Ok(Self { items })
    }

    /// Reads a plan, choosing the decoder from the extension: `.csv` is read as
    /// CSV, anything else as JSON.
    pub fn load(path: &Path) -> RenameResult<Self> {
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            Self::load_csv(path)
        } else {
            Self::load_json(path)
        }
    }
}

impl From<Vec<PlanItem>> for Plan {
    fn from(items: Vec<PlanItem>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PlanItem;
    type IntoIter = std::slice::Iter<'a, PlanItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
