//! Applying and undoing rename plans.
//!
//! Apply walks the plan front to back and stops at the first failure, leaving
//! earlier moves in place. Undo walks a persisted plan back to front and moves
//! each destination back to its source, skipping items whose destination is
//! gone.
use crate::error::{RenameError, RenameResult};
use crate::plan::{Plan, PlanItem};
use indicatif::ProgressBar;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of an undo run.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Number of files moved back to their source path.
    pub restored_files: usize,
    /// Destinations that no longer existed, with the reason.
    pub skipped_files: Vec<(PathBuf, String)>,
    /// Items that could not be moved back, with the reason.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Files that occupied a source path and were renamed out of the way.
    pub backups: Vec<PathBuf>,
}

impl UndoReport {
    /// Returns the total number of plan items processed.
    pub fn total_processed(&self) -> usize {
        self.restored_files + self.failed_restores.len() + self.skipped_files.len()
    }

    /// True when nothing failed. Skipped items do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed_restores.is_empty()
    }
}

/// Performs the file moves described by a plan.
pub struct PlanExecutor;

impl PlanExecutor {
    /// Applies every item in order. Returns the number of files moved.
    ///
    /// # Errors
    ///
    /// Returns [`RenameError::MoveFailed`] if a source is missing, a
    /// destination is already occupied or its directory cannot be created,
    /// which means the plan no longer matches the file system. Moves made before the failure are kept.
    pub fn apply(plan: &Plan) -> RenameResult<usize> {
        Self::apply_with_progress(plan, &ProgressBar::hidden())
    }

    /// Like [`PlanExecutor::apply`], advancing `progress` once per moved file.
    pub fn apply_with_progress(plan: &Plan, progress: &ProgressBar) -> RenameResult<usize> {
        info!(items = plan.len(), "applying plan");
        let mut moved = 0;
        for item in plan {
            Self::move_item(item)?;
            moved += 1;
            progress.inc(1);
        }
        info!(moved, "plan applied");
        Ok(moved)
    }

    fn move_item(item: &PlanItem) -> RenameResult<()> {
        let move_failed = |source: io::Error| RenameError::MoveFailed {
            src: item.src.clone(),
            dst: item.dst.clone(),
            source,
        };

        if !occupied(&item.src) {
            return Err(move_failed(io::Error::new(
                io::ErrorKind::NotFound,
                "source file not found",
            )));
        }
        if occupied(&item.dst) {
            return Err(move_failed(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "destination already exists",
            )));
        }

        ensure_parent_dir(&item.dst).map_err(move_failed)?;
        fs::rename(&item.src, &item.dst).map_err(move_failed)?;
        debug!(src = %item.src.display(), dst = %item.dst.display(), "moved");
        Ok(())
    }

    /// Loads a persisted plan (JSON or CSV) and reverts it.
    ///
    /// # Errors
    ///
    /// Only loading the plan can fail; per-item problems end up in the report.
    pub fn undo(plan_path: &Path) -> RenameResult<UndoReport> {
        let plan = Plan::load(plan_path)?;
        info!(plan = %plan_path.display(), items = plan.len(), "undoing plan");
        Ok(Self::undo_plan(&plan))
    }

    /// Reverts `plan` in reverse order.
    ///
    /// * **Destination missing**: skipped
    /// * **Source path occupied**: the occupying file is renamed to
    ///   `<name>.bak.<timestamp>` first
    /// * **Move fails**: recorded, undo continues with the next item
    pub fn undo_plan(plan: &Plan) -> UndoReport {
        let mut report = UndoReport::default();
        for item in plan.items().iter().rev() {
            if !occupied(&item.dst) {
                warn!(dst = %item.dst.display(), "destination missing, skipping");
                report.skipped_files.push((
                    item.dst.clone(),
                    "File not found at expected location".to_string(),
                ));
                continue;
            }

            match Self::restore_item(item) {
                Ok(backup) => {
                    report.restored_files += 1;
                    report.backups.extend(backup);
                }
                Err(reason) => {
                    warn!(dst = %item.dst.display(), %reason, "restore failed");
                    report.failed_restores.push((item.dst.clone(), reason));
                }
            }
        }
        report
    }

    /// Moves `item.dst` back to `item.src`, returning the backup path if the
    /// source location had to be cleared first.
    fn restore_item(item: &PlanItem) -> Result<Option<PathBuf>, String> {
        let mut backup = None;
        if occupied(&item.src) {
            let backup_path = generate_backup_path(&item.src);
            fs::rename(&item.src, &backup_path)
                .map_err(|e| format!("Could not backup conflicting file: {}", e))?;
            debug!(backup = %backup_path.display(), "backed up conflicting file");
            backup = Some(backup_path);
        }

        ensure_parent_dir(&item.src)
            .map_err(|e| format!("Could not create parent directory: {}", e))?;
        fs::rename(&item.dst, &item.src).map_err(|e| format!("Failed to restore file: {}", e))?;
        debug!(src = %item.src.display(), "restored");
        Ok(backup)
    }
}

/// True if anything, including a dangling symlink, exists at `path`.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Example: `file.txt` becomes `file.txt.bak.20251109-143052`
fn generate_backup_path(original_path: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = original_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    original_path.with_file_name(format!("{}.bak.{}", filename, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).expect("Failed to write test file");
    }

    #[test]
    fn test_apply_creates_directories_and_moves() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let src = root.join("song.mp3");
        let dst = root.join("audio").join("Song.mp3");
        write(&src, "data");

        let plan = Plan::from(vec![PlanItem::new(src.clone(), dst.clone())]);
        let moved = PlanExecutor::apply(&plan).expect("Apply failed");

        assert_eq!(moved, 1);
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "data");
    }

    #[test]
    fn test_apply_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let first = root.join("a.txt");
        let second = root.join("b.txt");
        let taken = root.join("Taken.txt");
        write(&first, "a");
        write(&second, "b");
        write(&taken, "keep me");

        let plan = Plan::from(vec![
            PlanItem::new(first.clone(), root.join("A.txt")),
            PlanItem::new(second.clone(), taken.clone()),
        ]);
        let result = PlanExecutor::apply(&plan);

        assert!(matches!(result, Err(RenameError::MoveFailed { .. })));
        // Earlier moves stay applied, later ones untouched.
        assert!(root.join("A.txt").exists());
        assert!(second.exists());
        assert_eq!(fs::read_to_string(&taken).unwrap(), "keep me");
    }

    #[test]
    fn test_apply_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let plan = Plan::from(vec![PlanItem::new(root.join("gone.txt"), root.join("Gone.txt"))]);

        let err = PlanExecutor::apply(&plan).unwrap_err();
        assert!(matches!(err, RenameError::MoveFailed { .. }));
        assert!(err.to_string().contains("gone.txt"));
    }

    #[test]
    fn test_apply_missing_source_creates_no_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let plan = Plan::from(vec![PlanItem::new(
            root.join("gone.mp4"),
            root.join("video").join("Gone.mp4"),
        )]);

        let result = PlanExecutor::apply(&plan);
        assert!(matches!(result, Err(RenameError::MoveFailed { .. })));
        assert!(!root.join("video").exists());
    }

    #[test]
    fn test_apply_destination_dir_blocked_by_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let src = root.join("a.mp4");
        write(&src, "clip");
        write(&root.join("video"), "not a folder");

        let dst = root.join("video").join("A.mp4");
        let plan = Plan::from(vec![PlanItem::new(src.clone(), dst.clone())]);

        match PlanExecutor::apply(&plan) {
            Err(RenameError::MoveFailed { src: failed_src, dst: failed_dst, .. }) => {
                assert_eq!(failed_src, src);
                assert_eq!(failed_dst, dst);
            }
            other => panic!("expected MoveFailed, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&src).unwrap(), "clip");
    }

    #[test]
    fn test_undo_restores_in_reverse_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let a = root.join("a.txt");
        let b = root.join("b.txt");
        write(&a, "a");
        write(&b, "b");

        // b takes a's old name after a moves away; undo must free it first.
        let plan = Plan::from(vec![
            PlanItem::new(a.clone(), root.join("docs").join("A.txt")),
            PlanItem::new(b.clone(), a.clone()),
        ]);
        PlanExecutor::apply(&plan).expect("Apply failed");
        assert_eq!(fs::read_to_string(&a).unwrap(), "b");

        let report = PlanExecutor::undo_plan(&plan);
        assert_eq!(report.restored_files, 2);
        assert!(report.backups.is_empty());
        assert!(report.is_success());
        assert_eq!(fs::read_to_string(&a).unwrap(), "a");
        assert_eq!(fs::read_to_string(&b).unwrap(), "b");
    }

    #[test]
    fn test_undo_skips_missing_destinations() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let plan = Plan::from(vec![PlanItem::new(
            root.join("nonexistent.txt"),
            root.join("documents").join("Nonexistent.txt"),
        )]);

        let report = PlanExecutor::undo_plan(&plan);
        assert_eq!(report.restored_files, 0);
        assert_eq!(report.skipped_files.len(), 1);
        assert!(report.is_success());
        assert_eq!(report.total_processed(), 1);
    }

    #[test]
    fn test_undo_backs_up_occupied_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let src = root.join("test.txt");
        let dst = root.join("Test.txt");
        write(&src, "original content");

        let plan = Plan::from(vec![PlanItem::new(src.clone(), dst.clone())]);
        PlanExecutor::apply(&plan).expect("Apply failed");
        write(&src, "new content");

        let report = PlanExecutor::undo_plan(&plan);
        assert_eq!(report.restored_files, 1);
        assert_eq!(report.backups.len(), 1);
        assert_eq!(fs::read_to_string(&src).unwrap(), "original content");
        assert_eq!(fs::read_to_string(&report.backups[0]).unwrap(), "new content");
        assert!(
            report.backups[0]
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("test.txt.bak.")
        );
    }

    #[test]
    fn test_undo_from_persisted_plan() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let src = root.join("clip.mov");
        write(&src, "video");
        let plan = Plan::from(vec![PlanItem::new(src.clone(), root.join("video").join("Clip.mov"))]);
        let plan_path = root.join("plan.csv");
        plan.save_csv(&plan_path).unwrap();

        PlanExecutor::apply(&plan).unwrap();
        let report = PlanExecutor::undo(&plan_path).expect("Undo failed");
        assert_eq!(report.restored_files, 1);
        assert!(src.exists());
    }

    #[test]
    fn test_undo_missing_plan_file() {
        let result = PlanExecutor::undo(Path::new("/non/existent/plan.json"));
        assert!(result.is_err());
    }
}
