//! Error types shared by planning, persistence and execution.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning, planning, persisting or applying renames.
#[derive(Debug, Error)]
pub enum RenameError {
    /// A suggestion provider returned a different number of names than files given.
    #[error("provider returned {actual} suggestions for {expected} files")]
    CountMismatch { expected: usize, actual: usize },

    /// No free numeric suffix was found for a destination.
    #[error(
        "could not find a free name for {} after {attempts} attempts",
        candidate.display()
    )]
    ConflictResolutionExhausted { candidate: PathBuf, attempts: u32 },

    /// Moving a file failed; the plan is likely stale.
    #[error("failed to move {} to {}: {source}", src.display(), dst.display())]
    MoveFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A destination directory cannot be created, e.g. a file already sits at its path.
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root is missing or not a directory.
    #[error("invalid root {}: {source}", path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed part way.
    #[error("failed to scan {}: {reason}", path.display())]
    ScanFailed { path: PathBuf, reason: String },

    /// Writing a persisted plan failed.
    #[error("failed to write plan {}: {reason}", path.display())]
    PlanWriteFailed { path: PathBuf, reason: String },

    /// Reading a persisted plan failed.
    #[error("failed to read plan {}: {source}", path.display())]
    PlanReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted plan could not be parsed.
    #[error("invalid plan file {}: {reason}", path.display())]
    InvalidPlanFormat { path: PathBuf, reason: String },

    /// A user-supplied name mapping could not be loaded.
    #[error("failed to load name mapping {}: {reason}", path.display())]
    MappingLoadFailed { path: PathBuf, reason: String },

    /// Undo finished but some files could not be moved back.
    #[error("undo incomplete: {failed} of {total} files could not be restored")]
    UndoIncomplete { failed: usize, total: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for rename operations.
pub type RenameResult<T> = Result<T, RenameError>;
