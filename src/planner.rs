//! Turns scanned files and provider suggestions into a conflict-free plan.

use crate::config::{Config, DEFAULT_MAX_CONFLICT_SUFFIX};
use crate::error::{RenameError, RenameResult};
use crate::file_category::FileMapper;
use crate::naming::{is_valid, sanitize};
use crate::plan::{Plan, PlanItem};
use crate::provider::SuggestionProvider;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A raw, unsanitized name proposed for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub src: PathBuf,
    pub name: String,
}

/// Asks `provider` for names for the whole batch and pairs them with their files.
///
/// Fails with [`RenameError::CountMismatch`] unless exactly one name comes back
/// per file.
pub fn collect_suggestions<P>(files: &[PathBuf], provider: &P) -> RenameResult<Vec<Suggestion>>
where
    P: SuggestionProvider + ?Sized,
{
    let names = provider.suggest(files);
    if names.len() != files.len() {
        return Err(RenameError::CountMismatch {
            expected: files.len(),
            actual: names.len(),
        });
    }

    Ok(files
        .iter()
        .cloned()
        .zip(names)
        .map(|(src, name)| Suggestion { src, name })
        .collect())
}

/// Builds rename plans.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tidyname::planner::PlanBuilder;
/// use tidyname::provider::HeuristicProvider;
/// use tidyname::scanner::scan;
///
/// let root = Path::new("/path/to/photos");
/// let files = scan(root, false).unwrap();
/// let plan = PlanBuilder::new()
///     .categorise(true)
///     .build(root, &files, &HeuristicProvider)
///     .unwrap();
/// println!("{} files to move", plan.len());
/// ```
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    categorise: bool,
    max_conflict_suffix: u32,
    mapper: FileMapper,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            categorise: false,
            max_conflict_suffix: DEFAULT_MAX_CONFLICT_SUFFIX,
            mapper: FileMapper::default(),
        }
    }

    /// Builder preset from the `[plan]` and `[categories]` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            categorise: config.plan.categorise,
            max_conflict_suffix: config.plan.max_conflict_suffix,
            mapper: config.file_mapper(),
        }
    }

    /// Move files into `root/<category>` instead of renaming in place.
    pub fn categorise(mut self, categorise: bool) -> Self {
        self.categorise = categorise;
        self
    }

    pub fn max_conflict_suffix(mut self, max: u32) -> Self {
        self.max_conflict_suffix = max;
        self
    }

    pub fn mapper(mut self, mapper: FileMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Builds a plan for `files`, in the given order.
    ///
    /// Each suggestion is sanitized; if the result is not a valid name the
    /// sanitized original file name is used instead. Destinations already on
    /// disk or already claimed by an earlier item get a numeric suffix. Files
    /// that would end up at their current path are left out of the plan.
    ///
    /// Nothing on disk is modified, but a destination directory that exists as
    /// something other than a directory fails the build with
    /// [`RenameError::DirectoryCreationFailed`].
    pub fn build<P>(&self, root: &Path, files: &[PathBuf], provider: &P) -> RenameResult<Plan>
    where
        P: SuggestionProvider + ?Sized,
    {
        info!(
            root = %root.display(),
            files = files.len(),
            categorise = self.categorise,
            "building plan"
        );

        let suggestions = collect_suggestions(files, provider)?;
        let mut plan = Plan::new();
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut checked_dirs: HashSet<PathBuf> = HashSet::new();

        for Suggestion { src, name } in suggestions {
            let mut candidate = sanitize(&name);
            if !is_valid(&candidate) {
                let original = src
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                debug!(
                    src = %src.display(),
                    suggestion = %name,
                    "suggestion invalid after sanitizing, using original name"
                );
                candidate = sanitize(&original);
            }

            let dir = self.destination_dir(root, &src);
            if !checked_dirs.contains(&dir) {
                check_destination_dir(&dir)?;
                checked_dirs.insert(dir.clone());
            }

            let target = dir.join(&candidate);
            let dst = resolve_conflict(&target, &src, &claimed, self.max_conflict_suffix)?;

            if dst == src {
                debug!(src = %src.display(), "name unchanged, skipping");
                continue;
            }

            claimed.insert(dst.clone());
            plan.push(PlanItem::new(src, dst));
        }

        info!(items = plan.len(), "plan built");
        Ok(plan)
    }

    fn destination_dir(&self, root: &Path, src: &Path) -> PathBuf {
        if self.categorise {
            root.join(self.mapper.categorize(src).dir_name())
        } else {
            src.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf())
        }
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a plan with the default bound and category table.
pub fn build_plan<P>(
    root: &Path,
    files: &[PathBuf],
    provider: &P,
    categorise: bool,
) -> RenameResult<Plan>
where
    P: SuggestionProvider + ?Sized,
{
    PlanBuilder::new()
        .categorise(categorise)
        .build(root, files, provider)
}

/// Fails if `dir` exists but cannot hold files, e.g. a regular file named
/// `video` in the root when categorising.
fn check_destination_dir(dir: &Path) -> RenameResult<()> {
    match fs::metadata(dir) {
        Ok(metadata) if !metadata.is_dir() => Err(RenameError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "path exists and is not a directory"),
        }),
        _ => Ok(()),
    }
}

/// Finds a free destination for `src`, starting at `target`.
///
/// A path is free when no earlier plan item claimed it and nothing exists
/// there, except that `src` never conflicts with itself. When `target` is
/// taken, `_1`, `_2`, ... up to `_{max_suffix}` are appended to the stem.
pub fn resolve_conflict(
    target: &Path,
    src: &Path,
    claimed: &HashSet<PathBuf>,
    max_suffix: u32,
) -> RenameResult<PathBuf> {
    let is_free = |path: &Path| !claimed.contains(path) && (path == src || !path.exists());

    if is_free(target) {
        return Ok(target.to_path_buf());
    }

    for n in 1..=max_suffix {
        let candidate = with_suffix(target, n);
        if is_free(&candidate) {
            debug!(target = %target.display(), chosen = %candidate.display(), "resolved conflict");
            return Ok(candidate);
        }
    }

    Err(RenameError::ConflictResolutionExhausted {
        candidate: target.to_path_buf(),
        attempts: max_suffix,
    })
}

/// `dir/name.ext` -> `dir/name_<n>.ext`
fn with_suffix(path: &Path, n: u32) -> PathBuf {
    let mut name: OsString = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push(format!("_{n}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
