//! Command-line interface for tidyname.
//!
//! Handles argument parsing and orchestrates the two flows:
//! - plan: scan, suggest, build, persist, then print or apply
//! - undo: revert a previously persisted plan

use crate::config::Config;
use crate::error::{RenameError, RenameResult};
use crate::executor::PlanExecutor;
use crate::output::OutputFormatter;
use crate::plan::Plan;
use crate::planner::PlanBuilder;
use crate::provider::{HeuristicProvider, MappingProvider};
use crate::scanner::scan_with_filters;
use clap::Parser;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_JSON: &str = "rename_plan.json";
pub const DEFAULT_CSV: &str = "rename_plan.csv";

#[derive(Debug, Parser)]
#[command(name = "tidyname", version, about = "Suggest and apply safe file renames")]
pub struct Args {
    /// Root directory to scan
    #[arg(value_hint = clap::ValueHint::DirPath, default_value = ".")]
    pub root: PathBuf,

    /// Move files into category folders (images, video, audio, ...)
    #[arg(short = 'c', long, visible_alias = "categorize")]
    pub categorise: bool,

    /// Include hidden files and folders
    #[arg(short = 'H', long)]
    pub include_hidden: bool,

    /// Apply the generated plan immediately
    #[arg(short = 'a', long, conflicts_with = "undo")]
    pub apply: bool,

    /// Undo a previous plan from its JSON or CSV file
    #[arg(short = 'u', long, value_name = "PLAN")]
    pub undo: Option<PathBuf>,

    /// Path to write the plan JSON
    #[arg(long, value_name = "PATH", default_value = DEFAULT_JSON)]
    pub json: PathBuf,

    /// Path to write the plan CSV
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CSV)]
    pub csv: PathBuf,

    /// Configuration file (defaults to .tidynamerc.toml or ~/.config/tidyname/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Take new names from a CSV with `from,to` columns instead of the heuristic
    #[arg(short = 'm', long, value_name = "CSV")]
    pub mapping: Option<PathBuf>,

    /// Highest numeric suffix tried when resolving name conflicts
    #[arg(long, value_name = "N")]
    pub max_suffix: Option<u32>,

    /// Print debug logs
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameCommand {
    /// Build and persist a plan, optionally applying it.
    Plan { apply: bool },
    /// Revert the plan stored at the given path.
    Undo { plan: PathBuf },
}

/// Settings for the plan flow.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub categorise: bool,
    pub include_hidden: bool,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub mapping_path: Option<PathBuf>,
    pub max_suffix: Option<u32>,
}

impl RunOptions {
    /// Options for `root` with the default output paths and no overrides.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            categorise: false,
            include_hidden: false,
            json_path: PathBuf::from(DEFAULT_JSON),
            csv_path: PathBuf::from(DEFAULT_CSV),
            config_path: None,
            mapping_path: None,
            max_suffix: None,
        }
    }
}

impl Args {
    pub fn command(&self) -> RenameCommand {
        match &self.undo {
            Some(plan) => RenameCommand::Undo { plan: plan.clone() },
            None => RenameCommand::Plan { apply: self.apply },
        }
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            root: self.root.clone(),
            categorise: self.categorise,
            include_hidden: self.include_hidden,
            json_path: self.json.clone(),
            csv_path: self.csv.clone(),
            config_path: self.config.clone(),
            mapping_path: self.mapping.clone(),
            max_suffix: self.max_suffix,
        }
    }
}

/// Runs the command described by parsed arguments.
pub fn run_cli(args: &Args) -> RenameResult<()> {
    run_command(&args.command(), &args.options())
}

/// Runs a command with explicit options.
///
/// # Examples
///
/// ```no_run
/// use tidyname::cli::{run_command, RenameCommand, RunOptions};
///
/// let mut options = RunOptions::new("/path/to/directory");
/// options.categorise = true;
/// match run_command(&RenameCommand::Plan { apply: false }, &options) {
///     Ok(()) => println!("Plan written"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_command(command: &RenameCommand, options: &RunOptions) -> RenameResult<()> {
    match command {
        RenameCommand::Plan { apply } => plan_directory(options, *apply),
        RenameCommand::Undo { plan } => undo_plan(plan),
    }
}

/// Scans the root, builds the plan, writes both plan files, then either
/// prints the plan or applies it.
fn plan_directory(options: &RunOptions, apply: bool) -> RenameResult<()> {
    let root = options.root.as_path();
    OutputFormatter::info(&format!("Scanning {}", root.display()));

    let config = Config::load(options.config_path.as_deref())?;
    let include_hidden = options.include_hidden || config.scan.include_hidden;
    let filters = config.scan.compile()?;

    let outputs = canonical_outputs(&[options.json_path.as_path(), options.csv_path.as_path()]);
    let mut files = scan_with_filters(root, include_hidden, Some(&filters))?;
    files.retain(|f| !is_output_file(f, &outputs));

    let categorise = options.categorise || config.plan.categorise;
    let mut builder = PlanBuilder::from_config(&config).categorise(categorise);
    if let Some(max) = options.max_suffix {
        builder = builder.max_conflict_suffix(max);
    }

    let plan = match &options.mapping_path {
        Some(mapping_path) => {
            let provider = MappingProvider::from_csv(mapping_path)?;
            builder.build(root, &files, &provider)?
        }
        None => builder.build(root, &files, &HeuristicProvider)?,
    };

    plan.save_json(&options.json_path)?;
    plan.save_csv(&options.csv_path)?;

    if plan.is_empty() {
        OutputFormatter::success(&format!(
            "All {} files already have tidy names.",
            files.len()
        ));
        return Ok(());
    }

    print_plan(root, &plan, categorise);

    if apply {
        let progress = OutputFormatter::create_progress_bar(plan.len() as u64);
        let result = PlanExecutor::apply_with_progress(&plan, &progress);
        progress.finish_and_clear();
        let moved = result?;
        OutputFormatter::success(&format!("Applied rename plan ({} files).", moved));
        OutputFormatter::info(&format!(
            "Use 'tidyname --undo {}' to revert changes.",
            options.json_path.display()
        ));
    } else {
        OutputFormatter::dry_run_notice(&format!(
            "Plan written to {} and {}. Use --apply to perform changes.",
            options.json_path.display(),
            options.csv_path.display()
        ));
    }

    Ok(())
}

fn print_plan(root: &Path, plan: &Plan, categorise: bool) {
    OutputFormatter::header("Planned renames:");
    for item in plan {
        OutputFormatter::plan_item(root, &item.src, &item.dst);
    }

    if categorise {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for item in plan {
            let category = item
                .dst
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            *counts.entry(category).or_insert(0) += 1;
        }
        OutputFormatter::summary_table(&counts, plan.len());
    }
}

/// Reverts the plan at `plan_path` and reports what happened.
fn undo_plan(plan_path: &Path) -> RenameResult<()> {
    OutputFormatter::info(&format!("Undoing plan {}", plan_path.display()));

    let report = PlanExecutor::undo(plan_path)?;
    OutputFormatter::success(&format!("Restored: {}", report.restored_files));

    if !report.skipped_files.is_empty() {
        OutputFormatter::warning(&format!("Skipped: {}", report.skipped_files.len()));
        for (path, reason) in &report.skipped_files {
            println!("    - {}: {}", path.display(), reason);
        }
    }

    for backup in &report.backups {
        OutputFormatter::warning(&format!(
            "Moved a conflicting file aside: {}",
            backup.display()
        ));
    }

    if !report.failed_restores.is_empty() {
        for (path, reason) in &report.failed_restores {
            OutputFormatter::error(&format!("{}: {}", path.display(), reason));
        }
        return Err(RenameError::UndoIncomplete {
            failed: report.failed_restores.len(),
            total: report.total_processed(),
        });
    }

    OutputFormatter::success(&format!("Undo complete using {}", plan_path.display()));
    Ok(())
}

/// Canonical paths of the plan files that already exist.
fn canonical_outputs(paths: &[&Path]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .collect()
}

fn is_output_file(file: &Path, outputs: &[PathBuf]) -> bool {
    if outputs.is_empty() {
        return false;
    }
    let excluded = fs::canonicalize(file).is_ok_and(|c| outputs.contains(&c));
    if excluded {
        debug!(path = %file.display(), "skipping plan output file");
    }
    excluded
}
