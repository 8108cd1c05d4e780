//! tidyname - propose tidy file names and apply them reversibly
//!
//! This library scans a directory tree, asks a suggestion provider for a new
//! name per file, sanitizes and de-duplicates those names into a rename plan,
//! persists the plan as JSON and CSV, and applies or undoes it. Files can
//! optionally be sorted into category folders by extension.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod file_category;
pub mod logging;
pub mod naming;
pub mod output;
pub mod plan;
pub mod planner;
pub mod provider;
pub mod scanner;

pub use config::{CompiledFilters, Config, ConfigError};
pub use error::{RenameError, RenameResult};
pub use executor::{PlanExecutor, UndoReport};
pub use file_category::{Category, FileMapper, category_of};
pub use naming::{is_valid, sanitize};
pub use plan::{Plan, PlanItem};
pub use planner::{PlanBuilder, build_plan};
pub use provider::{HeuristicProvider, MappingProvider, SuggestionProvider};
pub use scanner::scan;

pub use cli::{RenameCommand, RunOptions, run_command};
