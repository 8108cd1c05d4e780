//! Scan filters and planning options loaded from TOML.
//!
//! # Configuration File Format
//!
//! ```toml
//! [scan]
//! include_hidden = false
//!
//! [scan.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp", "node_modules/**"]
//! extensions = ["bak", "tmp"]
//! regex = []
//!
//! [scan.include]
//! patterns = []
//!
//! [plan]
//! categorise = false
//! max_conflict_suffix = 9999
//!
//! [categories]
//! heic = "images"
//! ```
//!
//! Glob patterns are matched against the path relative to the scan root,
//! regexes against the file name.

use crate::file_category::{Category, FileMapper};
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default upper bound for numeric conflict suffixes (`name_1` .. `name_9999`).
pub const DEFAULT_MAX_CONFLICT_SUFFIX: u32 = 9999;

const LOCAL_CONFIG_FILE: &str = ".tidynamerc.toml";

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanRules,

    #[serde(default)]
    pub plan: PlanOptions,

    /// Extra extension to category mappings, on top of the built-in table.
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
}

/// Which files the scanner returns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScanRules {
    /// Include paths with a dot-prefixed component. Defaults to false.
    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist that overrides exclude rules.
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for excluding files from the scan.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp", "node_modules/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, without the dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Options controlling plan construction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanOptions {
    /// Sort files into category folders under the root.
    #[serde(default)]
    pub categorise: bool,

    /// Highest numeric suffix tried before giving up on a destination.
    #[serde(default = "default_max_conflict_suffix")]
    pub max_conflict_suffix: u32,
}

fn default_max_conflict_suffix() -> u32 {
    DEFAULT_MAX_CONFLICT_SUFFIX
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            categorise: false,
            max_conflict_suffix: DEFAULT_MAX_CONFLICT_SUFFIX,
        }
    }
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Looks in this order:
    /// 1. `config_path`, if provided (must exist)
    /// 2. `.tidynamerc.toml` in the current directory
    /// 3. `~/.config/tidyname/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("tidyname")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category mapper: the built-in table plus `[categories]`.
    pub fn file_mapper(&self) -> FileMapper {
        let mut mapper = FileMapper::default();
        for (ext, category) in &self.categories {
            mapper.add_extension_mapping(ext, *category);
        }
        mapper
    }
}

impl ScanRules {
    /// Compile the rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self)
    }
}

/// Pre-compiled scan filters.
#[derive(Debug)]
pub struct CompiledFilters {
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &ScanRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| {
            patterns
                .iter()
                .map(|pattern| {
                    Pattern::new(pattern)
                        .map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns: compile_globs(&rules.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&rules.include.patterns)?,
        })
    }

    /// Check if a root-relative file path passes the filters.
    ///
    /// Include patterns win; otherwise the file is dropped if its name, extension,
    /// path glob or name regex matches an exclude rule.
    pub fn should_include(&self, relative_path: &Path) -> bool {
        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return true;
        }

        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = relative_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}
