//! specguard configuration management.
//!
//! Settings live in `specguard.toml` at the scan root (or a path given with
//! `--config`). A missing file means defaults; a malformed one is an error.

use crate::error::{Result, SpecGuardError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up at the scan root
pub const CONFIG_FILE_NAME: &str = "specguard.toml";

/// specguard configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SpecGuardConfig {
    /// File selection
    #[serde(default)]
    pub scan: ScanConfig,

    /// Rule thresholds and vocabularies
    #[serde(default)]
    pub rules: RulesConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which files are read and how
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// File-name suffixes that mark a test source
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,

    /// Directory names never descended into (snapshot storage)
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// How many leading lines are searched for the `Spec Count:` header
    #[serde(default = "default_header_scan_lines")]
    pub header_scan_lines: usize,

    /// Worker threads for per-file processing (0 = rayon default)
    #[serde(default)]
    pub jobs: usize,
}

fn default_suffixes() -> Vec<String> {
    vec![".spec.ts".to_string()]
}

fn default_exclude_dirs() -> Vec<String> {
    vec!["__snapshots__".to_string()]
}

fn default_header_scan_lines() -> usize {
    50
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            suffixes: default_suffixes(),
            exclude_dirs: default_exclude_dirs(),
            header_scan_lines: default_header_scan_lines(),
            jobs: 0,
        }
    }
}

/// Rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RulesConfig {
    /// Titles shorter than this (in characters) get SHORT_TEST_NAME
    #[serde(default = "default_min_title_length")]
    pub min_title_length: usize,

    /// Descriptions that say nothing about the behavior under test
    #[serde(default = "default_vague_titles")]
    pub vague_titles: Vec<String>,

    /// Assertion methods that make `.rejects.X` / `.resolves.X` an implicit THEN
    #[serde(default = "default_implicit_then_assertions")]
    pub implicit_then_assertions: Vec<String>,
}

fn default_min_title_length() -> usize {
    20
}

fn default_vague_titles() -> Vec<String> {
    [
        "test",
        "works",
        "it works",
        "should work",
        "basic test",
        "test 1",
        "todo",
        "placeholder",
        "example",
        "sample",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_implicit_then_assertions() -> Vec<String> {
    [
        "toThrow",
        "toThrowError",
        "toBe",
        "toEqual",
        "toStrictEqual",
        "toMatchObject",
        "toBeNull",
        "toBeUndefined",
        "toBeDefined",
        "toBeTruthy",
        "toBeFalsy",
        "toContain",
        "toHaveProperty",
        "toMatch",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            min_title_length: default_min_title_length(),
            vague_titles: default_vague_titles(),
            implicit_then_assertions: default_implicit_then_assertions(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SpecGuardConfig {
    /// Load `specguard.toml` from the scan root, or an explicit path.
    ///
    /// An explicit path must exist; the root lookup falls back to defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(SpecGuardError::FileNotFound {
                path: path.display().to_string(),
            }),
            Some(path) => Self::load_from(path),
            None => Self::load_from(&root.join(CONFIG_FILE_NAME)),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|message| SpecGuardError::ConfigError {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Path the config would be read from for `root`
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }
}
