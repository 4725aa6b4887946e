//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Test declaration scanner and spec consistency checker
#[derive(Parser, Debug)]
#[command(name = "specguard")]
#[command(about = "Extracts test declaration metadata and checks spec consistency across a test tree")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (applies to all commands)
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Show verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show a progress bar while files are processed
    #[arg(long, global = true)]
    pub progress: bool,

    /// Configuration file (default: specguard.toml at the scanned root)
    #[arg(long, value_name = "FILE", global = true, env = "SPECGUARD_CONFIG")]
    pub config: Option<PathBuf>,
}

// ============================================
// Main Commands Enum
// ============================================

/// Available subcommands for specguard
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract declarations and per-file issues from a single file
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    /// Audit a whole test tree (per-file rules, duplicates, coverage, score)
    #[command(visible_alias = "a")]
    Audit(AuditArgs),
}

// ============================================
// Scan Subcommand
// ============================================

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Test source file to scan
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Include the byte span of each declaration in the output
    #[arg(long)]
    pub spans: bool,
}

// ============================================
// Audit Subcommand
// ============================================

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Root of the test tree (default: current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// File-name suffix selecting test sources (repeatable; replaces the configured list)
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Vec<String>,

    /// Directory name to skip (repeatable; replaces the configured list)
    #[arg(long, value_name = "DIR")]
    pub exclude: Vec<String>,

    /// Worker threads (0 = one per core)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Exit with code 10 when any error-severity issue is found
    #[arg(long)]
    pub fail_on_error: bool,

    /// Only list files that have issues (text format)
    #[arg(long)]
    pub issues_only: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default for terminal)
    #[default]
    #[value(alias = "pretty")]
    Text,
    /// TOON (Token-Oriented Object Notation)
    Toon,
    /// JSON for machine parsing
    Json,
}

// ============================================
// Helper Implementations
// ============================================

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl AuditArgs {
    /// Root to audit, defaulting to the working directory
    pub fn root(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
