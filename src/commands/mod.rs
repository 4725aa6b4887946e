//! Command modules for the specguard CLI
//!
//! - `scan` - declarations and per-file issues for one file
//! - `audit` - the whole tree: per-file rules, duplicates, coverage, score
//!
//! Handlers take their `Args` struct from `cli.rs` and a shared
//! `CommandContext`, and return the rendered output. Every format is built
//! from one `serde_json::Value` tagged with `_type`.

pub mod audit;
pub mod scan;

pub use audit::run_audit;
pub use scan::run_scan;

use crate::cli::OutputFormat;
use crate::config::SpecGuardConfig;
use crate::error::Result;
use crate::schema::Issue;

/// Shared context passed to all command handlers
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Output format (text, toon, or json)
    pub format: OutputFormat,
    /// Show verbose output
    pub verbose: bool,
    /// Show progress during long operations
    pub progress: bool,
    /// Loaded configuration (before per-command overrides)
    pub config: SpecGuardConfig,
}

impl Default for CommandContext {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            verbose: false,
            progress: false,
            config: SpecGuardConfig::default(),
        }
    }
}

impl CommandContext {
    /// Create a new CommandContext from CLI args
    pub fn from_cli(
        format: OutputFormat,
        verbose: bool,
        progress: bool,
        config: SpecGuardConfig,
    ) -> Self {
        Self {
            format,
            verbose,
            progress,
            config,
        }
    }
}

/// What a command printed, and whether the run should fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub rendered: String,
    /// Blocking findings were requested to fail the process
    pub blocking: bool,
}

impl CommandOutput {
    pub fn ok(rendered: String) -> Self {
        Self {
            rendered,
            blocking: false,
        }
    }
}

/// Encode a JSON value as proper TOON using the rtoon library
pub fn encode_toon(value: &serde_json::Value) -> String {
    rtoon::encode_default(value).unwrap_or_else(|e| format!("TOON encoding error: {}", e))
}

/// Render `value` in the context's format; `text` builds the human form
pub(crate) fn render(
    value: &serde_json::Value,
    ctx: &CommandContext,
    text: impl FnOnce() -> String,
) -> Result<String> {
    Ok(match ctx.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(value)?),
        OutputFormat::Toon => format!("{}\n", encode_toon(value)),
        OutputFormat::Text => text(),
    })
}

pub(crate) fn banner(title: &str) -> String {
    format!(
        "═══════════════════════════════════════════\n  {}\n═══════════════════════════════════════════\n\n",
        title
    )
}

/// One issue as a text row: `E L12 CODE  message`
pub(crate) fn issue_line(issue: &Issue) -> String {
    let line = issue
        .line
        .map(|l| format!("L{}", l))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "  {} {:>5} {:<22} {}\n",
        issue.severity.code(),
        line,
        issue.code.as_str(),
        issue.message
    )
}
