//! specguard: test declaration scanner and spec consistency checker
//!
//! Reads Playwright-style test sources (`test(...)` / `test.fixme(...)`
//! declarations), extracts one metadata record per declaration and checks
//! the records for consistency across a whole test tree.
//!
//! The pipeline, leaves first:
//!
//! - [`scanner`] - byte-level lexical modes; finds the `)` that closes a call
//! - [`locator`] - finds declaration calls in code and measures their spans
//! - [`extract`] - identifier, tag, GIVEN/WHEN/THEN markers, pending status
//! - [`aggregate`] - one file: records plus the per-file rules
//! - [`consistency`] - all files: duplicates, coverage gaps, quality score
//! - [`audit`] - walks a tree and runs everything in parallel
//!
//! # Example
//!
//! ```
//! use specguard::{FileAggregator, IssueCode};
//!
//! let source = r#"
//! // Spec Count: 1
//! test('API-AUTH-001: rejects an expired token', { tag: '@spec' }, async () => {
//!   // GIVEN: an expired token
//!   // WHEN: the profile is requested
//!   await expect(fetchProfile(token)).rejects.toThrow()
//! })
//! "#;
//!
//! let file = FileAggregator::default().analyze_source("api/auth.spec.ts", source);
//! assert_eq!(file.spec_count, 1);
//! assert!(file.declarations[0].has_then);
//! assert!(file.issues.iter().all(|i| i.code != IssueCode::HeaderCountMismatch));
//! ```

pub mod aggregate;
pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod consistency;
pub mod error;
pub mod extract;
pub mod fs_utils;
pub mod locator;
pub mod scanner;
pub mod schema;

// Re-export commonly used types
pub use aggregate::{FileAggregator, ReadFailure};
pub use audit::{audit_tree, scan_file, AuditReport, AuditTotals};
pub use cli::{Cli, OutputFormat};
pub use commands::{encode_toon, CommandContext, CommandOutput};
pub use config::SpecGuardConfig;
pub use consistency::{
    check_consistency, ConsistencyReport, CoverageGap, DuplicateSpecId, GapCategory, SpecLocation,
};
pub use error::{Result, SpecGuardError};
pub use extract::{parse_spec_id, MetadataExtractor};
pub use locator::{locate_declarations, CallSite, CallVariant};
pub use scanner::{find_closing_paren, mode_at, mode_runs, ModeRun, ScanMode};
pub use schema::{
    BodySpan, Issue, IssueCode, Severity, SpecFile, SpecTag, TestDeclaration,
};
