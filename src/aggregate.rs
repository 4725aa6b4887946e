//! File aggregator: one source file in, one [`SpecFile`] out
//!
//! Runs the locator and extractor over a file, then applies the per-file
//! rules:
//!
//! | Code                    | Severity   | Applies to                          |
//! |-------------------------|------------|-------------------------------------|
//! | `HEADER_COUNT_MISMATCH` | error      | `Spec Count: N` header vs `@spec`s  |
//! | `MISSING_SPEC_ID`       | error      | active `@spec`                      |
//! | `MISSING_TAG`           | error      | active, no tag                      |
//! | `UNKNOWN_TAG`           | error      | active, tag outside the vocabulary  |
//! | `MISSING_GIVEN/WHEN/THEN` | warning  | active `@spec`                      |
//! | `STRAY_PLACEHOLDER`     | warning    | active, TODO/FIXME or `expect(true)`|
//! | `SHORT_TEST_NAME`       | suggestion | literal titles under the minimum    |
//! | `VAGUE_TEST_NAME`       | error      | titles from the vague-phrase list   |
//! | `NON_SEQUENTIAL_IDS`    | suggestion | first gap among numbered `@spec`s   |
//!
//! Regression declarations are exempt from every per-declaration rule.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{RulesConfig, SpecGuardConfig};
use crate::extract::MetadataExtractor;
use crate::fs_utils::relative_display;
use crate::schema::{Issue, IssueCode, SpecFile, TestDeclaration};

static HEADER_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Spec Count:\s*([0-9]+)").expect("valid header regex"));

/// A file that could not be read; the run continues without it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFailure {
    pub path: String,
    pub message: String,
}

impl ReadFailure {
    pub fn to_issue(&self) -> Issue {
        Issue::new(
            IssueCode::ReadFailure,
            format!("Could not read {}: {}", self.path, self.message),
        )
    }
}

/// `(line, N)` of the first `Spec Count: N` within the first `scan_lines` lines
pub fn declared_count(source: &str, scan_lines: usize) -> Option<(usize, usize)> {
    source
        .lines()
        .take(scan_lines)
        .enumerate()
        .find_map(|(idx, line)| {
            let caps = HEADER_COUNT.captures(line)?;
            let count = caps.get(1)?.as_str().parse().ok()?;
            Some((idx + 1, count))
        })
}

/// Title without the identifier prefix and its separator
fn title_description(decl: &TestDeclaration) -> &str {
    let rest = match &decl.spec_id {
        Some(id) => decl.raw_title.get(id.len()..).unwrap_or_default(),
        None => decl.raw_title.as_str(),
    };
    rest.trim_start_matches([':', '-', ' ']).trim()
}

/// Per-declaration structural rules
fn check_declaration(decl: &TestDeclaration, rules: &RulesConfig) -> Vec<Issue> {
    let mut issues = Vec::new();
    if decl.is_regression() {
        return issues;
    }
    let line = decl.line_number;
    let title = &decl.raw_title;

    if !decl.is_pending {
        if decl.is_spec() && decl.spec_id.is_none() {
            issues.push(
                Issue::new(
                    IssueCode::MissingSpecId,
                    format!("@spec test \"{}\" has no spec ID prefix", title),
                )
                .at_line(line),
            );
        }

        match (&decl.tag, &decl.raw_tag) {
            (None, Some(raw)) => issues.push(
                Issue::new(
                    IssueCode::UnknownTag,
                    format!(
                        "Test \"{}\" uses unrecognized tag '{}' (expected @spec or @regression)",
                        title, raw
                    ),
                )
                .at_line(line),
            ),
            (None, None) => issues.push(
                Issue::new(
                    IssueCode::MissingTag,
                    format!("Test \"{}\" has no tag (expected @spec or @regression)", title),
                )
                .at_line(line),
            ),
            _ => {}
        }

        if decl.is_spec() {
            let markers = [
                (decl.has_given, IssueCode::MissingGiven, "GIVEN"),
                (decl.has_when, IssueCode::MissingWhen, "WHEN"),
                (decl.has_then, IssueCode::MissingThen, "THEN"),
            ];
            for (present, code, marker) in markers {
                if !present {
                    issues.push(
                        Issue::new(code, format!("Test \"{}\" is missing a // {} comment", title, marker))
                            .at_line(line),
                    );
                }
            }
        }

        if decl.has_placeholder {
            issues.push(
                Issue::new(
                    IssueCode::StrayPlaceholder,
                    format!("Active test \"{}\" still contains a placeholder marker", title),
                )
                .at_line(line),
            );
        }
    }

    // Non-literal titles are computed at runtime; nothing to judge.
    if title.is_empty() {
        return issues;
    }

    let length = title.chars().count();
    if length < rules.min_title_length {
        issues.push(
            Issue::new(
                IssueCode::ShortTestName,
                format!(
                    "Test name \"{}\" is {} characters (minimum {})",
                    title, length, rules.min_title_length
                ),
            )
            .at_line(line),
        );
    }

    let description = title_description(decl).to_lowercase();
    if rules
        .vague_titles
        .iter()
        .any(|vague| vague.to_lowercase() == description)
    {
        issues.push(
            Issue::new(
                IssueCode::VagueTestName,
                format!("Test name \"{}\" does not describe the behavior under test", title),
            )
            .at_line(line),
        );
    }

    issues
}

/// First break in the numbering of `@spec` identifiers
fn check_sequence(declarations: &[TestDeclaration]) -> Option<Issue> {
    let mut numbered = declarations
        .iter()
        .filter(|d| d.is_spec())
        .filter_map(|d| Some((d, d.sequence_number()?)));

    let (mut prev_decl, mut prev_num) = numbered.next()?;
    for (decl, num) in numbered {
        if num != prev_num + 1 {
            let prev_id = prev_decl.spec_id.as_deref().unwrap_or_default();
            let id = decl.spec_id.as_deref().unwrap_or_default();
            let expected = match prev_id.rsplit_once('-') {
                Some((prefix, _)) => format!("{}-{:03}", prefix, prev_num + 1),
                None => format!("{:03}", prev_num + 1),
            };
            return Some(
                Issue::new(
                    IssueCode::NonSequentialIds,
                    format!(
                        "Non-sequential spec IDs: gap between {} and {} (expected {})",
                        prev_id, id, expected
                    ),
                )
                .at_line(decl.line_number),
            );
        }
        prev_decl = decl;
        prev_num = num;
    }

    None
}

/// Locator + extractor + per-file rules
#[derive(Debug, Clone)]
pub struct FileAggregator {
    extractor: MetadataExtractor,
    rules: RulesConfig,
    header_scan_lines: usize,
}

impl Default for FileAggregator {
    fn default() -> Self {
        Self::new(&SpecGuardConfig::default())
    }
}

impl FileAggregator {
    pub fn new(config: &SpecGuardConfig) -> Self {
        Self {
            extractor: MetadataExtractor::new(&config.rules),
            rules: config.rules.clone(),
            header_scan_lines: config.scan.header_scan_lines,
        }
    }

    /// Analyze in-memory source text labelled with `path`
    pub fn analyze_source(&self, path: &str, source: &str) -> SpecFile {
        let declarations = self.extractor.extract_all(source);
        let header = declared_count(source, self.header_scan_lines);
        let mut file = SpecFile::new(path, declarations, header.map(|(_, count)| count));

        if let Some((line, declared)) = header {
            if declared != file.spec_count {
                file.issues.push(
                    Issue::new(
                        IssueCode::HeaderCountMismatch,
                        format!(
                            "Header declares Spec Count: {} but the file contains {} @spec tests",
                            declared, file.spec_count
                        ),
                    )
                    .at_line(line),
                );
            }
        }

        let mut issues: Vec<Issue> = file
            .declarations
            .iter()
            .flat_map(|decl| check_declaration(decl, &self.rules))
            .collect();
        issues.extend(check_sequence(&file.declarations));
        file.issues.extend(issues);

        tracing::debug!(
            path,
            declarations = file.total_count(),
            issues = file.issues.len(),
            "analyzed spec file"
        );

        file
    }

    /// Read `file` (under `root`) and analyze it
    pub fn read_and_analyze(
        &self,
        root: &Path,
        file: &Path,
    ) -> std::result::Result<SpecFile, ReadFailure> {
        let path = relative_display(root, file);
        match fs::read_to_string(file) {
            Ok(source) => Ok(self.analyze_source(&path, &source)),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "skipping unreadable spec file");
                Err(ReadFailure {
                    path,
                    message: e.to_string(),
                })
            }
        }
    }
}
