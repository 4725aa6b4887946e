//! Tree audit pipeline
//!
//! Walk → per-file analysis on a bounded rayon pool → merge (sorted by path)
//! → consistency checks. Read failures are collected, never fatal.

use std::fs;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::{FileAggregator, ReadFailure};
use crate::config::SpecGuardConfig;
use crate::consistency::{check_consistency, CoverageGap, DuplicateSpecId};
use crate::error::{Result, SpecGuardError};
use crate::fs_utils::{collect_spec_files, normalize_path, relative_display};
use crate::schema::{Severity, SpecFile};

/// Summary counts across the whole report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTotals {
    pub files: usize,
    pub declarations: usize,
    pub spec: usize,
    pub regression: usize,
    pub pending: usize,
    pub errors: usize,
    pub warnings: usize,
    pub suggestions: usize,
}

/// Everything one `audit` run produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub root: String,
    /// Sorted by path
    pub files: Vec<SpecFile>,
    pub read_failures: Vec<ReadFailure>,
    pub duplicates: Vec<DuplicateSpecId>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub quality_score: u8,
    pub totals: AuditTotals,
}

impl AuditReport {
    /// Any error-severity finding, including unreadable files
    pub fn has_errors(&self) -> bool {
        self.totals.errors > 0
    }

    fn compute_totals(&mut self) {
        let mut totals = AuditTotals {
            files: self.files.len(),
            ..AuditTotals::default()
        };
        for file in &self.files {
            totals.declarations += file.total_count();
            totals.spec += file.spec_count;
            totals.regression += file.regression_count;
            totals.pending += file.pending_count;
            totals.errors += file.count_severity(Severity::Error);
            totals.warnings += file.count_severity(Severity::Warning);
            totals.suggestions += file.count_severity(Severity::Suggestion);
        }
        totals.errors += self.read_failures.len();
        totals.suggestions += self.coverage_gaps.len();
        self.totals = totals;
    }
}

fn progress_bar(len: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb
}

/// Audit every test source under `root`
pub fn audit_tree(root: &Path, config: &SpecGuardConfig, progress: bool) -> Result<AuditReport> {
    let paths = collect_spec_files(root, &config.scan)?;
    let aggregator = FileAggregator::new(config);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.scan.jobs)
        .build()?;

    tracing::info!(
        root = %root.display(),
        files = paths.len(),
        threads = pool.current_num_threads(),
        "auditing spec tree"
    );

    let pb = progress_bar(paths.len(), progress);
    let results: Vec<std::result::Result<SpecFile, ReadFailure>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = aggregator.read_and_analyze(root, path);
                pb.inc(1);
                result
            })
            .collect()
    });
    pb.finish_and_clear();

    let (mut files, mut read_failures): (Vec<SpecFile>, Vec<ReadFailure>) =
        (Vec::new(), Vec::new());
    for result in results {
        match result {
            Ok(file) => files.push(file),
            Err(failure) => read_failures.push(failure),
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    read_failures.sort_by(|a, b| a.path.cmp(&b.path));

    let consistency = check_consistency(&mut files);

    let mut report = AuditReport {
        root: normalize_path(root).display().to_string(),
        files,
        read_failures,
        duplicates: consistency.duplicates,
        coverage_gaps: consistency.coverage_gaps,
        quality_score: consistency.quality_score,
        totals: AuditTotals::default(),
    };
    report.compute_totals();

    tracing::info!(
        files = report.totals.files,
        declarations = report.totals.declarations,
        errors = report.totals.errors,
        warnings = report.totals.warnings,
        quality_score = report.quality_score,
        "audit complete"
    );

    Ok(report)
}

/// Analyze a single file on its own (no cross-file checks)
pub fn scan_file(path: &Path, config: &SpecGuardConfig) -> Result<SpecFile> {
    if !path.exists() {
        return Err(SpecGuardError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let source = fs::read_to_string(path)?;
    let label = match path.parent() {
        Some(parent) => relative_display(parent, path),
        None => path.display().to_string(),
    };
    Ok(FileAggregator::new(config).analyze_source(&label, &source))
}
