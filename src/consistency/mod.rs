//! Cross-file consistency checks
//!
//! Runs over the complete set of analyzed files and never fails:
//! - `duplicates`: one [`DuplicateSpecId`] per identifier declared twice or more
//! - `coverage`: category gaps in domains that still have pending tests
//! - `score`: weighted completeness percentage

pub mod coverage;
pub mod duplicates;
pub mod score;

pub use coverage::{find_coverage_gaps, CoverageGap, GapCategory};
pub use duplicates::{attach_duplicate_issues, find_duplicates, DuplicateSpecId, SpecLocation};
pub use score::quality_score;

use serde::{Deserialize, Serialize};

use crate::schema::SpecFile;

/// Tree-wide findings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub duplicates: Vec<DuplicateSpecId>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub quality_score: u8,
}

/// Run every cross-file check, attaching duplicate issues to their files
pub fn check_consistency(files: &mut [SpecFile]) -> ConsistencyReport {
    let duplicates = find_duplicates(files);
    attach_duplicate_issues(files, &duplicates);

    let report = ConsistencyReport {
        coverage_gaps: find_coverage_gaps(files),
        quality_score: quality_score(files),
        duplicates,
    };

    tracing::debug!(
        duplicates = report.duplicates.len(),
        coverage_gaps = report.coverage_gaps.len(),
        quality_score = report.quality_score,
        "consistency checks complete"
    );

    report
}
