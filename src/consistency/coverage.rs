//! Coverage-gap heuristic
//!
//! A domain still carrying pending declarations is incomplete. For each such
//! domain the lowercased titles are searched for the keywords of each test
//! category; a category with no hit is reported as a gap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{Issue, IssueCode, SpecFile};

/// Kinds of behavior a complete domain is expected to exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    ErrorHandling,
    EmptyInput,
    Boundary,
}

impl GapCategory {
    pub const ALL: [GapCategory; 3] = [
        GapCategory::ErrorHandling,
        GapCategory::EmptyInput,
        GapCategory::Boundary,
    ];

    /// Title keywords that count as covering the category
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            GapCategory::ErrorHandling => &["error", "invalid", "fail"],
            GapCategory::EmptyInput => &["empty", "missing", "undefined"],
            GapCategory::Boundary => &["max", "min", "limit", "boundary"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GapCategory::ErrorHandling => "error handling",
            GapCategory::EmptyInput => "empty input",
            GapCategory::Boundary => "boundary",
        }
    }
}

/// A category with no matching title in a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub domain: String,
    pub category: GapCategory,
    pub message: String,
}

impl CoverageGap {
    pub fn to_issue(&self) -> Issue {
        Issue::new(IssueCode::CoverageGap, self.message.clone())
    }
}

/// Gaps for every incomplete domain, ordered by domain then category
pub fn find_coverage_gaps(files: &[SpecFile]) -> Vec<CoverageGap> {
    let mut domains: BTreeMap<&str, Vec<&SpecFile>> = BTreeMap::new();
    for file in files {
        domains.entry(file.domain()).or_default().push(file);
    }

    let mut gaps = Vec::new();
    for (domain, members) in domains {
        let pending: usize = members.iter().map(|f| f.pending_count).sum();
        if pending == 0 {
            continue;
        }

        let titles: Vec<String> = members
            .iter()
            .flat_map(|f| f.declarations.iter())
            .map(|d| d.raw_title.to_lowercase())
            .collect();

        for category in GapCategory::ALL {
            let covered = titles
                .iter()
                .any(|title| category.keywords().iter().any(|kw| title.contains(kw)));
            if !covered {
                gaps.push(CoverageGap {
                    domain: domain.to_string(),
                    category,
                    message: format!(
                        "Domain '{}' has {} pending test(s) and no {} tests (looked for: {})",
                        domain,
                        pending,
                        category.label(),
                        category.keywords().join(", ")
                    ),
                });
            }
        }
    }

    gaps
}
