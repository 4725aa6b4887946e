//! Records produced by the extraction pipeline.
//!
//! Everything here is a derived, read-only snapshot computed fresh from file
//! contents on every run. A [`SpecFile`] owns its [`TestDeclaration`]s and
//! [`Issue`]s; nothing downstream mutates them after construction except the
//! consistency engine appending cross-file issues.

use serde::{Deserialize, Serialize};

// ============================================================================
// Tags
// ============================================================================

/// Classification marker carried in a declaration's options object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecTag {
    /// Exhaustive acceptance test, one behavior per declaration
    #[serde(rename = "@spec")]
    Spec,
    /// Consolidated workflow test mirroring a group of `@spec` tests
    #[serde(rename = "@regression")]
    Regression,
}

impl SpecTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecTag::Spec => "@spec",
            SpecTag::Regression => "@regression",
        }
    }
}

impl std::str::FromStr for SpecTag {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "@spec" => Ok(SpecTag::Spec),
            "@regression" => Ok(SpecTag::Regression),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Half-open byte range `[start, end)` into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySpan {
    pub start: usize,
    pub end: usize,
}

impl BodySpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// One test call site and the metadata extracted from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDeclaration {
    /// The literal title argument (empty if the call has no string literal)
    pub raw_title: String,

    /// Structured identifier prefix of the title, e.g. `API-AUTH-LOGIN-001`
    pub spec_id: Option<String>,

    /// Recognized tag from the options object
    pub tag: Option<SpecTag>,

    /// Tag literal as written when it is outside the recognized vocabulary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_tag: Option<String>,

    /// Declared with the placeholder variant (`test.fixme`)
    pub is_pending: bool,

    /// Narrative markers
    pub has_given: bool,
    pub has_when: bool,
    pub has_then: bool,

    /// Body still carries a placeholder marker (TODO/FIXME comment or a
    /// trivially-true assertion)
    pub has_placeholder: bool,

    /// Line of the call token (1-based)
    pub line_number: usize,

    /// From the call token to one past the matching `)`
    pub body_span: BodySpan,
}

impl TestDeclaration {
    /// Regression declarations mirror `@spec` tests and are not validated
    /// on their own.
    pub fn is_regression(&self) -> bool {
        self.tag == Some(SpecTag::Regression)
            || self
                .spec_id
                .as_deref()
                .is_some_and(|id| id.ends_with("-REGRESSION"))
    }

    /// Tagged `@spec` and not a regression mirror
    pub fn is_spec(&self) -> bool {
        self.tag == Some(SpecTag::Spec) && !self.is_regression()
    }

    /// Numeric suffix of the identifier (`API-X-007` → 7)
    pub fn sequence_number(&self) -> Option<u32> {
        let id = self.spec_id.as_deref()?;
        let (_, suffix) = id.rsplit_once('-')?;
        suffix.parse().ok()
    }
}

// ============================================================================
// Issues
// ============================================================================

/// Severity level for issues. Fixed per [`IssueCode`], never adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory
    Suggestion,
    /// Should be fixed, does not block
    Warning,
    /// Blocks downstream acceptance
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Suggestion => "suggestion",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Short code for compact output
    pub fn code(&self) -> char {
        match self {
            Severity::Suggestion => 'S',
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }
}

/// Fixed vocabulary of issue codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingSpecId,
    MissingTag,
    UnknownTag,
    MissingGiven,
    MissingWhen,
    MissingThen,
    StrayPlaceholder,
    ShortTestName,
    VagueTestName,
    HeaderCountMismatch,
    NonSequentialIds,
    DuplicateSpecId,
    CoverageGap,
    ReadFailure,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::MissingSpecId => "MISSING_SPEC_ID",
            IssueCode::MissingTag => "MISSING_TAG",
            IssueCode::UnknownTag => "UNKNOWN_TAG",
            IssueCode::MissingGiven => "MISSING_GIVEN",
            IssueCode::MissingWhen => "MISSING_WHEN",
            IssueCode::MissingThen => "MISSING_THEN",
            IssueCode::StrayPlaceholder => "STRAY_PLACEHOLDER",
            IssueCode::ShortTestName => "SHORT_TEST_NAME",
            IssueCode::VagueTestName => "VAGUE_TEST_NAME",
            IssueCode::HeaderCountMismatch => "HEADER_COUNT_MISMATCH",
            IssueCode::NonSequentialIds => "NON_SEQUENTIAL_IDS",
            IssueCode::DuplicateSpecId => "DUPLICATE_SPEC_ID",
            IssueCode::CoverageGap => "COVERAGE_GAP",
            IssueCode::ReadFailure => "READ_FAILURE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::MissingSpecId
            | IssueCode::MissingTag
            | IssueCode::UnknownTag
            | IssueCode::VagueTestName
            | IssueCode::HeaderCountMismatch
            | IssueCode::DuplicateSpecId
            | IssueCode::ReadFailure => Severity::Error,
            IssueCode::MissingGiven
            | IssueCode::MissingWhen
            | IssueCode::MissingThen
            | IssueCode::StrayPlaceholder => Severity::Warning,
            IssueCode::ShortTestName | IssueCode::NonSequentialIds | IssueCode::CoverageGap => {
                Severity::Suggestion
            }
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding attached to a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Issue {
    /// Create an issue; severity follows from the code
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            line: None,
        }
    }

    /// Attach a line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

// ============================================================================
// Files
// ============================================================================

/// All declarations and findings for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecFile {
    /// Path relative to the scan root, `/`-separated
    pub path: String,

    /// Ordered by `line_number`
    pub declarations: Vec<TestDeclaration>,

    /// `Spec Count: N` from the header, if present
    pub declared_count: Option<usize>,

    pub spec_count: usize,
    pub regression_count: usize,
    pub pending_count: usize,
    pub active_count: usize,

    pub issues: Vec<Issue>,
}

impl SpecFile {
    /// Build a file record, deriving the counts from `declarations`
    pub fn new(
        path: impl Into<String>,
        declarations: Vec<TestDeclaration>,
        declared_count: Option<usize>,
    ) -> Self {
        let spec_count = declarations.iter().filter(|d| d.is_spec()).count();
        let regression_count = declarations.iter().filter(|d| d.is_regression()).count();
        let pending_count = declarations.iter().filter(|d| d.is_pending).count();
        let active_count = declarations.len() - pending_count;

        Self {
            path: path.into(),
            declarations,
            declared_count,
            spec_count,
            regression_count,
            pending_count,
            active_count,
            issues: Vec::new(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.declarations.len()
    }

    /// Top-level directory of the file, used to group files into domains.
    /// Files directly at the root form a domain named after their file.
    pub fn domain(&self) -> &str {
        match self.path.split_once('/') {
            Some((first, _)) => first,
            None => self.path.as_str(),
        }
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}
