//! Spec metadata extraction
//!
//! Turns a located declaration into a [`TestDeclaration`]: identifier, tag,
//! narrative markers (GIVEN / WHEN / THEN), pending and placeholder status.
//!
//! Narrative markers are matched only against comment text, found with the
//! same mode scanner that delimits the body, so a `"// GIVEN"` inside a
//! string literal does not count. The implicit THEN (`.rejects.toThrow()`
//! and friends) and the trivial `expect(true).toBe(true)` are matched
//! against the code text only, with comments,
//! strings and regex literals blanked out.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RulesConfig;
use crate::locator::{locate_declarations, CallSite, CallVariant};
use crate::scanner::{ModeScanner, ScanMode};
use crate::schema::{SpecTag, TestDeclaration};

/// `PREFIX-SEGMENT(-SEGMENT)*-(NNN|REGRESSION)` anchored at the title start
static SPEC_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Z0-9]*(?:-[A-Z0-9]+)+-(?:[0-9]{3}|REGRESSION))\b")
        .expect("valid spec id regex")
});

/// `tag: '@x'` or `tag: ['@x', ...]`
static TAG_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\btag\s*:\s*(\[[^\]]*\]|['"`][^'"`]*['"`])"#).expect("valid tag regex")
});

static TAG_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"`](@[A-Za-z0-9_-]+)['"`]"#).expect("valid tag literal regex")
});

static GIVEN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)//\s*given\b").expect("valid given regex"));

static WHEN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)//\s*(?:given\s*/\s*)?when\b").expect("valid when regex"));

static THEN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)//\s*(?:when\s*/\s*)?then\b").expect("valid then regex"));

static PLACEHOLDER_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)//\s*(?:todo|fixme)\b").expect("valid placeholder regex"));

static TRIVIAL_ASSERTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"expect\(\s*true\s*\)\s*\.\s*toBe\(\s*true\s*\)").expect("valid assertion regex")
});

/// Structured identifier prefix of a title, if it has one
pub fn parse_spec_id(title: &str) -> Option<String> {
    SPEC_ID
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Tag from the options object: the first recognized literal, or the first
/// literal as written when none is recognized.
fn parse_tag(body: &str) -> (Option<SpecTag>, Option<String>) {
    let Some(value) = TAG_VALUE.captures(body).and_then(|caps| caps.get(1)) else {
        return (None, None);
    };

    let literals: Vec<&str> = TAG_LITERAL
        .captures_iter(value.as_str())
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    match literals.iter().find_map(|lit| lit.parse::<SpecTag>().ok()) {
        Some(tag) => (Some(tag), None),
        None => (None, literals.first().map(|lit| lit.to_string())),
    }
}

/// Text of every comment inside `body`, one entry per comment
fn comment_texts(body: &str) -> Vec<&str> {
    let mut comments = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for token in ModeScanner::new(body) {
        let in_comment = token.mode.is_comment();
        match current {
            Some((start, end)) if in_comment && end == token.start => {
                current = Some((start, token.end));
            }
            _ if in_comment => {
                if let Some((start, end)) = current {
                    comments.push(&body[start..end]);
                }
                current = Some((token.start, token.end));
            }
            Some((start, end)) => {
                comments.push(&body[start..end]);
                current = None;
            }
            None => {}
        }
    }
    if let Some((start, end)) = current {
        comments.push(&body[start..end]);
    }

    comments
}

/// `body` with every byte outside code mode replaced by a space
fn code_text(body: &str) -> String {
    let mut bytes = body.as_bytes().to_vec();
    for token in ModeScanner::new(body) {
        if token.mode != ScanMode::Code {
            bytes[token.start..token.end].fill(b' ');
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Extracts [`TestDeclaration`]s according to the configured rules
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    /// `.rejects.X` / `.resolves.X` with X in the configured assertion list
    implicit_then: Option<Regex>,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(&RulesConfig::default())
    }
}

impl MetadataExtractor {
    pub fn new(rules: &RulesConfig) -> Self {
        let implicit_then = if rules.implicit_then_assertions.is_empty() {
            None
        } else {
            let names: Vec<String> = rules
                .implicit_then_assertions
                .iter()
                .map(|name| regex::escape(name))
                .collect();
            Regex::new(&format!(
                r"\.\s*(?:rejects|resolves)\s*\.\s*(?:not\s*\.\s*)?(?:{})\b",
                names.join("|")
            ))
            .ok()
        };

        Self { implicit_then }
    }

    /// Build the record for one located call
    pub fn extract(&self, source: &str, site: &CallSite) -> TestDeclaration {
        let body = source
            .get(site.span.start..site.span.end)
            .unwrap_or_default();

        let (tag, raw_tag) = parse_tag(body);

        let comments = comment_texts(body);
        let any_comment = |marker: &Regex| comments.iter().any(|c| marker.is_match(c));

        let code = code_text(body);
        let implicit_then = self
            .implicit_then
            .as_ref()
            .is_some_and(|re| re.is_match(&code));

        TestDeclaration {
            spec_id: parse_spec_id(&site.raw_title),
            raw_title: site.raw_title.clone(),
            tag,
            raw_tag,
            is_pending: site.variant == CallVariant::Placeholder,
            has_given: any_comment(&GIVEN_MARKER),
            has_when: any_comment(&WHEN_MARKER),
            has_then: any_comment(&THEN_MARKER) || implicit_then,
            has_placeholder: any_comment(&PLACEHOLDER_COMMENT)
                || TRIVIAL_ASSERTION.is_match(&code),
            line_number: site.line_number,
            body_span: site.span,
        }
    }

    /// Locate and extract every declaration in `source`, ordered by line
    pub fn extract_all(&self, source: &str) -> Vec<TestDeclaration> {
        locate_declarations(source)
            .iter()
            .map(|site| self.extract(source, site))
            .collect()
    }
}
