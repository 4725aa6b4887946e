//! Test declaration locator
//!
//! Finds the call tokens that open a test declaration (`test(` and the
//! placeholder form `test.fixme(`) and asks the scanner for each one's span.
//! Tokens inside comments, strings or regex literals are ignored, as are
//! member calls like `/re/.test(s)`. A `test.fixme(` whose first argument is
//! not a string literal is an annotation on the enclosing test or group, not
//! a declaration, and is skipped whole. The search resumes at the end of each
//! accepted span, so a call nested in a body is never reported twice.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scanner::{find_closing_paren, mode_at, mode_runs, ModeScanner, ScanMode};
use crate::schema::BodySpan;

static CALL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btest(\.fixme)?\s*\(").expect("valid call token regex"));

/// Which form of the declaration call was used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallVariant {
    /// `test(...)`
    Plain,
    /// `test.fixme(...)`: registered, not executed
    Placeholder,
}

/// One located declaration call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub variant: CallVariant,
    /// Offset of the `(` that opens the argument list
    pub open_paren: usize,
    /// Call token to one past the matching `)`
    pub span: BodySpan,
    /// 1-based line of the call token
    pub line_number: usize,
    /// Contents of the first argument when it is a string literal
    pub raw_title: String,
}

/// Locate every declaration call in `source`, in offset order
pub fn locate_declarations(source: &str) -> Vec<CallSite> {
    let runs = mode_runs(source);
    let bytes = source.as_bytes();

    let mut sites = Vec::new();
    let mut cursor = 0;
    let mut line = 1;
    let mut line_counted_to = 0;

    while cursor < source.len() {
        let Some(found) = CALL_TOKEN.find_at(source, cursor) else {
            break;
        };
        let token_start = found.start();

        let is_member_call = token_start > 0 && matches!(bytes[token_start - 1], b'.' | b'$');
        if is_member_call || mode_at(&runs, token_start) != Some(ScanMode::Code) {
            cursor = found.end();
            continue;
        }

        let open_paren = found.end() - 1;
        let end = find_closing_paren(source, open_paren);
        let title = leading_string_literal(source, open_paren + 1, end);

        let variant = if found.as_str().contains(".fixme") {
            CallVariant::Placeholder
        } else {
            CallVariant::Plain
        };

        // `test.fixme()` and `test.fixme(cond, reason)` annotate, they don't register
        if variant == CallVariant::Placeholder && title.is_none() {
            cursor = end.max(found.end());
            continue;
        }

        line += bytes[line_counted_to..token_start]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        line_counted_to = token_start;

        sites.push(CallSite {
            variant,
            open_paren,
            span: BodySpan {
                start: token_start,
                end,
            },
            line_number: line,
            raw_title: title.unwrap_or_default().to_string(),
        });

        cursor = end.max(found.end());
    }

    sites
}

/// Body of the string literal that starts the argument list at `from`.
///
/// Leading whitespace and comments are skipped; anything else first (an
/// identifier, a call) means there is no literal title. An unterminated
/// literal runs to `limit`.
fn leading_string_literal(source: &str, from: usize, limit: usize) -> Option<&str> {
    let bytes = source.as_bytes();
    let mut scanner = ModeScanner::starting_at(source, from);

    let opening = loop {
        let token = scanner.next()?;
        if token.start >= limit {
            return None;
        }
        match token.mode {
            mode if mode.is_comment() => continue,
            ScanMode::Code if bytes[token.start].is_ascii_whitespace() => continue,
            mode if mode.is_string() => break token,
            _ => return None,
        }
    };

    let body_start = opening.end;
    while let Some(token) = scanner.next() {
        if scanner.mode() == ScanMode::Code {
            return source.get(body_start..token.start);
        }
    }
    source.get(body_start..limit)
}
