//! Tests for the `scan` CLI command
//!
//! `scan <FILE>` extracts every declaration of a single file and applies
//! the per-file rules; no cross-file checks run.

#![allow(unused_imports)]

use crate::common::test_repo::{complete_spec, pending_spec};
use crate::common::{
    assert_contains, assert_json_type, assert_not_contains, assert_valid_json, assert_valid_toon,
    get_toon_type, issue_codes, TestRepo,
};

#[test]
fn test_scan_json_lists_declarations() {
    let repo = TestRepo::new();
    repo.add_spec_file(
        "api/auth.spec.ts",
        2,
        &[
            complete_spec("API-AUTH-001", "signs in with a valid password"),
            pending_spec("API-AUTH-002", "locks the account after failures"),
        ]
        .concat(),
    );

    let output = repo.run_cli_success(&["scan", "api/auth.spec.ts", "-f", "json"]);
    let json = assert_valid_json(&output, "scan json");
    assert_json_type(&json, "scan");
    assert_eq!(json["path"], "auth.spec.ts");
    assert_eq!(json["declared_count"], 2);
    assert_eq!(json["counts"]["total"], 2);
    assert_eq!(json["counts"]["pending"], 1);

    let decls = json["declarations"].as_array().unwrap();
    assert_eq!(decls[0]["spec_id"], "API-AUTH-001");
    assert_eq!(decls[0]["tag"], "@spec");
    assert_eq!(decls[0]["has_then"], true);
    assert_eq!(decls[1]["is_pending"], true);
    assert!(issue_codes(&json).is_empty());
}

#[test]
fn test_scan_text_and_toon() {
    let repo = TestRepo::new();
    repo.add_file(
        "x.spec.ts",
        "test('works', { tag: '@smoke' }, async () => {\n  // TODO write me\n})\n",
    );

    let text = repo.run_cli_success(&["scan", "x.spec.ts"]);
    assert_contains(&text, "SCAN x.spec.ts", true, "scan text banner");
    assert_contains(&text, "UNKNOWN_TAG", true, "unknown tag reported");
    assert_contains(&text, "VAGUE_TEST_NAME", true, "vague title reported");
    assert_contains(&text, "STRAY_PLACEHOLDER", true, "placeholder reported");
    assert_contains(&text, "@smoke?", true, "raw tag shown");

    let toon = repo.run_cli_success(&["scan", "x.spec.ts", "-f", "toon"]);
    assert_valid_toon(&toon, "scan toon");
    assert_eq!(get_toon_type(&toon).as_deref(), Some("scan"));
}

#[test]
fn test_scan_spans_flag() {
    let repo = TestRepo::new();
    repo.add_file("s.spec.ts", "test('S-X-001: a', () => {})");

    let json = assert_valid_json(
        &repo.run_cli_success(&["scan", "s.spec.ts", "--spans", "-f", "json"]),
        "scan with spans",
    );
    assert_eq!(json["declarations"][0]["body_span"]["start"], 0);
    assert_eq!(json["declarations"][0]["body_span"]["end"], 28);

    let plain = repo.run_cli_success(&["scan", "s.spec.ts", "-f", "json"]);
    assert_not_contains(&plain, "body_span", "spans omitted by default");
}

#[test]
fn test_scan_missing_file_exits_1() {
    let repo = TestRepo::new();
    let (code, _stdout, stderr) = repo.run_cli_failure(&["scan", "nope.spec.ts"]);
    assert_eq!(code, Some(1));
    assert_contains(&stderr, "File not found", true, "missing file message");
}
