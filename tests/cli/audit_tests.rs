//! Tests for the `audit` CLI command
//!
//! `audit [PATH]` walks a test tree and reports per-file issues, duplicate
//! identifiers, coverage gaps and the quality score.

#![allow(unused_imports)]

use crate::common::{
    assert_contains, assert_json_type, assert_not_contains, assert_valid_json, assert_valid_toon,
    find_file, get_toon_type, issue_codes, issues_with_code, TestRepo,
};

#[test]
fn test_audit_clean_suite_json() {
    let repo = TestRepo::new();
    repo.with_clean_suite();

    let output = repo.run_cli_success(&["audit", "-f", "json"]);
    let json = assert_valid_json(&output, "audit json");
    assert_json_type(&json, "audit");
    assert_eq!(json["totals"]["files"], 2);
    assert_eq!(json["totals"]["errors"], 0);
    assert!(json["quality_score"].as_u64().unwrap() <= 100);
    assert!(issue_codes(find_file(&json, "api/users.spec.ts")).is_empty());
}

#[test]
fn test_audit_duplicate_reported_in_both_files() {
    let repo = TestRepo::new();
    repo.with_cross_file_duplicate();

    let json = assert_valid_json(
        &repo.run_cli_success(&["audit", "-f", "json"]),
        "audit duplicates",
    );
    let dups = json["duplicates"].as_array().unwrap();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0]["spec_id"], "API-X-001");
    assert_eq!(dups[0]["locations"].as_array().unwrap().len(), 2);

    for path in ["api/a.spec.ts", "api/b.spec.ts"] {
        let issues = issues_with_code(find_file(&json, path), "DUPLICATE_SPEC_ID");
        assert_eq!(issues.len(), 1, "{}", path);
        assert_eq!(issues[0]["severity"], "error");
    }
}

#[test]
fn test_audit_text_summary() {
    let repo = TestRepo::new();
    repo.with_sequence_gap().with_header_mismatch();

    let text = repo.run_cli_success(&["audit"]);
    assert_contains(&text, "AUDIT", true, "banner");
    assert_contains(&text, "quality score:", true, "score line");
    assert_contains(&text, "NON_SEQUENTIAL_IDS", true, "gap");
    assert_contains(&text, "HEADER_COUNT_MISMATCH", true, "header");
    assert_contains(&text, "api/gap.spec.ts", true, "file listed");
}

#[test]
fn test_audit_toon() {
    let repo = TestRepo::new();
    repo.with_clean_suite();

    let toon = repo.run_cli_success(&["audit", "-f", "toon"]);
    assert_valid_toon(&toon, "audit toon");
    assert_eq!(get_toon_type(&toon).as_deref(), Some("audit"));
}

#[test]
fn test_audit_fail_on_error_exit_code() {
    let repo = TestRepo::new();
    repo.with_header_mismatch();

    // errors alone do not fail the run
    repo.run_cli_success(&["audit"]);

    let (code, stdout, _stderr) = repo.run_cli_failure(&["audit", "--fail-on-error"]);
    assert_eq!(code, Some(10));
    assert_contains(&stdout, "HEADER_COUNT_MISMATCH", true, "report still printed");
}

#[test]
fn test_audit_fail_on_error_passes_when_clean() {
    let repo = TestRepo::new();
    repo.with_clean_suite();
    repo.run_cli_success(&["audit", "--fail-on-error"]);
}

#[test]
fn test_audit_suffix_and_exclude_overrides() {
    let repo = TestRepo::new();
    repo.with_clean_suite();
    repo.add_file("extra/a.test.ts", "test('EXTRA-A-001: runs under another suffix', () => {})");

    let json = assert_valid_json(
        &repo.run_cli_success(&[
            "audit", "--suffix", ".test.ts", "--exclude", "ui", "-f", "json", "--jobs", "1",
        ]),
        "audit overrides",
    );
    assert_eq!(json["totals"]["files"], 1);
    assert_eq!(json["files"][0]["path"], "extra/a.test.ts");
}

#[test]
fn test_audit_reads_config_file() {
    let repo = TestRepo::new();
    repo.with_clean_suite();
    repo.add_file("specguard.toml", "[scan]\nexclude_dirs = [\"api\"]\n");

    let json = assert_valid_json(
        &repo.run_cli_success(&["audit", "-f", "json"]),
        "audit with config",
    );
    assert_eq!(json["totals"]["files"], 1);
    assert_eq!(json["files"][0]["path"], "ui/login.spec.ts");
}

#[test]
fn test_audit_malformed_config_exits_2() {
    let repo = TestRepo::new();
    repo.with_clean_suite();
    repo.add_file("specguard.toml", "[scan\n");

    let (code, _stdout, stderr) = repo.run_cli_failure(&["audit"]);
    assert_eq!(code, Some(2));
    assert_contains(&stderr, "specguard.toml", true, "config path named");
}

#[test]
fn test_audit_missing_root_exits_1() {
    let repo = TestRepo::new();
    let (code, _stdout, _stderr) = repo.run_cli_failure(&["audit", "does-not-exist"]);
    assert_eq!(code, Some(1));
}

#[test]
fn test_audit_explicit_root_path() {
    let repo = TestRepo::new();
    repo.with_clean_suite();

    let json = assert_valid_json(
        &repo.run_cli_success(&["audit", &repo.path_str(), "-f", "json"]),
        "audit explicit root",
    );
    assert_eq!(json["totals"]["files"], 2);
}
