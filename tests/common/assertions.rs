//! Custom assertions for integration tests
//!
//! Helpers for validating CLI output and picking records out of the JSON
//! report across text, TOON, and JSON formats.

#![allow(clippy::manual_strip)]

use serde_json::Value;

/// Assert that output is valid JSON and return parsed value
pub fn assert_valid_json(output: &str, context: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|e| {
        panic!(
            "Expected valid JSON ({}): {}\nOutput:\n{}",
            context, e, output
        )
    })
}

/// Assert that output contains valid TOON markers
pub fn assert_valid_toon(output: &str, context: &str) {
    assert!(
        output.contains("_type:"),
        "Expected TOON output to contain '_type:' marker ({})\nOutput:\n{}",
        context,
        output
    );
}

/// Assert that JSON output has expected type
pub fn assert_json_type(json: &Value, expected_type: &str) {
    let actual_type = json["_type"]
        .as_str()
        .unwrap_or_else(|| panic!("JSON missing '_type' field"));
    assert_eq!(
        actual_type, expected_type,
        "Expected JSON type '{}' but got '{}'",
        expected_type, actual_type
    );
}

/// Assert that output contains a specific string (case-insensitive option)
pub fn assert_contains(output: &str, needle: &str, case_sensitive: bool, context: &str) {
    let found = if case_sensitive {
        output.contains(needle)
    } else {
        output.to_lowercase().contains(&needle.to_lowercase())
    };
    assert!(
        found,
        "Expected output to contain '{}' ({})\nOutput:\n{}",
        needle, context, output
    );
}

/// Assert that output does NOT contain a specific string
pub fn assert_not_contains(output: &str, needle: &str, context: &str) {
    assert!(
        !output.contains(needle),
        "Expected output NOT to contain '{}' ({})\nOutput:\n{}",
        needle,
        context,
        output
    );
}

/// The file entry with `path` in an audit report
pub fn find_file<'a>(report: &'a Value, path: &str) -> &'a Value {
    report["files"]
        .as_array()
        .and_then(|files| files.iter().find(|f| f["path"] == path))
        .unwrap_or_else(|| panic!("No file '{}' in report:\n{:#}", path, report))
}

/// Issue codes of a file entry (or of a scan result)
pub fn issue_codes(file: &Value) -> Vec<String> {
    file["issues"]
        .as_array()
        .map(|issues| {
            issues
                .iter()
                .filter_map(|i| i["code"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Every issue with `code` in a file entry
pub fn issues_with_code<'a>(file: &'a Value, code: &str) -> Vec<&'a Value> {
    file["issues"]
        .as_array()
        .map(|issues| issues.iter().filter(|i| i["code"] == code).collect())
        .unwrap_or_default()
}

/// Get TOON type from output
pub fn get_toon_type(output: &str) -> Option<String> {
    for line in output.lines() {
        let line = line.trim();
        if line.starts_with("_type:") {
            return Some(line[6..].trim().trim_matches('"').to_string());
        }
    }
    None
}
