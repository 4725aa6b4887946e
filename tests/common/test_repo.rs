//! TestRepo builder for integration testing
//!
//! Creates spec trees in a temporary directory and drives the compiled
//! `specguard` binary against them.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A fully-formed `@spec` declaration with all three narrative markers
pub fn complete_spec(id: &str, description: &str) -> String {
    format!(
        r#"test('{id}: {description}', {{ tag: '@spec' }}, async ({{ page }}) => {{
  // GIVEN: the page is open
  await page.goto('/')
  // WHEN: the user acts
  await page.click('#go')
  // THEN: the result is shown
  await expect(page.locator('#result')).toHaveText('done')
}})
"#
    )
}

/// A pending `@spec` placeholder
pub fn pending_spec(id: &str, description: &str) -> String {
    format!("test.fixme('{id}: {description}', {{ tag: '@spec' }}, async () => {{}})\n")
}

/// A regression workflow test
pub fn regression(id_prefix: &str) -> String {
    format!(
        "test('{id_prefix}-REGRESSION: full workflow', {{ tag: '@regression' }}, async () => {{}})\n"
    )
}

/// Builder for creating test trees
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new empty test tree
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the path to the tree root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get path as string
    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().to_string()
    }

    /// Add a file with the given content
    pub fn add_file(&self, relative_path: &str, content: &str) -> &Self {
        let full_path = self.dir.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Add a spec file with a `Spec Count:` header followed by `body`
    pub fn add_spec_file(&self, relative_path: &str, declared: usize, body: &str) -> &Self {
        let content = format!(
            "/**\n * Spec Count: {declared}\n */\nimport {{ test, expect }} from '@playwright/test'\n\n{body}"
        );
        self.add_file(relative_path, &content)
    }

    /// Run the specguard binary and return output
    pub fn run_cli(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new(env!("CARGO_BIN_EXE_specguard"))
            .current_dir(self.path())
            .env_remove("SPECGUARD_CONFIG")
            .env_remove("RUST_LOG")
            .args(args)
            .output()
    }

    /// Run CLI and expect success, return stdout
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            output.status.success(),
            "CLI command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run CLI and expect failure, return (exit code, stdout, stderr)
    pub fn run_cli_failure(&self, args: &[&str]) -> (Option<i32>, String, String) {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            !output.status.success(),
            "CLI command {:?} should have failed",
            args
        );
        (
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }

    // ========================================================================
    // Pre-configured trees
    // ========================================================================

    /// Two domains, every declaration complete, headers correct
    pub fn with_clean_suite(&self) -> &Self {
        self.add_spec_file(
            "api/users.spec.ts",
            3,
            &[
                complete_spec("API-USERS-001", "creates a user from a valid payload"),
                complete_spec("API-USERS-002", "rejects an invalid email address"),
                complete_spec("API-USERS-003", "accepts a name at the max length"),
                regression("API-USERS"),
            ]
            .concat(),
        );
        self.add_spec_file(
            "ui/login.spec.ts",
            2,
            &[
                complete_spec("UI-LOGIN-001", "shows an error for a wrong password"),
                complete_spec("UI-LOGIN-002", "redirects to the dashboard on success"),
            ]
            .concat(),
        )
    }

    /// The same identifier declared in two different files
    pub fn with_cross_file_duplicate(&self) -> &Self {
        self.add_spec_file(
            "api/a.spec.ts",
            1,
            &complete_spec("API-X-001", "creates a record on submit"),
        );
        self.add_spec_file(
            "api/b.spec.ts",
            1,
            &complete_spec("API-X-001", "deletes a record on request"),
        )
    }

    /// `API-X-001` followed by `API-X-003`
    pub fn with_sequence_gap(&self) -> &Self {
        self.add_spec_file(
            "api/gap.spec.ts",
            2,
            &[
                complete_spec("API-X-001", "creates a record on submit"),
                complete_spec("API-X-003", "rejects an invalid payload"),
            ]
            .concat(),
        )
    }

    /// Header says 5, file has 4 `@spec` declarations
    pub fn with_header_mismatch(&self) -> &Self {
        self.add_spec_file(
            "api/count.spec.ts",
            5,
            &[
                complete_spec("API-C-001", "creates a record on submit"),
                complete_spec("API-C-002", "rejects an invalid payload"),
                complete_spec("API-C-003", "handles an empty payload"),
                complete_spec("API-C-004", "accepts the max payload size"),
            ]
            .concat(),
        )
    }

    /// A snapshot directory holding a file that would otherwise match
    pub fn with_snapshot_dir(&self) -> &Self {
        self.add_file(
            "api/__snapshots__/users.spec.ts",
            "test('stale snapshot copy', () => {})",
        )
    }

    /// Bodies full of lexical traps around the declarations
    pub fn with_tricky_lexing(&self) -> &Self {
        let body = r#"
// test('commented out', () => {})
const pattern = /\)\(/g
test('LEX-T-001: parens inside strings and regexes', { tag: '@spec' }, async () => {
  // GIVEN: strings with ")" and '(' and `)`
  const a = ")(" + '(' + `)`
  // WHEN: a regex with a class containing a slash [/)]
  const re = /[/)]+/.test(a) ? 1 / 2 : (3)
  /* THEN is below; this block has a ) */
  // THEN: the span ends at the real closer
  expect(re).toBe(0.5)
})
test('LEX-T-002: follows immediately', { tag: '@spec' }, async () => {
  // GIVEN
  // WHEN
  // THEN
})
"#;
        self.add_spec_file("lex/tricky.spec.ts", 2, body)
    }
}
