//! CLI command integration tests
//!
//! Drives the compiled binary for every subcommand and output format
//! (text, toon, json), including exit codes.

pub mod audit_tests;
pub mod scan_tests;
