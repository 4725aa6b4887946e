//! Common test utilities and fixtures for specguard integration tests
//!
//! This module provides:
//! - `TestRepo` builder for creating test trees of spec files
//! - Custom assertions for validating CLI output in text, TOON and JSON

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod assertions;
pub mod test_repo;

pub use assertions::*;
pub use test_repo::TestRepo;
