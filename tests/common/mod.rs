//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Assertion helpers for ratio comparisons
//! - Build history and config fixtures
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures;
//!
//! let temp_dir = tempfile::TempDir::new().unwrap();
//! let history = fixtures::write_history(temp_dir.path(), fixtures::HISTORY_JSON);
//! ```

pub mod assertions;
pub mod fixtures;

use assert_cmd::Command;

/// Command for the build-tracker binary, run inside `dir`
///
/// Running inside a temp dir keeps a stray `.build-tracker.toml` in the
/// working tree from leaking into tests.
#[allow(dead_code)]
pub fn bin_in(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_build-tracker"));
    cmd.current_dir(dir);
    cmd
}
