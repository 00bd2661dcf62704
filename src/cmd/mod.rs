//! Command handlers for the build-tracker CLI
//!
//! Each submodule handles a specific CLI command.

pub mod check;
pub mod compare;
pub mod completions;

pub use check::{cmd_check, CheckOptions};
pub use compare::{cmd_compare, render_comparison, CompareOptions};
pub use completions::cmd_completions;

use crate::config::{ConfigLoader, TrackerConfig};
use anyhow::Result;
use std::path::Path;

/// Load an explicit config file, or `.build-tracker.toml` from the working directory
pub(crate) fn load_config(config: Option<&Path>) -> Result<TrackerConfig> {
    match config {
        Some(path) => ConfigLoader::load_file(path),
        None => ConfigLoader::load(Path::new(".")),
    }
}
