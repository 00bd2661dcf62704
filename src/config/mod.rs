//! Configuration for build-tracker
//!
//! This module provides:
//! - `.build-tracker.toml` config file support
//! - Conversion of configured filters, groups and budgets into runtime types

pub mod file;
pub mod loader;

pub use file::{ArtifactBudgetConfig, GroupConfig, TrackerConfig, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
