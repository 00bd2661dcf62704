#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! build-tracker library
//!
//! This library provides the build comparison engine behind the
//! `build-tracker` CLI: artifact size deltas between builds, per-build
//! totals with exclusion filters, and a render-ready comparison matrix.
//! It can be used programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! Comparing two builds:
//!
//! ```
//! use build_tracker::build::{Artifact, Build, BuildMeta};
//! use build_tracker::comparator::BuildComparator;
//! use build_tracker::delta::ArtifactStatus;
//!
//! let builds = vec![
//!     Build::new(
//!         BuildMeta::new("1234567", 1_700_000_000),
//!         vec![Artifact::new("tacos", "abc", [("stat", 123), ("gzip", 45)])],
//!     )?,
//!     Build::new(
//!         BuildMeta::new("890abcd", 1_700_000_600),
//!         vec![
//!             Artifact::new("tacos", "abc", [("stat", 123), ("gzip", 45)]),
//!             Artifact::new("burritos", "def", [("stat", 2048), ("gzip", 93)]),
//!         ],
//!     )?,
//! ];
//!
//! let deltas = BuildComparator::new(&builds).compare_all();
//! let burritos = deltas[1].artifact_delta(0, "burritos").unwrap();
//! assert_eq!(burritos.status, ArtifactStatus::Added);
//! assert_eq!(burritos.delta("gzip"), 93);
//! assert_eq!(deltas[1].total_deltas[0]["stat"].delta, 2048);
//! # Ok::<(), build_tracker::error::TrackerError>(())
//! ```
//!
//! # Advanced Example: Filters and Export
//!
//! Excluding source maps from totals and rendering the matrix:
//!
//! ```
//! use build_tracker::build::{Artifact, Build, BuildMeta};
//! use build_tracker::comparator::BuildComparator;
//! use build_tracker::export::{export, ExportFormat};
//! use build_tracker::filter::FilterSet;
//!
//! let builds = vec![
//!     Build::new(
//!         BuildMeta::new("a", 1),
//!         vec![
//!             Artifact::new("main.js", "1", [("stat", 100)]),
//!             Artifact::new("main.js.map", "2", [("stat", 900)]),
//!         ],
//!     )?,
//!     Build::new(
//!         BuildMeta::new("b", 2),
//!         vec![
//!             Artifact::new("main.js", "3", [("stat", 150)]),
//!             Artifact::new("main.js.map", "4", [("stat", 950)]),
//!         ],
//!     )?,
//! ];
//!
//! let comparator = BuildComparator::with_filters(&builds, FilterSet::new([r"\.map$"])?);
//! let matrix = comparator.to_matrix();
//! assert_eq!(matrix.body.len(), 1);
//!
//! let csv = export(&matrix, ExportFormat::Csv, "stat")?;
//! assert!(csv.contains("All,100,150,50"));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Advanced Example: Budgets
//!
//! Failing CI when the latest build grows too much:
//!
//! ```
//! use build_tracker::config::TrackerConfig;
//! use build_tracker::history::BuildHistory;
//! use build_tracker::comparator::BuildComparator;
//!
//! let config: TrackerConfig = toml_edit::de::from_str(r#"
//!     [[budgets]]
//!     level = "error"
//!     size-key = "gzip"
//!     type = "percentDelta"
//!     maximum = 1.1
//! "#)?;
//!
//! let history = BuildHistory::from_json(r#"[
//!     { "meta": { "revision": "a", "timestamp": 1 },
//!       "artifacts": [{ "name": "main.js", "hash": "1", "sizes": { "gzip": 1000 } }] },
//!     { "meta": { "revision": "b", "timestamp": 2 },
//!       "artifacts": [{ "name": "main.js", "hash": "2", "sizes": { "gzip": 1500 } }] }
//! ]"#)?;
//!
//! let report = config
//!     .budget_checker()?
//!     .check(&BuildComparator::new(history.builds()));
//! assert_eq!(report.error_count(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Budget evaluation against the latest build
pub mod budget;
/// Build, artifact and metadata model
pub mod build;
/// Command handlers for CLI operations
pub mod cmd;
/// Pairwise comparison across a build history
pub mod comparator;
/// Configuration file loading
pub mod config;
/// Per-artifact and per-total delta calculation
pub mod delta;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Matrix exporters (ASCII, CSV, Markdown, JSON)
pub mod export;
/// Artifact name filters
pub mod filter;
/// Shared formatting utilities
pub mod fmt;
/// Named artifact groups
pub mod group;
/// Build history persistence
pub mod history;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Render-ready comparison matrix
pub mod matrix;
