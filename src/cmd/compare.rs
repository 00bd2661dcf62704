//! Compare command implementation
//!
//! Handles the `build-tracker compare` command which renders the
//! comparison matrix of a build history.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::build::Build;
use crate::comparator::BuildComparator;
use crate::export::{export, ExportFormat};
use crate::filter::{ArtifactFilter, FilterSet};
use crate::history::BuildHistory;

/// Size kind shown when none is requested and the history has no sizes
pub const DEFAULT_SIZE_KEY: &str = "stat";

/// Options for `build-tracker compare`
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Build history JSON file
    pub history: PathBuf,
    /// Size kind to render; defaults to the first kind in the history
    pub size_key: Option<String>,
    /// Output format
    pub format: ExportFormat,
    /// Extra artifact filters, on top of the configured ones
    pub filters: Vec<String>,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Sort builds by timestamp before comparing
    pub sort: bool,
}

/// Compare every build in a history and print the matrix
///
/// # Examples
///
/// ```no_run
/// use build_tracker::cmd::compare::{cmd_compare, CompareOptions};
/// use build_tracker::export::ExportFormat;
///
/// cmd_compare(&CompareOptions {
///     history: "builds.json".into(),
///     format: ExportFormat::Csv,
///     ..CompareOptions::default()
/// })?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The config file is invalid
/// - A filter is not a valid regular expression
/// - The history cannot be read or fails validation
pub fn cmd_compare(options: &CompareOptions) -> Result<()> {
    let config = super::load_config(options.config.as_deref())?;

    let mut filters = config.filter_set()?;
    for pattern in &options.filters {
        filters.push(ArtifactFilter::new(pattern)?);
    }

    let mut history = BuildHistory::load(&options.history)
        .with_context(|| format!("Failed to load {}", options.history.display()))?;
    if options.sort {
        history.sort_by_timestamp();
    }

    let output = render_comparison(
        history.builds(),
        filters,
        options.format,
        options.size_key.as_deref(),
    )?;
    print!("{}", output);

    Ok(())
}

/// Render the comparison matrix of `builds`
///
/// # Examples
///
/// ```
/// use build_tracker::build::{Artifact, Build, BuildMeta};
/// use build_tracker::cmd::compare::render_comparison;
/// use build_tracker::export::ExportFormat;
/// use build_tracker::filter::FilterSet;
///
/// let builds = vec![
///     Build::new(BuildMeta::new("a", 1), vec![Artifact::new("main.js", "1", [("gzip", 10)])])?,
///     Build::new(BuildMeta::new("b", 2), vec![Artifact::new("main.js", "2", [("gzip", 12)])])?,
/// ];
///
/// let csv = render_comparison(&builds, FilterSet::default(), ExportFormat::Csv, None)?;
/// assert!(csv.ends_with("main.js,10,12,2\n"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn render_comparison(
    builds: &[Build],
    filters: FilterSet,
    format: ExportFormat,
    size_key: Option<&str>,
) -> Result<String> {
    let comparator = BuildComparator::with_filters(builds, filters);
    let matrix = comparator.to_matrix();

    let size_key = match size_key {
        Some(key) => key.to_string(),
        None => matrix
            .size_kinds()
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_SIZE_KEY.to_string()),
    };
    debug!(
        "Rendering {}x{} matrix as {:?} using size key {}",
        matrix.body.len() + 2,
        matrix.width(),
        format,
        size_key
    );

    export(&matrix, format, &size_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Artifact, BuildMeta};

    fn builds() -> Vec<Build> {
        vec![
            Build::new(
                BuildMeta::new("a", 1),
                vec![
                    Artifact::new("main.js", "1", [("gzip", 10), ("stat", 30)]),
                    Artifact::new("main.js.map", "2", [("gzip", 100), ("stat", 400)]),
                ],
            )
            .unwrap(),
            Build::new(
                BuildMeta::new("b", 2),
                vec![
                    Artifact::new("main.js", "3", [("gzip", 12), ("stat", 35)]),
                    Artifact::new("main.js.map", "4", [("gzip", 120), ("stat", 450)]),
                ],
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_render_comparison_defaults_to_first_size_kind() {
        let csv = render_comparison(&builds(), FilterSet::default(), ExportFormat::Csv, None)
            .unwrap();
        assert!(csv.contains("main.js,10,12,2"));
    }

    #[test]
    fn test_render_comparison_uses_requested_size_key() {
        let csv = render_comparison(
            &builds(),
            FilterSet::default(),
            ExportFormat::Csv,
            Some("stat"),
        )
        .unwrap();
        assert!(csv.contains("main.js,30,35,5"));
        assert!(csv.contains("All,430,485,55"));
    }

    #[test]
    fn test_render_comparison_applies_filters() {
        let filters = FilterSet::new([r"\.map$"]).unwrap();
        let csv = render_comparison(&builds(), filters, ExportFormat::Csv, Some("stat")).unwrap();
        assert!(!csv.contains("main.js.map"));
        assert!(csv.contains("All,30,35,5"));
    }

    #[test]
    fn test_render_comparison_empty_history() {
        let output =
            render_comparison(&[], FilterSet::default(), ExportFormat::Json, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["body"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_cmd_compare_missing_history_fails() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = temp_dir.path().join("tracker.toml");
        std::fs::write(&config, "").unwrap();

        let result = cmd_compare(&CompareOptions {
            history: temp_dir.path().join("missing.json"),
            config: Some(config),
            ..CompareOptions::default()
        });
        assert!(result.is_err());
    }
}
