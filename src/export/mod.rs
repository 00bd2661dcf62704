//! Exporters for the comparison matrix
//!
//! Exporters read values straight out of [`ComparisonMatrix`] cells for one
//! size kind. Nothing is recomputed here.

mod ascii;
mod csv;
mod markdown;

pub use self::ascii::AsciiExporter;
pub use self::csv::CsvExporter;
pub use self::markdown::MarkdownExporter;

use crate::fmt::{format_bytes, format_delta};
use crate::matrix::{Cell, ComparisonMatrix};
use anyhow::{Context, Result};
use std::borrow::Cow;

/// Output format for a rendered matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    /// Aligned plain-text table
    #[default]
    Ascii,
    /// Comma-separated values with raw byte counts
    Csv,
    /// Markdown table
    Markdown,
    /// The full matrix as JSON
    Json,
}

/// Renders a matrix to text
pub trait MatrixExporter {
    /// Render `matrix`
    fn export(&self, matrix: &ComparisonMatrix) -> Result<String>;
}

/// Full matrix as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl MatrixExporter for JsonExporter {
    fn export(&self, matrix: &ComparisonMatrix) -> Result<String> {
        serde_json::to_string_pretty(matrix).context("Failed to serialize comparison matrix")
    }
}

/// Render `matrix` in `format`, showing `size_key` for size and delta cells
///
/// # Examples
///
/// ```
/// use build_tracker::build::{Artifact, Build, BuildMeta};
/// use build_tracker::comparator::BuildComparator;
/// use build_tracker::export::{export, ExportFormat};
///
/// let builds = vec![
///     Build::new(BuildMeta::new("a", 1), vec![Artifact::new("main.js", "1", [("stat", 10)])])?,
///     Build::new(BuildMeta::new("b", 2), vec![Artifact::new("main.js", "2", [("stat", 25)])])?,
/// ];
/// let matrix = BuildComparator::new(&builds).to_matrix();
///
/// let csv = export(&matrix, ExportFormat::Csv, "stat")?;
/// assert_eq!(csv.lines().last(), Some("main.js,10,25,15"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn export(matrix: &ComparisonMatrix, format: ExportFormat, size_key: &str) -> Result<String> {
    match format {
        ExportFormat::Ascii => AsciiExporter::new(size_key).export(matrix),
        ExportFormat::Csv => CsvExporter::new(size_key).export(matrix),
        ExportFormat::Markdown => MarkdownExporter::new(size_key).export(matrix),
        ExportFormat::Json => JsonExporter.export(matrix),
    }
}

/// A cell's value for one size kind
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    /// Text label
    Label(Cow<'a, str>),
    /// Size in bytes
    Size(u64),
    /// Change in bytes and the compare/base ratio
    Delta {
        /// Bytes
        delta: i64,
        /// Compare size relative to base size
        ratio: f64,
    },
    /// No value (artifact absent from the build)
    Empty,
}

impl CellValue<'_> {
    /// Raw text: labels as-is, numbers unformatted
    pub fn raw(&self) -> String {
        match self {
            Self::Label(text) => text.to_string(),
            Self::Size(bytes) => bytes.to_string(),
            Self::Delta { delta, .. } => delta.to_string(),
            Self::Empty => String::new(),
        }
    }

    /// Human-readable text
    pub fn human(&self) -> String {
        match self {
            Self::Label(text) => text.to_string(),
            Self::Size(bytes) => format_bytes(*bytes),
            Self::Delta { delta, .. } => format_delta(*delta),
            Self::Empty => "-".to_string(),
        }
    }

    /// True for numeric cells, which exporters right-align
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Size(_) | Self::Delta { .. })
    }
}

/// Read one cell's value for `size_key`
pub fn cell_value<'a>(cell: &'a Cell, size_key: &str) -> CellValue<'a> {
    match cell {
        Cell::Text { text } => CellValue::Label(Cow::Borrowed(text)),
        Cell::Revision { revision } => CellValue::Label(Cow::Borrowed(revision.value())),
        Cell::RevisionDelta {
            revision, against, ..
        } => CellValue::Label(Cow::Owned(format!("{} Δ {}", revision, against))),
        Cell::Artifact { name } => CellValue::Label(Cow::Borrowed(name)),
        Cell::Totals { sizes } | Cell::Sizes { sizes, .. } => {
            CellValue::Size(sizes.get(size_key).copied().unwrap_or(0))
        }
        Cell::TotalDelta { deltas, .. } => match deltas.get(size_key) {
            Some(d) => CellValue::Delta {
                delta: d.delta,
                ratio: d.delta_ratio,
            },
            None => CellValue::Delta {
                delta: 0,
                ratio: 0.0,
            },
        },
        Cell::Delta { delta } => CellValue::Delta {
            delta: delta.delta(size_key),
            ratio: delta.delta_ratio(size_key),
        },
        Cell::Absent => CellValue::Empty,
    }
}

/// Every row of the matrix as cell values
pub(crate) fn value_rows<'a>(matrix: &'a ComparisonMatrix, size_key: &str) -> Vec<Vec<CellValue<'a>>> {
    matrix
        .rows()
        .map(|row| row.iter().map(|cell| cell_value(cell, size_key)).collect())
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::build::{Artifact, Build, BuildMeta};
    use crate::comparator::BuildComparator;
    use crate::matrix::ComparisonMatrix;

    pub fn sample_matrix() -> ComparisonMatrix {
        let builds = vec![
            Build::new(
                BuildMeta::new("a", 1),
                vec![Artifact::new("tacos", "abc", [("stat", 123), ("gzip", 45)])],
            )
            .unwrap(),
            Build::new(
                BuildMeta::new("b", 2),
                vec![
                    Artifact::new("tacos", "abc", [("stat", 123), ("gzip", 45)]),
                    Artifact::new("burritos", "def", [("stat", 2048), ("gzip", 93)]),
                ],
            )
            .unwrap(),
        ];
        BuildComparator::new(&builds).to_matrix()
    }
}
