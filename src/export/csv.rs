//! CSV with raw byte counts

use super::{value_rows, MatrixExporter};
use crate::matrix::ComparisonMatrix;
use anyhow::{Context, Result};

/// CSV rows in matrix order; absent cells are empty fields
#[derive(Debug, Clone)]
pub struct CsvExporter {
    size_key: String,
}

impl CsvExporter {
    /// Exporter showing `size_key`
    pub fn new(size_key: impl Into<String>) -> Self {
        Self {
            size_key: size_key.into(),
        }
    }
}

impl MatrixExporter for CsvExporter {
    fn export(&self, matrix: &ComparisonMatrix) -> Result<String> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        for row in value_rows(matrix, &self.size_key) {
            writer
                .write_record(row.iter().map(|value| value.raw()))
                .context("Failed to write CSV row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_matrix;
    use super::*;

    #[test]
    fn test_csv_export_rows() {
        let output = CsvExporter::new("gzip").export(&sample_matrix()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Artifact,a,b,b Δ a",
                "All,45,138,93",
                "tacos,45,45,0",
                "burritos,,93,93",
            ]
        );
    }

    #[test]
    fn test_csv_export_quotes_names_with_commas() {
        use crate::build::{Artifact, Build, BuildMeta};
        use crate::comparator::BuildComparator;

        let builds = vec![Build::new(
            BuildMeta::new("a", 1),
            vec![Artifact::new("a,b.js", "1", [("stat", 1)])],
        )
        .unwrap()];
        let matrix = BuildComparator::new(&builds).to_matrix();
        let output = CsvExporter::new("stat").export(&matrix).unwrap();
        assert!(output.contains("\"a,b.js\",1"));
    }
}
