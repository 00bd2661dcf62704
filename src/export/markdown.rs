//! Markdown table

use super::{value_rows, MatrixExporter};
use crate::matrix::ComparisonMatrix;
use anyhow::Result;

/// GitHub-flavored markdown table with human-readable sizes
#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    size_key: String,
}

impl MarkdownExporter {
    /// Exporter showing `size_key`
    pub fn new(size_key: impl Into<String>) -> Self {
        Self {
            size_key: size_key.into(),
        }
    }
}

impl MatrixExporter for MarkdownExporter {
    fn export(&self, matrix: &ComparisonMatrix) -> Result<String> {
        let rows = value_rows(matrix, &self.size_key);
        let mut output = String::new();

        for (index, row) in rows.iter().enumerate() {
            let cells: Vec<String> = row
                .iter()
                .map(|value| value.human().replace('|', "\\|"))
                .collect();
            output.push_str(&format!("| {} |\n", cells.join(" | ")));

            if index == 0 {
                let alignments: Vec<&str> = (0..row.len())
                    .map(|column| if column == 0 { ":--" } else { "--:" })
                    .collect();
                output.push_str(&format!("| {} |\n", alignments.join(" | ")));
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_matrix;
    use super::*;

    #[test]
    fn test_markdown_export_table_shape() {
        let output = MarkdownExporter::new("stat").export(&sample_matrix()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "| Artifact | a | b | b Δ a |");
        assert_eq!(lines[1], "| :-- | --: | --: | --: |");
        assert_eq!(lines[2], "| All | 123 B | 2.12 KB | +2.00 KB |");
        assert_eq!(lines[4], "| burritos | - | 2.00 KB | +2.00 KB |");
    }

    #[test]
    fn test_markdown_export_escapes_pipes() {
        use crate::build::{Artifact, Build, BuildMeta};
        use crate::comparator::BuildComparator;

        let builds = vec![Build::new(
            BuildMeta::new("a", 1),
            vec![Artifact::new("a|b.js", "1", [("stat", 1)])],
        )
        .unwrap()];
        let matrix = BuildComparator::new(&builds).to_matrix();
        let output = MarkdownExporter::new("stat").export(&matrix).unwrap();
        assert!(output.contains("a\\|b.js"));
    }
}
