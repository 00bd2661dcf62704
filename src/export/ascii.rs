//! Aligned plain-text table

use super::{value_rows, MatrixExporter};
use crate::matrix::ComparisonMatrix;
use anyhow::Result;
use console::measure_text_width;

/// Plain-text table with aligned columns
#[derive(Debug, Clone)]
pub struct AsciiExporter {
    size_key: String,
    human: bool,
}

impl AsciiExporter {
    /// Exporter showing `size_key` with human-readable sizes
    pub fn new(size_key: impl Into<String>) -> Self {
        Self {
            size_key: size_key.into(),
            human: true,
        }
    }

    /// Show raw byte counts instead of KB/MB
    pub fn raw(mut self) -> Self {
        self.human = false;
        self
    }
}

impl MatrixExporter for AsciiExporter {
    fn export(&self, matrix: &ComparisonMatrix) -> Result<String> {
        let rows: Vec<Vec<(String, bool)>> = value_rows(matrix, &self.size_key)
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| {
                        let text = if self.human { value.human() } else { value.raw() };
                        (text, value.is_numeric())
                    })
                    .collect()
            })
            .collect();

        let mut widths = vec![0usize; matrix.width()];
        for row in &rows {
            for (width, (text, _)) in widths.iter_mut().zip(row) {
                *width = (*width).max(measure_text_width(text));
            }
        }

        let separator = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-");

        let mut output = String::new();
        for (index, row) in rows.iter().enumerate() {
            let line = row
                .iter()
                .zip(&widths)
                .map(|((text, numeric), width)| {
                    let padding = " ".repeat(width - measure_text_width(text));
                    if *numeric {
                        format!("{}{}", padding, text)
                    } else {
                        format!("{}{}", text, padding)
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ");
            output.push_str(line.trim_end());
            output.push('\n');

            // Rule under the header and under the total row
            if index < 2 {
                output.push_str(&separator);
                output.push('\n');
            }
        }

        Ok(output)
    }
}
