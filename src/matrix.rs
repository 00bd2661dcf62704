//! Render-ready comparison matrix
//!
//! The matrix is the single contract between the comparison engine and every
//! exporter. It has three parts sharing one column layout:
//!
//! ```text
//! header: [label] [rev 0] [rev 1] [Δ1-0] [rev 2] [Δ2-0] [Δ2-1] ...
//! total:  [label] [tot 0] [tot 1] [Δ1-0] [tot 2] [Δ2-0] [Δ2-1] ...
//! body:   [name]  [size 0][size 1][Δ1-0] [size 2][Δ2-0] [Δ2-1] ...
//! ```
//!
//! Build `i` contributes one value column and `i` delta columns. An artifact
//! missing from a build gets an [`Cell::Absent`] value cell, so every row has
//! the same length.

use crate::build::{Build, MetaValue, Sizes};
use crate::comparator::BuildDelta;
use crate::delta::{ArtifactDelta, SizeDeltas};
use serde::{Deserialize, Serialize};

/// Label of the first header cell
pub const HEADER_LABEL: &str = "Artifact";

/// Label of the first total-row cell
pub const TOTAL_LABEL: &str = "All";

/// One matrix cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Cell {
    /// Plain label
    Text {
        /// Label text
        text: String,
    },

    /// Header cell for a build
    Revision {
        /// The build's revision, possibly linked
        revision: MetaValue,
    },

    /// Header cell for a comparison between two builds
    RevisionDelta {
        /// Revision of the later build
        revision: String,
        /// Revision of the earlier build
        against: String,
        /// Position of the earlier build in the history
        earlier_index: usize,
    },

    /// A build's totals
    Totals {
        /// Summed sizes
        sizes: Sizes,
    },

    /// Total deltas for a comparison
    TotalDelta {
        /// Revision of the earlier build
        against: String,
        /// Per-kind deltas
        deltas: SizeDeltas,
    },

    /// Row label for an artifact
    Artifact {
        /// Artifact name
        name: String,
    },

    /// An artifact's own sizes in one build
    Sizes {
        /// Content fingerprint
        hash: String,
        /// Measured sizes
        sizes: Sizes,
    },

    /// An artifact's change for one comparison
    Delta {
        /// The computed delta
        delta: ArtifactDelta,
    },

    /// The artifact does not exist in this build
    Absent,
}

impl Cell {
    fn text(text: &str) -> Self {
        Self::Text {
            text: text.to_string(),
        }
    }
}

/// Header, total row and one body row per artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    /// Column headers
    pub header: Vec<Cell>,
    /// Aggregate values
    pub total: Vec<Cell>,
    /// One row per artifact, in artifact union order
    pub body: Vec<Vec<Cell>>,
}

impl ComparisonMatrix {
    /// Number of columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// True if every row has as many cells as the header
    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        self.total.len() == width && self.body.iter().all(|row| row.len() == width)
    }

    /// All rows in render order: header, total, body
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        std::iter::once(self.header.as_slice())
            .chain(std::iter::once(self.total.as_slice()))
            .chain(self.body.iter().map(Vec::as_slice))
    }

    /// Body row of one artifact
    pub fn artifact_row(&self, name: &str) -> Option<&[Cell]> {
        self.body
            .iter()
            .find(|row| matches!(row.first(), Some(Cell::Artifact { name: n }) if n == name))
            .map(Vec::as_slice)
    }

    /// Size kinds that appear anywhere in the totals, in first-seen order
    pub fn size_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = Vec::new();
        for cell in &self.total {
            if let Cell::Totals { sizes } = cell {
                for kind in sizes.keys() {
                    if !kinds.contains(kind) {
                        kinds.push(kind.clone());
                    }
                }
            }
        }
        kinds
    }
}

/// Assembles a [`ComparisonMatrix`] from builds and their deltas
pub struct MatrixBuilder<'a> {
    builds: &'a [Build],
    totals: &'a [Sizes],
    artifact_names: &'a [String],
}

impl<'a> MatrixBuilder<'a> {
    /// Create a builder
    ///
    /// `totals[i]` must be the (possibly filtered) totals of `builds[i]`.
    pub fn new(builds: &'a [Build], totals: &'a [Sizes], artifact_names: &'a [String]) -> Self {
        Self {
            builds,
            totals,
            artifact_names,
        }
    }

    /// Assemble the matrix from per-build deltas
    ///
    /// `deltas` must come from comparing the same builds, in the same order.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::build::{Artifact, Build, BuildMeta};
    /// use build_tracker::comparator::BuildComparator;
    ///
    /// let builds = vec![
    ///     Build::new(BuildMeta::new("a", 1), vec![Artifact::new("main.js", "1", [("stat", 10)])])?,
    ///     Build::new(BuildMeta::new("b", 2), vec![Artifact::new("vendor.js", "2", [("stat", 20)])])?,
    /// ];
    ///
    /// let matrix = BuildComparator::new(&builds).to_matrix();
    /// assert_eq!(matrix.width(), 1 + 1 + 2);
    /// assert_eq!(matrix.body.len(), 2);
    /// assert!(matrix.is_rectangular());
    /// # Ok::<(), build_tracker::error::TrackerError>(())
    /// ```
    pub fn build(&self, deltas: &[BuildDelta]) -> ComparisonMatrix {
        debug_assert_eq!(self.builds.len(), deltas.len());

        ComparisonMatrix {
            header: self.header(),
            total: self.total_row(deltas),
            body: self
                .artifact_names
                .iter()
                .map(|name| self.artifact_row(name, deltas))
                .collect(),
        }
    }

    fn header(&self) -> Vec<Cell> {
        let mut cells = vec![Cell::text(HEADER_LABEL)];
        for (index, build) in self.builds.iter().enumerate() {
            cells.push(Cell::Revision {
                revision: build.meta().revision.clone(),
            });
            for (earlier_index, earlier) in self.builds[..index].iter().enumerate() {
                cells.push(Cell::RevisionDelta {
                    revision: build.revision().to_string(),
                    against: earlier.revision().to_string(),
                    earlier_index,
                });
            }
        }
        cells
    }

    fn total_row(&self, deltas: &[BuildDelta]) -> Vec<Cell> {
        let mut cells = vec![Cell::text(TOTAL_LABEL)];
        for ((totals, build_delta), index) in self.totals.iter().zip(deltas).zip(0..) {
            cells.push(Cell::Totals {
                sizes: totals.clone(),
            });
            for (earlier, deltas) in self.builds[..index].iter().zip(&build_delta.total_deltas) {
                cells.push(Cell::TotalDelta {
                    against: earlier.revision().to_string(),
                    deltas: deltas.clone(),
                });
            }
        }
        cells
    }

    fn artifact_row(&self, name: &str, deltas: &[BuildDelta]) -> Vec<Cell> {
        let mut cells = vec![Cell::Artifact {
            name: name.to_string(),
        }];
        for (build, build_delta) in self.builds.iter().zip(deltas) {
            cells.push(match build.artifact(name) {
                Some(artifact) => Cell::Sizes {
                    hash: artifact.hash.clone(),
                    sizes: artifact.sizes.clone(),
                },
                None => Cell::Absent,
            });
            for (earlier, artifact_deltas) in build_delta.artifact_deltas.iter().enumerate() {
                cells.push(match artifact_deltas.get(name) {
                    Some(delta) => Cell::Delta {
                        delta: delta.clone(),
                    },
                    // Only reachable if deltas were computed over other names
                    None => Cell::Delta {
                        delta: ArtifactDelta::between(
                            name,
                            self.builds[earlier].artifact(name),
                            build.artifact(name),
                        ),
                    },
                });
            }
        }
        cells
    }
}
