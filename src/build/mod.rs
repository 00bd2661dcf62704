//! Artifact size model
//!
//! A [`Build`] is one immutable snapshot of a project's artifacts at a given
//! revision. Its totals are computed on first request and cached for the
//! lifetime of the value.

pub mod artifact;
pub mod meta;

pub use artifact::{Artifact, Sizes};
pub use meta::{BuildMeta, MetaValue};

use crate::error::TrackerError;
use crate::filter::ArtifactMatcher;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Build record as supplied by collectors and persistence layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Build metadata
    pub meta: BuildMeta,
    /// Artifacts in discovery order
    pub artifacts: Vec<Artifact>,
}

/// One snapshot of a project's artifacts
///
/// Artifacts keep their discovery order and are unique by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BuildRecord", into = "BuildRecord")]
pub struct Build {
    meta: BuildMeta,
    artifacts: IndexMap<String, Artifact>,
    totals: OnceLock<Sizes>,
}

impl Build {
    /// Create a build, rejecting duplicate artifact names and an empty revision
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::build::{Artifact, Build, BuildMeta};
    ///
    /// let build = Build::new(
    ///     BuildMeta::new("abc", 1_700_000_000),
    ///     vec![
    ///         Artifact::new("main.js", "111", [("stat", 100), ("gzip", 40)]),
    ///         Artifact::new("vendor.js", "222", [("stat", 300), ("gzip", 90)]),
    ///     ],
    /// )?;
    ///
    /// assert_eq!(build.totals()["stat"], 400);
    /// assert_eq!(build.totals()["gzip"], 130);
    /// # Ok::<(), build_tracker::error::TrackerError>(())
    /// ```
    pub fn new(meta: BuildMeta, artifacts: Vec<Artifact>) -> Result<Self, TrackerError> {
        if meta.revision().trim().is_empty() {
            return Err(TrackerError::MissingRevision);
        }

        let mut by_name = IndexMap::with_capacity(artifacts.len());
        for artifact in artifacts {
            if by_name.contains_key(&artifact.name) {
                return Err(TrackerError::DuplicateArtifact {
                    name: artifact.name,
                    revision: meta.revision().to_string(),
                });
            }
            by_name.insert(artifact.name.clone(), artifact);
        }

        Ok(Self {
            meta,
            artifacts: by_name,
            totals: OnceLock::new(),
        })
    }

    /// Build metadata
    pub fn meta(&self) -> &BuildMeta {
        &self.meta
    }

    /// Revision value
    pub fn revision(&self) -> &str {
        self.meta.revision()
    }

    /// Build timestamp (seconds since the Unix epoch)
    pub fn timestamp(&self) -> i64 {
        self.meta.timestamp
    }

    /// Artifacts in discovery order
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Artifact names in discovery order
    pub fn artifact_names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Look up an artifact by name
    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.get(name)
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// True if the build has no artifacts
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Sum of every size kind across all artifacts
    ///
    /// Computed once and cached. Concurrent first calls may each compute the
    /// sum; only one result is kept and they are identical.
    pub fn totals(&self) -> &Sizes {
        self.totals.get_or_init(|| sum_sizes(self.artifacts.values()))
    }

    /// Totals without the contribution of artifacts matched by `filter`
    ///
    /// Every size kind of the unfiltered totals is kept, even when the
    /// filtered value drops to zero. The cached totals are never modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::build::{Artifact, Build, BuildMeta};
    /// use build_tracker::filter::ArtifactFilter;
    ///
    /// let build = Build::new(
    ///     BuildMeta::new("abc", 0),
    ///     vec![
    ///         Artifact::new("main.js", "1", [("stat", 100)]),
    ///         Artifact::new("main.js.map", "2", [("stat", 900)]),
    ///     ],
    /// )?;
    /// let maps = ArtifactFilter::new(r"\.map$")?;
    ///
    /// assert_eq!(build.totals_filtered(&maps)["stat"], 100);
    /// assert_eq!(build.totals()["stat"], 1000);
    /// # Ok::<(), build_tracker::error::TrackerError>(())
    /// ```
    pub fn totals_filtered<M: ArtifactMatcher + ?Sized>(&self, filter: &M) -> Sizes {
        let mut totals = self.totals().clone();
        for artifact in self.artifacts.values() {
            if !filter.matches(&artifact.name) {
                continue;
            }
            for (kind, bytes) in &artifact.sizes {
                if let Some(total) = totals.get_mut(kind) {
                    *total = total.saturating_sub(*bytes);
                }
            }
        }
        totals
    }

    /// Summed sizes of the artifacts matched by `matcher`
    ///
    /// Used for artifact groups. Only kinds present on a matched artifact
    /// appear in the result.
    pub fn matched_sizes<M: ArtifactMatcher + ?Sized>(&self, matcher: &M) -> Sizes {
        sum_sizes(
            self.artifacts
                .values()
                .filter(|artifact| matcher.matches(&artifact.name)),
        )
    }
}

impl TryFrom<BuildRecord> for Build {
    type Error = TrackerError;

    fn try_from(record: BuildRecord) -> Result<Self, Self::Error> {
        Self::new(record.meta, record.artifacts)
    }
}

impl From<Build> for BuildRecord {
    fn from(build: Build) -> Self {
        Self {
            meta: build.meta,
            artifacts: build.artifacts.into_values().collect(),
        }
    }
}

fn sum_sizes<'a>(artifacts: impl Iterator<Item = &'a Artifact>) -> Sizes {
    let mut totals = Sizes::new();
    for artifact in artifacts {
        for (kind, bytes) in &artifact.sizes {
            let total = totals.entry(kind.clone()).or_insert(0);
            *total = total.saturating_add(*bytes);
        }
    }
    totals
}
