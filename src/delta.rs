//! Delta calculation between two versions of an artifact
//!
//! Either side may be missing. The policy for one size kind `k`:
//!
//! | base    | compare | delta                     | ratio                   |
//! |---------|---------|---------------------------|-------------------------|
//! | missing | missing | 0                         | 0                       |
//! | present | missing | `-base[k]`                | 1                       |
//! | missing | present | `compare[k]`              | 0                       |
//! | present | present | `compare[k] - base[k]`    | `compare[k] / base[k]`  |
//!
//! The ratio is the compare size relative to the base size, not a percent
//! change. Removed artifacts report 1 and added artifacts report 0.
//! When both are present and `base[k]` is 0 the ratio is 1 if `compare[k]`
//! is also 0 and infinite otherwise. Infinite ratios serialize as `null`.

use crate::build::{Artifact, Sizes};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Anything with per-kind sizes that can be compared
///
/// Implemented by [`Artifact`] and by [`Sizes`], so build totals and group
/// sums go through the same policy as a hashless pseudo-artifact.
pub trait SizeSource {
    /// Content fingerprint, if the source has one
    fn hash(&self) -> Option<&str>;

    /// All recorded sizes
    fn sizes(&self) -> &Sizes;

    /// Size for one kind, 0 when not recorded
    fn size(&self, kind: &str) -> u64 {
        self.sizes().get(kind).copied().unwrap_or(0)
    }
}

impl SizeSource for Artifact {
    fn hash(&self) -> Option<&str> {
        Some(&self.hash)
    }

    fn sizes(&self) -> &Sizes {
        &self.sizes
    }
}

impl SizeSource for Sizes {
    fn hash(&self) -> Option<&str> {
        None
    }

    fn sizes(&self) -> &Sizes {
        self
    }
}

/// Absolute delta for one size kind
///
/// # Examples
///
/// ```
/// use build_tracker::build::Artifact;
/// use build_tracker::delta::delta;
///
/// let before = Artifact::new("main.js", "a", [("stat", 100)]);
/// let after = Artifact::new("main.js", "b", [("stat", 150)]);
///
/// assert_eq!(delta("stat", Some(&before), Some(&after)), 50);
/// assert_eq!(delta("stat", Some(&before), None), -100);
/// assert_eq!(delta("stat", None, Some(&after)), 150);
/// assert_eq!(delta::<Artifact>("stat", None, None), 0);
/// ```
pub fn delta<S: SizeSource + ?Sized>(kind: &str, base: Option<&S>, compare: Option<&S>) -> i64 {
    match (base, compare) {
        (None, None) => 0,
        (Some(base), None) => -signed(base.size(kind)),
        (None, Some(compare)) => signed(compare.size(kind)),
        (Some(base), Some(compare)) => signed(compare.size(kind)) - signed(base.size(kind)),
    }
}

/// Compare size relative to base size for one size kind
///
/// # Examples
///
/// ```
/// use build_tracker::build::Artifact;
/// use build_tracker::delta::delta_ratio;
///
/// let before = Artifact::new("main.js", "a", [("stat", 100)]);
/// let after = Artifact::new("main.js", "b", [("stat", 150)]);
///
/// assert_eq!(delta_ratio("stat", Some(&before), Some(&after)), 1.5);
/// assert_eq!(delta_ratio("stat", Some(&before), None), 1.0);
/// assert_eq!(delta_ratio("stat", None, Some(&after)), 0.0);
/// ```
pub fn delta_ratio<S: SizeSource + ?Sized>(
    kind: &str,
    base: Option<&S>,
    compare: Option<&S>,
) -> f64 {
    match (base, compare) {
        (None, None) => 0.0,
        (Some(_), None) => 1.0,
        (None, Some(_)) => 0.0,
        (Some(base), Some(compare)) => {
            let base_size = base.size(kind);
            let compare_size = compare.size(kind);
            match (base_size, compare_size) {
                (0, 0) => 1.0,
                (0, _) => f64::INFINITY,
                _ => compare_size as f64 / base_size as f64,
            }
        }
    }
}

/// True unless both sides are present with identical hashes
pub fn hash_changed<S: SizeSource + ?Sized>(base: Option<&S>, compare: Option<&S>) -> bool {
    match (base, compare) {
        (Some(base), Some(compare)) => base.hash() != compare.hash(),
        _ => true,
    }
}

/// Delta and ratio for one size kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeDelta {
    /// Absolute change in bytes (negative = smaller)
    pub delta: i64,
    /// Compare size relative to base size
    #[serde(with = "ratio_serde")]
    pub delta_ratio: f64,
}

/// Ratios that are not finite are written as `null` and read back as infinity
pub(crate) mod ratio_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ratio: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if ratio.is_finite() {
            serializer.serialize_f64(*ratio)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Per-kind deltas, in the order kinds were first seen
pub type SizeDeltas = IndexMap<String, SizeDelta>;

/// Compute deltas for every size kind present on either side
///
/// Kinds recorded on the base come first, followed by kinds only the
/// compare side has.
pub fn size_deltas<S: SizeSource + ?Sized>(base: Option<&S>, compare: Option<&S>) -> SizeDeltas {
    let mut deltas = SizeDeltas::new();
    let kinds = base
        .into_iter()
        .chain(compare)
        .flat_map(|source| source.sizes().keys());

    for kind in kinds {
        if deltas.contains_key(kind) {
            continue;
        }
        deltas.insert(
            kind.clone(),
            SizeDelta {
                delta: delta(kind, base, compare),
                delta_ratio: delta_ratio(kind, base, compare),
            },
        );
    }
    deltas
}

/// How an artifact's presence changed between two builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactStatus {
    /// Present in both builds
    Present,
    /// Only in the later build
    Added,
    /// Only in the earlier build
    Removed,
    /// In neither build (it exists elsewhere in the history)
    Absent,
}

/// Change of one artifact between an earlier and a later build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDelta {
    /// Artifact name
    pub name: String,
    /// Presence in the two builds
    pub status: ArtifactStatus,
    /// Per-kind deltas
    pub sizes: SizeDeltas,
    /// True if the content changed, appeared or disappeared
    pub hash_changed: bool,
}

impl ArtifactDelta {
    /// Compare `base` (earlier) against `compare` (later)
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::build::Artifact;
    /// use build_tracker::delta::{ArtifactDelta, ArtifactStatus};
    ///
    /// let added = Artifact::new("burritos", "def", [("stat", 469), ("gzip", 93)]);
    /// let delta = ArtifactDelta::between("burritos", None, Some(&added));
    ///
    /// assert_eq!(delta.status, ArtifactStatus::Added);
    /// assert_eq!(delta.delta("stat"), 469);
    /// assert_eq!(delta.delta_ratio("gzip"), 0.0);
    /// assert!(delta.hash_changed);
    /// ```
    pub fn between(
        name: impl Into<String>,
        base: Option<&Artifact>,
        compare: Option<&Artifact>,
    ) -> Self {
        let status = match (base, compare) {
            (Some(_), Some(_)) => ArtifactStatus::Present,
            (None, Some(_)) => ArtifactStatus::Added,
            (Some(_), None) => ArtifactStatus::Removed,
            (None, None) => ArtifactStatus::Absent,
        };

        Self {
            name: name.into(),
            status,
            sizes: size_deltas(base, compare),
            hash_changed: hash_changed(base, compare),
        }
    }

    /// Delta for one kind, 0 if neither side recorded it
    pub fn delta(&self, kind: &str) -> i64 {
        self.sizes.get(kind).map(|d| d.delta).unwrap_or(0)
    }

    /// Ratio for one kind, 0 if neither side recorded it
    pub fn delta_ratio(&self, kind: &str) -> f64 {
        self.sizes.get(kind).map(|d| d.delta_ratio).unwrap_or(0.0)
    }
}

fn signed(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}
