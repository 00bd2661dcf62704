//! Per-artifact size records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Byte counts keyed by size kind (e.g. `stat`, `gzip`, `brotli`)
///
/// Insertion order is the order kinds were first recorded.
pub type Sizes = IndexMap<String, u64>;

/// One named build output with its measured sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact name, unique within a build
    pub name: String,
    /// Content fingerprint
    pub hash: String,
    /// Measured sizes in bytes per size kind
    #[serde(default)]
    pub sizes: Sizes,
}

impl Artifact {
    /// Create an artifact from a name, hash and `(kind, bytes)` pairs
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::build::Artifact;
    ///
    /// let artifact = Artifact::new("main.js", "abc", [("stat", 1024), ("gzip", 300)]);
    /// assert_eq!(artifact.size("gzip"), 300);
    /// assert_eq!(artifact.size("brotli"), 0);
    /// ```
    pub fn new<K, I>(name: impl Into<String>, hash: impl Into<String>, sizes: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, u64)>,
    {
        Self {
            name: name.into(),
            hash: hash.into(),
            sizes: sizes
                .into_iter()
                .map(|(kind, bytes)| (kind.into(), bytes))
                .collect(),
        }
    }

    /// Size for one kind; kinds the artifact was not measured for count as 0
    pub fn size(&self, kind: &str) -> u64 {
        self.sizes.get(kind).copied().unwrap_or(0)
    }

    /// Size kinds recorded on this artifact
    pub fn size_kinds(&self) -> impl Iterator<Item = &str> {
        self.sizes.keys().map(String::as_str)
    }
}
