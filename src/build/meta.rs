//! Build metadata with plain or linked values
//!
//! Every meta entry is either a bare string or a `{ value, url }` pair.
//! Consumers go through [`MetaValue::value`] and [`MetaValue::url`] and never
//! inspect the shape themselves.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A meta entry: bare text or a value with a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Plain text value
    Text(String),

    /// Value with a URL (e.g. a revision linking to its commit page)
    Linked {
        /// Displayed value
        value: String,
        /// Link target
        url: String,
    },
}

impl MetaValue {
    /// Create a linked value
    pub fn linked(value: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Linked {
            value: value.into(),
            url: url.into(),
        }
    }

    /// The displayed value, whichever shape this is
    pub fn value(&self) -> &str {
        match self {
            Self::Text(value) => value,
            Self::Linked { value, .. } => value,
        }
    }

    /// The link, if this value carries one
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Linked { url, .. } => Some(url),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Metadata attached to a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMeta {
    /// Source revision the build was produced from
    pub revision: MetaValue,
    /// Branch the revision belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<MetaValue>,
    /// Build time as seconds since the Unix epoch
    pub timestamp: i64,
    /// Any other free-form entries
    #[serde(flatten)]
    pub extra: IndexMap<String, MetaValue>,
}

impl BuildMeta {
    /// Create metadata with just the mandatory fields
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::build::{BuildMeta, MetaValue};
    ///
    /// let meta = BuildMeta::new(MetaValue::linked("abc123", "https://example.com/c/abc123"), 1_700_000_000)
    ///     .with_branch("main")
    ///     .with_entry("parentRevision", "def456");
    ///
    /// assert_eq!(meta.value("revision"), Some("abc123"));
    /// assert_eq!(meta.url("revision"), Some("https://example.com/c/abc123"));
    /// assert_eq!(meta.value("branch"), Some("main"));
    /// assert_eq!(meta.url("branch"), None);
    /// assert_eq!(meta.value("parentRevision"), Some("def456"));
    /// ```
    pub fn new(revision: impl Into<MetaValue>, timestamp: i64) -> Self {
        Self {
            revision: revision.into(),
            branch: None,
            timestamp,
            extra: IndexMap::new(),
        }
    }

    /// Set the branch
    pub fn with_branch(mut self, branch: impl Into<MetaValue>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Add a free-form entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Look up any meta entry by key
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        match key {
            "revision" => Some(&self.revision),
            "branch" => self.branch.as_ref(),
            _ => self.extra.get(key),
        }
    }

    /// Displayed value of a meta entry
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(MetaValue::value)
    }

    /// Link of a meta entry, if it has one
    pub fn url(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::url)
    }

    /// Revision value
    pub fn revision(&self) -> &str {
        self.revision.value()
    }
}
