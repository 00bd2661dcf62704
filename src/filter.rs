//! Artifact name matching
//!
//! Filters and groups select artifacts by name. Patterns are regular
//! expressions matched anywhere in the name (use `^`/`$` to anchor).

use crate::error::TrackerError;
use regex::Regex;

/// Decides whether an artifact name is selected
pub trait ArtifactMatcher {
    /// True if `name` is selected
    fn matches(&self, name: &str) -> bool;
}

impl ArtifactMatcher for Regex {
    fn matches(&self, name: &str) -> bool {
        self.is_match(name)
    }
}

impl<M: ArtifactMatcher> ArtifactMatcher for [M] {
    fn matches(&self, name: &str) -> bool {
        self.iter().any(|matcher| matcher.matches(name))
    }
}

impl<M: ArtifactMatcher + ?Sized> ArtifactMatcher for &M {
    fn matches(&self, name: &str) -> bool {
        (**self).matches(name)
    }
}

/// A compiled artifact name pattern
#[derive(Debug, Clone)]
pub struct ArtifactFilter {
    regex: Regex,
}

impl ArtifactFilter {
    /// Compile a filter pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::filter::{ArtifactFilter, ArtifactMatcher};
    ///
    /// let filter = ArtifactFilter::new(r"\.map$")?;
    /// assert!(filter.matches("main.js.map"));
    /// assert!(!filter.matches("main.js"));
    /// # Ok::<(), build_tracker::error::TrackerError>(())
    /// ```
    pub fn new(pattern: &str) -> Result<Self, TrackerError> {
        let regex = Regex::new(pattern).map_err(|source| TrackerError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// The pattern as written
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl ArtifactMatcher for ArtifactFilter {
    fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Ordered set of filters; a name is matched if any filter matches it
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<ArtifactFilter>,
}

impl FilterSet {
    /// Compile every pattern, failing on the first invalid one
    pub fn new<I, S>(patterns: I) -> Result<Self, TrackerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filters = patterns
            .into_iter()
            .map(|pattern| ArtifactFilter::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { filters })
    }

    /// Append a compiled filter
    pub fn push(&mut self, filter: ArtifactFilter) {
        self.filters.push(filter);
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True if no filters are configured
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Patterns in order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(ArtifactFilter::pattern)
    }
}

impl ArtifactMatcher for FilterSet {
    fn matches(&self, name: &str) -> bool {
        self.filters.as_slice().matches(name)
    }
}

/// Matches a fixed list of names and/or a pattern
///
/// Backs artifact groups, which may list members explicitly, by pattern,
/// or both.
#[derive(Debug, Clone, Default)]
pub struct NameMatcher {
    names: Vec<String>,
    pattern: Option<ArtifactFilter>,
}

impl NameMatcher {
    /// Create a matcher from explicit names and an optional pattern
    pub fn new(names: Vec<String>, pattern: Option<&str>) -> Result<Self, TrackerError> {
        let pattern = pattern.map(ArtifactFilter::new).transpose()?;
        Ok(Self { names, pattern })
    }
}

impl ArtifactMatcher for NameMatcher {
    fn matches(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
            || self
                .pattern
                .as_ref()
                .is_some_and(|pattern| pattern.matches(name))
    }
}
