//! Named artifact groups
//!
//! A group sums the sizes of its member artifacts so related outputs (e.g.
//! every vendor chunk) can be tracked and budgeted as one unit.

use crate::budget::Budget;
use crate::filter::NameMatcher;

/// A named set of artifacts with optional budgets
#[derive(Debug, Clone)]
pub struct ArtifactGroup {
    name: String,
    matcher: NameMatcher,
    budgets: Vec<Budget>,
}

impl ArtifactGroup {
    /// Create a group
    pub fn new(name: impl Into<String>, matcher: NameMatcher, budgets: Vec<Budget>) -> Self {
        Self {
            name: name.into(),
            matcher,
            budgets,
        }
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member selection
    pub fn matcher(&self) -> &NameMatcher {
        &self.matcher
    }

    /// Budgets applied to the group's summed sizes
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }
}
