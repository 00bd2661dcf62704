//! Size budget enforcement for CI/CD
//!
//! A budget caps one size kind of a subject (build totals, a single
//! artifact, or an artifact group) in one of three ways:
//! - `size`: the subject's current size
//! - `delta`: the byte change against the previous build
//! - `percentDelta`: the compare/base ratio against the previous build
//!
//! A budget passes when the measured value is at most its maximum.
//! Failing `error` budgets fail the check; failing `warn` budgets only warn.

use crate::build::{Artifact, Sizes};
use crate::comparator::BuildComparator;
use crate::delta::{size_deltas, SizeDeltas};
use crate::error::TrackerError;
use crate::fmt::{format_bytes, format_delta, format_ratio, CHECKMARK, CROSSMARK, WARNING};
use crate::group::ArtifactGroup;
use console::style;
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

/// How severe a failing budget is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    /// Report but pass
    Warn,
    /// Fail the check
    Error,
}

/// What a budget measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetType {
    /// Byte change against the previous build
    Delta,
    /// Compare/base ratio against the previous build
    PercentDelta,
    /// Current size
    Size,
}

/// One budget descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Failure severity
    pub level: BudgetLevel,
    /// Size kind the budget applies to
    #[serde(rename = "sizeKey")]
    pub size_key: String,
    /// What is measured
    #[serde(rename = "type")]
    pub budget_type: BudgetType,
    /// Largest passing value
    pub maximum: f64,
}

impl Budget {
    /// Create a budget
    pub fn new(
        level: BudgetLevel,
        size_key: impl Into<String>,
        budget_type: BudgetType,
        maximum: f64,
    ) -> Self {
        Self {
            level,
            size_key: size_key.into(),
            budget_type,
            maximum,
        }
    }

    /// Check that the budget can be evaluated
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.size_key.trim().is_empty() {
            return Err(TrackerError::InvalidBudget {
                reason: "size-key is empty".to_string(),
            });
        }
        if !self.maximum.is_finite() {
            return Err(TrackerError::InvalidBudget {
                reason: format!("maximum for '{}' is not a finite number", self.size_key),
            });
        }
        if self.budget_type != BudgetType::Delta && self.maximum < 0.0 {
            return Err(TrackerError::InvalidBudget {
                reason: format!(
                    "maximum for '{}' cannot be negative for {:?} budgets",
                    self.size_key, self.budget_type
                ),
            });
        }
        Ok(())
    }

    /// Evaluate against a subject's current sizes and its deltas
    ///
    /// `deltas` is `None` when there is no previous build; delta budgets then
    /// measure 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::budget::{Budget, BudgetLevel, BudgetType};
    /// use build_tracker::build::Artifact;
    /// use build_tracker::delta::ArtifactDelta;
    ///
    /// let before = Artifact::new("main.js", "a", [("gzip", 1000)]);
    /// let after = Artifact::new("main.js", "b", [("gzip", 1300)]);
    /// let delta = ArtifactDelta::between("main.js", Some(&before), Some(&after));
    ///
    /// let budget = Budget::new(BudgetLevel::Error, "gzip", BudgetType::Delta, 256.0);
    /// let result = budget.evaluate(&after.sizes, Some(&delta.sizes));
    ///
    /// assert!(!result.passing);
    /// assert_eq!(result.actual, 300.0);
    /// assert_eq!(result.expected, 256.0);
    /// ```
    pub fn evaluate(&self, sizes: &Sizes, deltas: Option<&SizeDeltas>) -> BudgetResult {
        let delta = deltas.and_then(|deltas| deltas.get(&self.size_key));
        let actual = match self.budget_type {
            BudgetType::Size => sizes.get(&self.size_key).copied().unwrap_or(0) as f64,
            BudgetType::Delta => delta.map(|d| d.delta as f64).unwrap_or(0.0),
            BudgetType::PercentDelta => delta.map(|d| d.delta_ratio).unwrap_or(0.0),
        };

        BudgetResult {
            passing: actual <= self.maximum,
            expected: self.maximum,
            actual,
            budget_type: self.budget_type,
            level: self.level,
            size_key: self.size_key.clone(),
        }
    }
}

/// Outcome of evaluating one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResult {
    /// True if `actual <= expected`
    pub passing: bool,
    /// The budget maximum
    pub expected: f64,
    /// The measured value; `null` in JSON when infinite
    #[serde(with = "crate::delta::ratio_serde")]
    pub actual: f64,
    /// What was measured
    #[serde(rename = "type")]
    pub budget_type: BudgetType,
    /// Failure severity
    pub level: BudgetLevel,
    /// Size kind
    pub size_key: String,
}

impl BudgetResult {
    fn describe(&self, value: f64) -> String {
        match self.budget_type {
            BudgetType::Size => format_bytes(value.max(0.0) as u64),
            BudgetType::Delta => format_delta(value as i64),
            BudgetType::PercentDelta => format_ratio(value),
        }
    }
}

/// What a budget was evaluated against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum BudgetSubject {
    /// The build's totals
    Total,
    /// One artifact
    Artifact(String),
    /// An artifact group
    Group(String),
}

impl std::fmt::Display for BudgetSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Total => write!(f, "total"),
            Self::Artifact(name) => write!(f, "artifact {}", name),
            Self::Group(name) => write!(f, "group {}", name),
        }
    }
}

/// One evaluated budget with its subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// What was evaluated
    pub subject: BudgetSubject,
    /// The outcome
    pub result: BudgetResult,
}

/// All budget outcomes for one build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// Revision the budgets were checked for
    pub revision: Option<String>,
    /// Revision it was compared against
    pub against: Option<String>,
    /// Every evaluated budget
    pub entries: Vec<BudgetEntry>,
}

impl BudgetReport {
    /// Entries whose budget failed
    pub fn failures(&self) -> impl Iterator<Item = &BudgetEntry> {
        self.entries.iter().filter(|entry| !entry.result.passing)
    }

    /// Number of failing error-level budgets
    pub fn error_count(&self) -> usize {
        self.failures()
            .filter(|entry| entry.result.level == BudgetLevel::Error)
            .count()
    }

    /// Number of failing warn-level budgets
    pub fn warning_count(&self) -> usize {
        self.failures()
            .filter(|entry| entry.result.level == BudgetLevel::Warn)
            .count()
    }

    /// True if no error-level budget failed
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Get exit code for CI/CD (0 = pass, 1 = fail)
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// Print colored results
    pub fn print(&self) {
        let revision = self.revision.as_deref().unwrap_or("(none)");
        match &self.against {
            Some(against) => println!("\nBudget check: {} vs {}", revision, against),
            None => println!("\nBudget check: {}", revision),
        }

        if self.entries.is_empty() {
            println!("   {}", style("No budgets configured").dim());
            return;
        }

        for entry in &self.entries {
            let result = &entry.result;
            let (icon, line) = match (result.passing, result.level) {
                (true, _) => (CHECKMARK, style(format!("{}", entry.subject)).green()),
                (false, BudgetLevel::Warn) => (WARNING, style(format!("{}", entry.subject)).yellow()),
                (false, BudgetLevel::Error) => (CROSSMARK, style(format!("{}", entry.subject)).red()),
            };
            println!(
                "{} {} {:?} of {}: {} (max {})",
                icon,
                line,
                result.budget_type,
                result.size_key,
                result.describe(result.actual),
                result.describe(result.expected)
            );
        }

        println!(
            "\n   {} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        );
    }
}

/// Evaluates configured budgets for the latest build in a history
#[derive(Debug, Clone, Default)]
pub struct BudgetChecker {
    total_budgets: Vec<Budget>,
    artifact_budgets: IndexMap<String, Vec<Budget>>,
    groups: Vec<ArtifactGroup>,
}

impl BudgetChecker {
    /// Create a checker with budgets on build totals
    pub fn new(total_budgets: Vec<Budget>) -> Self {
        Self {
            total_budgets,
            ..Self::default()
        }
    }

    /// Add budgets for one artifact
    pub fn with_artifact_budgets(mut self, artifact: impl Into<String>, budgets: Vec<Budget>) -> Self {
        self.artifact_budgets
            .entry(artifact.into())
            .or_default()
            .extend(budgets);
        self
    }

    /// Add a group with its budgets
    pub fn with_group(mut self, group: ArtifactGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Check the latest build against the one before it
    ///
    /// With a single build only `size` budgets can fail. An empty history
    /// yields an empty report.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::budget::{Budget, BudgetChecker, BudgetLevel, BudgetType};
    /// use build_tracker::build::{Artifact, Build, BuildMeta};
    /// use build_tracker::comparator::BuildComparator;
    ///
    /// let builds = vec![
    ///     Build::new(BuildMeta::new("a", 1), vec![Artifact::new("main.js", "1", [("gzip", 1000)])])?,
    ///     Build::new(BuildMeta::new("b", 2), vec![Artifact::new("main.js", "2", [("gzip", 1100)])])?,
    /// ];
    /// let checker = BudgetChecker::new(vec![
    ///     Budget::new(BudgetLevel::Error, "gzip", BudgetType::PercentDelta, 1.05),
    /// ]);
    ///
    /// let report = checker.check(&BuildComparator::new(&builds));
    /// assert!(!report.passed());
    /// assert_eq!(report.exit_code(), 1);
    /// # Ok::<(), build_tracker::error::TrackerError>(())
    /// ```
    pub fn check(&self, comparator: &BuildComparator<'_>) -> BudgetReport {
        let builds = comparator.builds();
        let Some(later) = builds.len().checked_sub(1) else {
            return BudgetReport::default();
        };
        let earlier = later.checked_sub(1);
        let current = &builds[later];
        let previous = earlier.map(|index| &builds[index]);

        let mut entries = Vec::new();

        if let Some(totals) = comparator.totals(later) {
            let deltas = earlier
                .and_then(|index| comparator.totals(index))
                .map(|base| size_deltas(Some(base), Some(totals)));
            for budget in &self.total_budgets {
                entries.push(BudgetEntry {
                    subject: BudgetSubject::Total,
                    result: budget.evaluate(totals, deltas.as_ref()),
                });
            }
        }

        let empty = Sizes::new();
        for (name, budgets) in &self.artifact_budgets {
            let compare = current.artifact(name);
            let deltas = previous.map(|build| {
                size_deltas::<Artifact>(build.artifact(name), compare)
            });
            let sizes = compare.map(|artifact| &artifact.sizes).unwrap_or(&empty);
            for budget in budgets {
                entries.push(BudgetEntry {
                    subject: BudgetSubject::Artifact(name.clone()),
                    result: budget.evaluate(sizes, deltas.as_ref()),
                });
            }
        }

        for group in &self.groups {
            let sizes = current.matched_sizes(group.matcher());
            let deltas = earlier.and_then(|index| comparator.group_deltas(later, index, group));
            for budget in group.budgets() {
                entries.push(BudgetEntry {
                    subject: BudgetSubject::Group(group.name().to_string()),
                    result: budget.evaluate(&sizes, deltas.as_ref()),
                });
            }
        }

        let report = BudgetReport {
            revision: Some(current.revision().to_string()),
            against: previous.map(|build| build.revision().to_string()),
            entries,
        };

        for failure in report.failures() {
            warn!(
                "Budget failed for {}: {:?} of {} is {} (max {})",
                failure.subject,
                failure.result.budget_type,
                failure.result.size_key,
                failure.result.actual,
                failure.result.expected
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Build, BuildMeta};
    use crate::filter::NameMatcher;

    fn history() -> Vec<Build> {
        vec![
            Build::new(
                BuildMeta::new("a", 1),
                vec![
                    Artifact::new("main.js", "1", [("stat", 1000), ("gzip", 400)]),
                    Artifact::new("vendor.js", "2", [("stat", 5000), ("gzip", 1500)]),
                ],
            )
            .unwrap(),
            Build::new(
                BuildMeta::new("b", 2),
                vec![
                    Artifact::new("main.js", "3", [("stat", 1200), ("gzip", 450)]),
                    Artifact::new("vendor.js", "2", [("stat", 5000), ("gzip", 1500)]),
                    Artifact::new("extra.js", "4", [("stat", 300), ("gzip", 100)]),
                ],
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_size_budget_compares_current_size() {
        let mut sizes = Sizes::new();
        sizes.insert("gzip".to_string(), 500);

        let pass = Budget::new(BudgetLevel::Error, "gzip", BudgetType::Size, 500.0);
        assert!(pass.evaluate(&sizes, None).passing);

        let fail = Budget::new(BudgetLevel::Error, "gzip", BudgetType::Size, 499.0);
        let result = fail.evaluate(&sizes, None);
        assert!(!result.passing);
        assert_eq!(result.actual, 500.0);
    }

    #[test]
    fn test_delta_budget_without_previous_build_measures_zero() {
        let budget = Budget::new(BudgetLevel::Error, "gzip", BudgetType::Delta, 0.0);
        let result = budget.evaluate(&Sizes::new(), None);
        assert!(result.passing);
        assert_eq!(result.actual, 0.0);
    }

    #[test]
    fn test_percent_delta_budget_uses_ratio() {
        let budgets = BudgetChecker::new(vec![Budget::new(
            BudgetLevel::Warn,
            "stat",
            BudgetType::PercentDelta,
            1.05,
        )]);
        let builds = history();
        let report = budgets.check(&BuildComparator::new(&builds));

        assert_eq!(report.entries[0].result.actual, 6500.0 / 6000.0);
        assert!(!report.entries[0].result.passing);
        assert_eq!(report.warning_count(), 1);
        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_artifact_budgets_use_artifact_deltas() {
        let checker = BudgetChecker::default().with_artifact_budgets(
            "main.js",
            vec![
                Budget::new(BudgetLevel::Error, "gzip", BudgetType::Delta, 25.0),
                Budget::new(BudgetLevel::Error, "stat", BudgetType::Size, 2000.0),
            ],
        );
        let builds = history();
        let report = checker.check(&BuildComparator::new(&builds));

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].subject, BudgetSubject::Artifact("main.js".to_string()));
        assert_eq!(report.entries[0].result.actual, 50.0);
        assert!(!report.entries[0].result.passing);
        assert!(report.entries[1].result.passing);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_added_artifact_budget_reports_full_size_delta() {
        let checker = BudgetChecker::default().with_artifact_budgets(
            "extra.js",
            vec![Budget::new(BudgetLevel::Error, "gzip", BudgetType::Delta, 50.0)],
        );
        let builds = history();
        let report = checker.check(&BuildComparator::new(&builds));
        assert_eq!(report.entries[0].result.actual, 100.0);
        assert!(!report.passed());
    }

    #[test]
    fn test_group_budgets_sum_members() {
        let group = ArtifactGroup::new(
            "js",
            NameMatcher::new(vec![], Some(r"\.js$")).unwrap(),
            vec![Budget::new(BudgetLevel::Error, "gzip", BudgetType::Size, 2000.0)],
        );
        let builds = history();
        let report = BudgetChecker::default()
            .with_group(group)
            .check(&BuildComparator::new(&builds));

        assert_eq!(report.entries[0].subject, BudgetSubject::Group("js".to_string()));
        assert_eq!(report.entries[0].result.actual, 2050.0);
        assert!(!report.entries[0].result.passing);
    }

    #[test]
    fn test_check_empty_history_returns_empty_report() {
        let checker = BudgetChecker::new(vec![Budget::new(
            BudgetLevel::Error,
            "gzip",
            BudgetType::Size,
            1.0,
        )]);
        let report = checker.check(&BuildComparator::new(&[]));
        assert!(report.entries.is_empty());
        assert!(report.passed());
    }

    #[test]
    fn test_check_reports_revisions() {
        let builds = history();
        let report = BudgetChecker::default().check(&BuildComparator::new(&builds));
        assert_eq!(report.revision.as_deref(), Some("b"));
        assert_eq!(report.against.as_deref(), Some("a"));
    }

    #[test]
    fn test_budget_validate_rejects_bad_values() {
        assert!(Budget::new(BudgetLevel::Warn, "", BudgetType::Size, 1.0)
            .validate()
            .is_err());
        assert!(Budget::new(BudgetLevel::Warn, "gzip", BudgetType::Size, f64::NAN)
            .validate()
            .is_err());
        assert!(Budget::new(BudgetLevel::Warn, "gzip", BudgetType::Size, -1.0)
            .validate()
            .is_err());
        assert!(Budget::new(BudgetLevel::Warn, "gzip", BudgetType::Delta, -1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_percent_delta_budget_fails_on_growth_from_zero() {
        let before = Artifact::new("main.js", "a", [("gzip", 0)]);
        let after = Artifact::new("main.js", "b", [("gzip", 1_000_000)]);
        let deltas = size_deltas(Some(&before), Some(&after));

        let budget = Budget::new(BudgetLevel::Error, "gzip", BudgetType::PercentDelta, 1.1);
        let result = budget.evaluate(&after.sizes, Some(&deltas));
        assert!(!result.passing);
        assert_eq!(result.actual, f64::INFINITY);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["actual"].is_null());
    }

    #[test]
    fn test_budget_serializes_size_key_camel_case() {
        let budget = Budget::new(BudgetLevel::Warn, "gzip", BudgetType::Size, 10.0);
        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(json["sizeKey"], "gzip");
        assert!(json.get("size-key").is_none());
    }

    #[test]
    fn test_budget_deserializes_descriptor_shape() {
        let json = r#"{"level":"warn","sizeKey":"gzip","type":"percentDelta","maximum":1.1}"#;
        let budget: Budget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.level, BudgetLevel::Warn);
        assert_eq!(budget.budget_type, BudgetType::PercentDelta);
        assert_eq!(budget.size_key, "gzip");
    }

    #[test]
    fn test_budget_result_serializes_contract_shape() {
        let budget = Budget::new(BudgetLevel::Error, "gzip", BudgetType::Size, 10.0);
        let mut sizes = Sizes::new();
        sizes.insert("gzip".to_string(), 20);
        let json = serde_json::to_value(budget.evaluate(&sizes, None)).unwrap();
        assert_eq!(json["passing"], false);
        assert_eq!(json["expected"], 10.0);
        assert_eq!(json["actual"], 20.0);
        assert_eq!(json["type"], "size");
        assert_eq!(json["level"], "error");
        assert_eq!(json["sizeKey"], "gzip");
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        /// Property: a size budget passes exactly when the size is at most the maximum
        #[test]
        fn prop_size_budget_boundary(size in 0u64..10_000_000, maximum in 0u64..10_000_000) {
            let budget = Budget::new(BudgetLevel::Error, "gzip", BudgetType::Size, maximum as f64);
            let mut sizes = Sizes::new();
            sizes.insert("gzip".to_string(), size);

            let result = budget.evaluate(&sizes, None);
            prop_assert_eq!(result.passing, size <= maximum,
                "size {} with maximum {}", size, maximum);
        }

        /// Property: growing a subject never turns a failing delta budget into a passing one
        #[test]
        fn prop_delta_budget_monotonic(base in 0u64..1_000_000, growth in 0u64..1_000_000, extra in 1u64..1_000, maximum in 0i64..1_000_000) {
            let budget = Budget::new(BudgetLevel::Warn, "gzip", BudgetType::Delta, maximum as f64);
            let evaluate = |after: u64| {
                let mut before_sizes = Sizes::new();
                before_sizes.insert("gzip".to_string(), base);
                let mut after_sizes = Sizes::new();
                after_sizes.insert("gzip".to_string(), after);
                let deltas = size_deltas(Some(&before_sizes), Some(&after_sizes));
                budget.evaluate(&after_sizes, Some(&deltas)).passing
            };

            let smaller = evaluate(base + growth);
            let larger = evaluate(base + growth + extra);
            prop_assert!(!(larger && !smaller));
        }
    }
}
