//! Configuration file data structures

use crate::budget::{Budget, BudgetChecker, BudgetLevel, BudgetType};
use crate::error::TrackerError;
use crate::filter::{FilterSet, NameMatcher};
use crate::group::ArtifactGroup;
use serde::{Deserialize, Serialize};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".build-tracker.toml";

/// build-tracker configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrackerConfig {
    /// Artifact name patterns excluded from totals and comparison rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,

    /// Budgets on build totals
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "kebab_budgets")]
    pub budgets: Vec<Budget>,

    /// Budgets on individual artifacts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifact_budgets: Vec<ArtifactBudgetConfig>,

    /// Named artifact groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupConfig>,
}

/// Budgets for one artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactBudgetConfig {
    /// Artifact name
    pub artifact: String,
    /// Budgets applied to it
    #[serde(default, with = "kebab_budgets")]
    pub budgets: Vec<Budget>,
}

/// A named artifact group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupConfig {
    /// Group name
    pub name: String,
    /// Pattern selecting members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_match: Option<String>,
    /// Explicit member names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifact_names: Vec<String>,
    /// Budgets on the group's summed sizes
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "kebab_budgets")]
    pub budgets: Vec<Budget>,
}

/// Budget as written in the TOML file
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TomlBudget {
    level: BudgetLevel,
    size_key: String,
    #[serde(rename = "type")]
    budget_type: BudgetType,
    maximum: f64,
}

// Budgets keep camelCase keys in JSON; the config file spells them kebab-case
mod kebab_budgets {
    use super::TomlBudget;
    use crate::budget::Budget;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(budgets: &Vec<Budget>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(budgets.iter().map(|budget| TomlBudget {
            level: budget.level,
            size_key: budget.size_key.clone(),
            budget_type: budget.budget_type,
            maximum: budget.maximum,
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Budget>, D::Error> {
        let budgets = Vec::<TomlBudget>::deserialize(deserializer)?;
        Ok(budgets
            .into_iter()
            .map(|b| Budget::new(b.level, b.size_key, b.budget_type, b.maximum))
            .collect())
    }
}

impl TrackerConfig {
    /// Validate filters, groups and budgets
    pub fn validate(&self) -> Result<(), TrackerError> {
        self.filter_set()?;
        self.artifact_groups()?;

        let budgets = self
            .budgets
            .iter()
            .chain(self.artifact_budgets.iter().flat_map(|a| &a.budgets))
            .chain(self.groups.iter().flat_map(|g| &g.budgets));
        for budget in budgets {
            budget.validate()?;
        }

        for group in &self.groups {
            if group.artifact_match.is_none() && group.artifact_names.is_empty() {
                return Err(TrackerError::InvalidGroup {
                    name: group.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Compile the configured filters
    pub fn filter_set(&self) -> Result<FilterSet, TrackerError> {
        FilterSet::new(&self.filters)
    }

    /// Compile the configured groups
    pub fn artifact_groups(&self) -> Result<Vec<ArtifactGroup>, TrackerError> {
        self.groups
            .iter()
            .map(|group| {
                let matcher = NameMatcher::new(
                    group.artifact_names.clone(),
                    group.artifact_match.as_deref(),
                )?;
                Ok(ArtifactGroup::new(
                    group.name.clone(),
                    matcher,
                    group.budgets.clone(),
                ))
            })
            .collect()
    }

    /// Budget checker for every configured budget
    pub fn budget_checker(&self) -> Result<BudgetChecker, TrackerError> {
        let mut checker = BudgetChecker::new(self.budgets.clone());
        for artifact in &self.artifact_budgets {
            checker =
                checker.with_artifact_budgets(artifact.artifact.clone(), artifact.budgets.clone());
        }
        for group in self.artifact_groups()? {
            checker = checker.with_group(group);
        }
        Ok(checker)
    }
}
