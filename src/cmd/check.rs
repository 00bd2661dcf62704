//! Check command implementation
//!
//! Handles the `build-tracker check` command which evaluates configured
//! budgets for the latest build in a history.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::budget::BudgetReport;
use crate::comparator::BuildComparator;
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::history::BuildHistory;

/// Options for `build-tracker check`
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Build history JSON file
    pub history: PathBuf,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Print the report as JSON
    pub json: bool,
}

/// Check budgets for the latest build against the one before it
///
/// # Errors
///
/// Returns [`TrackerError::BudgetFailed`] if any error-level budget fails,
/// so the process exits non-zero in CI. Warn-level failures are reported
/// but do not fail the check.
pub fn cmd_check(options: &CheckOptions) -> Result<()> {
    let config = super::load_config(options.config.as_deref())?;

    let history = BuildHistory::load(&options.history)
        .with_context(|| format!("Failed to load {}", options.history.display()))?;
    if history.is_empty() {
        anyhow::bail!(
            "No builds in {}; nothing to check",
            options.history.display()
        );
    }

    let report = check_budgets(&config, &history)?;

    if options.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize budget report")?;
        println!("{}", json);
    } else {
        report.print();
    }

    let failures = report.error_count();
    if failures > 0 {
        return Err(TrackerError::BudgetFailed { failures }.into());
    }
    Ok(())
}

/// Evaluate every configured budget against `history`
pub fn check_budgets(config: &TrackerConfig, history: &BuildHistory) -> Result<BudgetReport> {
    let checker = config.budget_checker()?;
    let comparator = BuildComparator::with_filters(history.builds(), config.filter_set()?);
    Ok(checker.check(&comparator))
}
