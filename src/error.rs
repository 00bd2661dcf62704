//! Typed error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes for malformed input
//! - Proper exit codes for CI/CD
//!
//! The comparison engine itself never fails over validated input. Errors
//! only surface while constructing builds, compiling filters, loading
//! configuration or history, and when a budget check fails.
//!
//! # Examples
//!
//! ```
//! use build_tracker::build::{Artifact, Build, BuildMeta};
//! use build_tracker::error::TrackerError;
//!
//! let meta = BuildMeta::new("abc123", 1_700_000_000);
//! let artifacts = vec![
//!     Artifact::new("main.js", "aaa", [("stat", 100)]),
//!     Artifact::new("main.js", "bbb", [("stat", 200)]),
//! ];
//!
//! match Build::new(meta, artifacts) {
//!     Err(TrackerError::DuplicateArtifact { name, .. }) => assert_eq!(name, "main.js"),
//!     other => panic!("expected duplicate artifact error, got {:?}", other),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, validating, or loading tracked builds
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Two artifacts in one build share a name
    #[error("Duplicate artifact '{name}' in build {revision}")]
    DuplicateArtifact {
        /// Artifact name that appears more than once
        name: String,
        /// Revision of the offending build
        revision: String,
    },

    /// Build metadata has no revision
    #[error("Build is missing a revision")]
    MissingRevision,

    /// Artifact filter is not a valid regular expression
    #[error("Invalid artifact filter: '{pattern}'")]
    InvalidFilter {
        /// Pattern as written by the user
        pattern: String,
        #[source]
        /// Regex compile error
        source: regex::Error,
    },

    /// Budget descriptor is unusable
    #[error("Invalid budget: {reason}")]
    InvalidBudget {
        /// What is wrong with the budget
        reason: String,
    },

    /// Artifact group selects nothing
    #[error("Invalid group '{name}': needs artifact-match or artifact-names")]
    InvalidGroup {
        /// Group name
        name: String,
    },

    /// Build history file is not valid JSON or violates build invariants
    #[error("Failed to parse build history: {path}")]
    HistoryParse {
        /// History file path
        path: PathBuf,
        #[source]
        /// JSON error source
        source: serde_json::Error,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// One or more error-level budgets failed
    #[error("{failures} budget(s) failed")]
    BudgetFailed {
        /// Number of failing error-level budgets
        failures: usize,
    },
}

impl TrackerError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::error::TrackerError;
    ///
    /// let error = TrackerError::MissingRevision;
    /// assert!(error.suggestion().unwrap().contains("revision"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::DuplicateArtifact { name, .. } => Some(format!(
                "Artifact names must be unique within a build; rename or merge '{}'",
                name
            )),
            Self::MissingRevision => {
                Some("Every build needs a non-empty meta.revision value".to_string())
            }
            Self::InvalidFilter { pattern, .. } => Some(format!(
                "Filters are regular expressions; escape special characters in '{}'",
                pattern
            )),
            Self::InvalidBudget { .. } => Some(
                "Budgets need a size-key, a type of delta, percentDelta or size, and a finite maximum"
                    .to_string(),
            ),
            Self::InvalidGroup { name } => Some(format!(
                "Give group '{}' an artifact-match pattern or a list of artifact-names",
                name
            )),
            Self::HistoryParse { path, .. } => Some(format!(
                "Check that {} is a JSON array of {{ meta, artifacts }} build records",
                path.display()
            )),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
            Self::BudgetFailed { .. } => Some(
                "Reduce artifact sizes or raise the maximum in .build-tracker.toml".to_string(),
            ),
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::error::TrackerError;
    ///
    /// assert_eq!(TrackerError::MissingRevision.exit_code(), 65);
    /// assert_eq!(TrackerError::BudgetFailed { failures: 2 }.exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DuplicateArtifact { .. } => 65, // EX_DATAERR
            Self::MissingRevision => 65,
            Self::InvalidFilter { .. } => 64, // EX_USAGE
            Self::InvalidBudget { .. } => 78, // EX_CONFIG
            Self::InvalidGroup { .. } => 78,
            Self::HistoryParse { .. } => 65,
            Self::Io { .. } => 74,          // EX_IOERR
            Self::BudgetFailed { .. } => 1, // CI should fail
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(tracker_error) = Self::find_tracker_error(error) {
            if let Some(suggestion) = tracker_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find_tracker_error(error)
            .map(TrackerError::exit_code)
            .unwrap_or(1)
    }

    // Context layers wrap the typed error, so search the whole chain
    fn find_tracker_error(error: &anyhow::Error) -> Option<&TrackerError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<TrackerError>())
    }
}
