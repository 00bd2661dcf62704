//! Build history persistence
//!
//! A history is a JSON array of `{ meta, artifacts }` records, oldest
//! first. Every record is validated on load, so a history that parses is
//! safe to hand straight to the comparator.

use crate::build::Build;
use crate::error::TrackerError;
use crate::infra::{FileSystem, RealFileSystem};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered sequence of builds, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildHistory {
    builds: Vec<Build>,
}

impl BuildHistory {
    /// Maximum number of builds kept when appending
    pub const MAX_BUILDS: usize = 100;

    /// Create a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-validated builds
    pub fn from_builds(builds: Vec<Build>) -> Self {
        Self { builds }
    }

    /// Load history from a JSON file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use build_tracker::history::BuildHistory;
    /// use std::path::Path;
    ///
    /// let history = BuildHistory::load(Path::new("builds.json"))?;
    /// println!("{} builds", history.len());
    /// # Ok::<(), build_tracker::error::TrackerError>(())
    /// ```
    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        Self::load_with_fs(path, &RealFileSystem)
    }

    /// Load history with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<Self, TrackerError> {
        let contents = fs.read_to_string(path).map_err(|source| TrackerError::Io {
            context: format!("reading {}", path.display()),
            source,
        })?;

        let history = Self::from_json(&contents).map_err(|source| TrackerError::HistoryParse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded {} builds from {}", history.len(), path.display());
        Ok(history)
    }

    /// Parse a history from JSON text
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Save history to a JSON file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), TrackerError> {
        self.save_with_fs(path, &RealFileSystem)
    }

    /// Save history with a custom filesystem implementation
    pub fn save_with_fs<FS: FileSystem>(&self, path: &Path, fs: &FS) -> Result<(), TrackerError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs.create_dir_all(parent).map_err(|source| TrackerError::Io {
                context: format!("creating {}", parent.display()),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|source| {
            TrackerError::HistoryParse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        fs.write(path, contents).map_err(|source| TrackerError::Io {
            context: format!("writing {}", path.display()),
            source,
        })?;

        debug!("Saved {} builds to {}", self.len(), path.display());
        Ok(())
    }

    /// Append a build, dropping the oldest ones beyond [`Self::MAX_BUILDS`]
    pub fn push(&mut self, build: Build) {
        self.builds.push(build);

        // Trim from the front (oldest first)
        if self.builds.len() > Self::MAX_BUILDS {
            let excess = self.builds.len() - Self::MAX_BUILDS;
            self.builds.drain(..excess);
            debug!("Dropped {} oldest builds from history", excess);
        }
    }

    /// Sort builds by timestamp, oldest first; equal timestamps keep their order
    pub fn sort_by_timestamp(&mut self) {
        self.builds.sort_by_key(Build::timestamp);
    }

    /// Get the most recent build
    pub fn latest(&self) -> Option<&Build> {
        self.builds.last()
    }

    /// All builds, oldest first
    pub fn builds(&self) -> &[Build] {
        &self.builds
    }

    /// Number of builds
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    /// True if the history holds no builds
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    /// Consume the history, returning its builds
    pub fn into_builds(self) -> Vec<Build> {
        self.builds
    }
}
