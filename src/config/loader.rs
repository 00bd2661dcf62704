//! Configuration file loading and saving

use super::file::{TrackerConfig, CONFIG_FILE_NAME};
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

/// Handles loading and saving configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .build-tracker.toml in the given directory
    ///
    /// A missing file yields the default (empty) configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use build_tracker::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("{} budgets configured", config.budgets.len());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(project_root: &Path) -> Result<TrackerConfig> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(project_root: &Path, fs: &FS) -> Result<TrackerConfig> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        // Read file atomically - no TOCTOU race window
        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} found, using defaults", config_path.display());
                return Ok(TrackerConfig::default());
            }
            Err(e) => {
                return Err(e).context("Failed to read .build-tracker.toml");
            }
        };

        Self::parse(&contents).with_context(|| format!("Invalid {}", config_path.display()))
    }

    /// Load config from an explicit path; the file must exist
    pub fn load_file(path: &Path) -> Result<TrackerConfig> {
        Self::load_file_with_fs(path, &RealFileSystem)
    }

    /// Load config from an explicit path with a custom filesystem implementation
    pub fn load_file_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<TrackerConfig> {
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid {}", path.display()))
    }

    /// Parse and validate config text
    pub fn parse(contents: &str) -> Result<TrackerConfig> {
        let config: TrackerConfig =
            toml_edit::de::from_str(contents).context("Failed to parse build-tracker config")?;

        config.validate()?;

        info!(
            "Loaded config: {} filters, {} budgets, {} artifact budgets, {} groups",
            config.filters.len(),
            config.budgets.len(),
            config.artifact_budgets.len(),
            config.groups.len()
        );
        Ok(config)
    }

    /// Save config to .build-tracker.toml in the given directory
    pub fn save(config: &TrackerConfig, project_root: &Path) -> Result<()> {
        Self::save_with_fs(config, project_root, &RealFileSystem)
    }

    /// Save config with a custom filesystem implementation
    pub fn save_with_fs<FS: FileSystem>(
        config: &TrackerConfig,
        project_root: &Path,
        fs: &FS,
    ) -> Result<()> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let contents =
            toml_edit::ser::to_string_pretty(config).context("Failed to serialize config")?;

        fs.write(&config_path, contents)
            .context("Failed to write .build-tracker.toml")?;

        Ok(())
    }
}
