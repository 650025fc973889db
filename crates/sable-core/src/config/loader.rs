//! Configuration file discovery and loading

use super::sable_config::SableConfiguration;
use crate::{Result, SableError};
use std::path::{Path, PathBuf};

/// File names searched by [`ConfigLoader::auto_discover`], in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &["sable.toml", ".sablerc.json", ".sablerc.jsonc"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Starts from the given directory and moves up the directory tree until
    /// a config is found or the filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| SableError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load and validate configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<SableConfiguration> {
        let config = SableConfiguration::load(path).map_err(|e| match e {
            SableError::IoError { .. } => e,
            other => SableError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                other
            )),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from path or auto-discover
    ///
    /// Falls back to the default configuration when nothing is found.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<SableConfiguration> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(SableError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(SableConfiguration::default())
            }
        }
    }
}
