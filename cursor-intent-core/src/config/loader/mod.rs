use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::IntentConfig;
use super::constants::files::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Locates and loads `cursor-intent.toml`
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: IntentConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        Self::load_from_workspace(std::env::current_dir()?)
    }

    /// Get the user's home directory path
    fn get_home_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            return Some(PathBuf::from(home));
        }

        if let Ok(userprofile) = std::env::var("USERPROFILE") {
            return Some(PathBuf::from(userprofile));
        }

        dirs::home_dir()
    }

    /// Candidate files for a workspace, most specific first
    pub fn search_paths(workspace: impl AsRef<Path>) -> Vec<PathBuf> {
        let workspace = workspace.as_ref();
        let mut paths = vec![
            workspace.join(CONFIG_FILE_NAME),
            workspace.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        ];
        if let Some(home_dir) = Self::get_home_dir() {
            paths.push(home_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load configuration from a specific workspace
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        for path in Self::search_paths(workspace) {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        tracing::debug!("No cursor-intent.toml found, using default configuration");
        Ok(Self {
            config: IntentConfig::default(),
            config_path: None,
        })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: IntentConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &IntentConfig {
        &self.config
    }

    pub fn into_config(self) -> IntentConfig {
        self.config
    }

    /// Get the configuration file path (if loaded from file)
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
