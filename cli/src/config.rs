//! Configuration file handling for the CLI.
//!
//! Stores the data endpoint and the session keys in
//! `$XDG_CONFIG_HOME/procure/config.toml` following the XDG Base Directory
//! Specification. The session table plays the role of the browser's tab
//! storage: it is what `login` writes and the page guard reads.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use procure_business::SessionStore;
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    /// Session keys (`isLoggedIn`, `username`, `userRole`)
    #[serde(default)]
    pub session: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Saved data endpoint
    pub url: Option<String>,
}

impl Config {
    /// Returns `$XDG_CONFIG_HOME/procure/config.toml` on Linux,
    /// appropriate paths on other platforms.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "procure", "procure")
            .context("Failed to determine config directory")?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`; a missing file is an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

impl SessionStore for Config {
    fn get(&self, key: &str) -> Option<String> {
        self.session.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.session.insert(key.to_owned(), value.to_owned());
    }

    fn clear(&mut self) {
        self.session.clear();
    }
}
