use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::FlagPrecedence;
use crate::error::{LaunchError, Result};

mod project;

pub use project::{DEFAULT_CONFIG_FILE, load_project_config};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub config_file: PathBuf,
    pub flag_precedence: FlagPrecedence,
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            flag_precedence: FlagPrecedence::default(),
            log_filter: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        global.with_env_overrides(|key| std::env::var(key).ok())
    }

    fn load_global() -> Result<Self> {
        let config_dir = directories::ProjectDirs::from("", "", "launch").map_or_else(
            || PathBuf::from("~/.config/launch"),
            |d| d.config_dir().to_path_buf(),
        );

        Self::load_from(&config_dir.join("settings.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| LaunchError::Settings(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup("LAUNCH_FLAG_PRECEDENCE") {
            self.flag_precedence = raw.parse().map_err(LaunchError::Settings)?;
        }
        if let Some(filter) = lookup("LAUNCH_LOG") {
            self.log_filter = Some(filter);
        }
        Ok(self)
    }
}
