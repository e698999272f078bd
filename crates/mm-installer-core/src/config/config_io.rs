//! Configuration loading and path resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Config;

const APP_DIR: &str = "mm-installer";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFailed(String),
    #[error("failed to parse config: {0}")]
    ParseFailed(String),
    #[error("missing $HOME, unable to resolve config directory")]
    MissingHome,
}

impl Config {
    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|err| ConfigError::ReadFailed(err.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|err| ConfigError::ParseFailed(err.to_string()))
    }

    /// Load configuration from the default XDG config location, if present.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// Return the default config directory based on XDG or $HOME.
    pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Log folder: the configured one, else the XDG state directory.
    pub fn log_dir(&self, base: &Path) -> Result<PathBuf, ConfigError> {
        match self.engine.log_dir.as_deref() {
            Some(dir) => Ok(resolve_path(base, dir)),
            None => Ok(xdg_dir("XDG_STATE_HOME", &[".local", "state"])?.join("logs")),
        }
    }

    /// Engine executable. Bare program names are left for a PATH lookup.
    pub fn engine_command(&self, base: &Path) -> Option<String> {
        let command = self.engine.command.as_deref()?.trim();
        if command.is_empty() {
            return None;
        }
        if !command.contains(std::path::MAIN_SEPARATOR) && !command.contains('/') {
            return Some(command.to_string());
        }
        Some(resolve_path(base, command).to_string_lossy().into_owned())
    }

    pub fn locale_path(&self, base: &Path) -> Option<PathBuf> {
        self.general
            .locale
            .as_deref()
            .map(|locale| resolve_path(base, locale))
    }
}

fn xdg_dir(var: &str, fallback: &[&str]) -> Result<PathBuf, ConfigError> {
    if let Ok(xdg) = env::var(var) {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg).join(APP_DIR));
        }
    }
    let home = env::var("HOME").map_err(|_| ConfigError::MissingHome)?;
    let mut path = PathBuf::from(home);
    path.extend(fallback);
    Ok(path.join(APP_DIR))
}

fn resolve_path(base: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
