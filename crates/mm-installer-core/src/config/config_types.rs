//! Configuration types and defaults for mm-installer.

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tracing filter used when RUST_LOG is unset.
    pub log_level: Option<String>,
    /// Locale file layered over the built-in English strings.
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable; relative paths resolve against the config directory.
    pub command: Option<String>,
    /// Arguments placed before the engine subcommand.
    pub args: Vec<String>,
    /// Folder holding installer and engine logs.
    pub log_dir: Option<String>,
}
