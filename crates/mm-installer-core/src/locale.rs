//! Localization tables for phase titles, alerts and framing text.
//!
//! A locale file is TOML with three tables, each keyed by wire identifiers:
//!
//! ```toml
//! [phases]
//! downloadMods = "Downloading mods"
//! [alerts]
//! alertOnFailedAddProfile = "Could not add the launcher profile."
//! [text]
//! updateFailed = "Update failed."
//! ```
//!
//! Entries missing from a file fall back to the built-in English table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::model::{AlertKey, AlertMessage, InstallerMode, Phase};

/// Framing and action strings used around a run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextKey {
    InstallLabel,
    UpdateLabel,
    InstallFailed,
    UpdateFailed,
    InstallFinished,
    UpdateFinished,
    ModeRejected,
    StatusFailed,
    OpenLogFolder,
    Dismiss,
    Exit,
}

impl TextKey {
    pub const ALL: [TextKey; 11] = [
        TextKey::InstallLabel,
        TextKey::UpdateLabel,
        TextKey::InstallFailed,
        TextKey::UpdateFailed,
        TextKey::InstallFinished,
        TextKey::UpdateFinished,
        TextKey::ModeRejected,
        TextKey::StatusFailed,
        TextKey::OpenLogFolder,
        TextKey::Dismiss,
        TextKey::Exit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TextKey::InstallLabel => "install",
            TextKey::UpdateLabel => "update",
            TextKey::InstallFailed => "installFailed",
            TextKey::UpdateFailed => "updateFailed",
            TextKey::InstallFinished => "installFinished",
            TextKey::UpdateFinished => "updateFinished",
            TextKey::ModeRejected => "modeRejected",
            TextKey::StatusFailed => "statusFailed",
            TextKey::OpenLogFolder => "openLogFolder",
            TextKey::Dismiss => "dismiss",
            TextKey::Exit => "exit",
        }
    }

    pub fn label_for(mode: InstallerMode) -> TextKey {
        match mode {
            InstallerMode::Install => TextKey::InstallLabel,
            InstallerMode::Update => TextKey::UpdateLabel,
        }
    }

    pub fn failed_for(mode: InstallerMode) -> TextKey {
        match mode {
            InstallerMode::Install => TextKey::InstallFailed,
            InstallerMode::Update => TextKey::UpdateFailed,
        }
    }

    pub fn finished_for(mode: InstallerMode) -> TextKey {
        match mode {
            InstallerMode::Install => TextKey::InstallFinished,
            InstallerMode::Update => TextKey::UpdateFinished,
        }
    }
}

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("failed to read locale file: {0}")]
    ReadFailed(String),
    #[error("failed to parse locale file: {0}")]
    ParseFailed(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocaleFile {
    phases: BTreeMap<String, String>,
    alerts: BTreeMap<String, String>,
    text: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Locale {
    phases: BTreeMap<String, String>,
    alerts: BTreeMap<String, String>,
    text: BTreeMap<String, String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Locale {
    pub fn english() -> Self {
        let phases = Phase::ALL
            .into_iter()
            .map(|phase| (phase.key().to_string(), english_phase(phase).to_string()))
            .collect();
        let alerts = AlertKey::ALL
            .into_iter()
            .map(|key| (key.as_key().to_string(), english_alert(key).to_string()))
            .collect();
        let text = TextKey::ALL
            .into_iter()
            .map(|key| (key.key().to_string(), english_text(key).to_string()))
            .collect();
        Self {
            phases,
            alerts,
            text,
        }
    }

    /// Load a locale file layered over the English defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, LocaleError> {
        let contents =
            fs::read_to_string(path).map_err(|err| LocaleError::ReadFailed(err.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, LocaleError> {
        let file: LocaleFile =
            toml::from_str(contents).map_err(|err| LocaleError::ParseFailed(err.to_string()))?;
        let mut locale = Self::english();
        locale.phases.extend(file.phases);
        locale.alerts.extend(file.alerts);
        locale.text.extend(file.text);
        for key in locale.unknown_keys() {
            warn!(key = %key, "locale entry does not match any known key");
        }
        Ok(locale)
    }

    pub fn phase(&self, phase: Phase) -> &str {
        self.phases
            .get(phase.key())
            .map(String::as_str)
            .unwrap_or_else(|| english_phase(phase))
    }

    pub fn text(&self, key: TextKey) -> &str {
        self.text
            .get(key.key())
            .map(String::as_str)
            .unwrap_or_else(|| english_text(key))
    }

    pub fn mode_label(&self, mode: InstallerMode) -> &str {
        self.text(TextKey::label_for(mode))
    }

    /// Resolve alert text. Unknown keys are looked up verbatim and, failing
    /// that, shown as the raw key.
    pub fn alert(&self, message: &AlertMessage) -> String {
        if let Some(text) = self.alerts.get(message.key()) {
            return text.clone();
        }
        match message {
            AlertMessage::Known(key) => english_alert(*key).to_string(),
            AlertMessage::Unresolved(raw) => {
                warn!(key = %raw, "no translation for alert key, showing raw key");
                raw.clone()
            }
        }
    }

    /// Entries present in the tables that no typed key refers to.
    pub fn unknown_keys(&self) -> Vec<String> {
        let phases = self
            .phases
            .keys()
            .filter(|key| !Phase::ALL.iter().any(|phase| phase.key() == key.as_str()))
            .map(|key| format!("phases.{key}"));
        let alerts = self
            .alerts
            .keys()
            .filter(|key| AlertKey::from_key(key).is_none())
            .map(|key| format!("alerts.{key}"));
        let text = self
            .text
            .keys()
            .filter(|key| !TextKey::ALL.iter().any(|text| text.key() == key.as_str()))
            .map(|key| format!("text.{key}"));
        phases.chain(alerts).chain(text).collect()
    }
}

fn english_phase(phase: Phase) -> &'static str {
    match phase {
        Phase::Start => "Preparing",
        Phase::DownloadModLoader => "Downloading mod loader",
        Phase::RemoveMods => "Removing old mods",
        Phase::DownloadMods => "Downloading mods",
        Phase::DownloadResources => "Downloading resources",
        Phase::UpdateSettings => "Updating settings",
        Phase::AddProfile => "Adding launcher profile",
        Phase::LaunchModLoader => "Launching mod loader installer",
        Phase::FinishInstall => "Installation complete",
        Phase::FinishUpdate => "Update complete",
    }
}

fn english_alert(key: AlertKey) -> &'static str {
    match key {
        AlertKey::FailedAddProfile => {
            "Could not add the launcher profile. Add it manually from the launcher."
        }
        AlertKey::FailedLaunchModLoader => {
            "Could not start the mod loader installer. Run it from the install folder."
        }
        AlertKey::LaunchModLoader => {
            "The mod loader installer was opened. Follow its steps to finish."
        }
    }
}

fn english_text(key: TextKey) -> &'static str {
    match key {
        TextKey::InstallLabel => "Install",
        TextKey::UpdateLabel => "Update",
        TextKey::InstallFailed => "Installation failed.",
        TextKey::UpdateFailed => "Update failed.",
        TextKey::InstallFinished => "The modpack was installed.",
        TextKey::UpdateFinished => "The modpack was updated.",
        TextKey::ModeRejected => "This mode is not available right now.",
        TextKey::StatusFailed => "Could not read the installer status.",
        TextKey::OpenLogFolder => "Open log folder",
        TextKey::Dismiss => "Back to start",
        TextKey::Exit => "Exit",
    }
}
