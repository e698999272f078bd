//! Installer data model shared by the engine interface and the orchestrator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which flow a run executes. Frozen once the run starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstallerMode {
    Install,
    Update,
}

impl InstallerMode {
    /// Wire identifier used in engine calls.
    pub fn as_str(self) -> &'static str {
        match self {
            InstallerMode::Install => "install",
            InstallerMode::Update => "update",
        }
    }

    pub fn all() -> [InstallerMode; 2] {
        [InstallerMode::Install, InstallerMode::Update]
    }
}

impl fmt::Display for InstallerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Readiness reported by the engine at startup.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleStatus {
    pub can_install: bool,
    pub can_update: bool,
}

impl TitleStatus {
    pub fn allows(&self, mode: InstallerMode) -> bool {
        match mode {
            InstallerMode::Install => self.can_install,
            InstallerMode::Update => self.can_update,
        }
    }
}

/// Engine verdict on a mode selection attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeResult {
    pub is_accept: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ModeResult {
    pub fn accept() -> Self {
        Self {
            is_accept: true,
            error: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            is_accept: false,
            error: Some(reason.into()),
        }
    }
}

/// Named stage of a run. Each phase has its own progress scale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    DownloadModLoader,
    RemoveMods,
    DownloadMods,
    DownloadResources,
    UpdateSettings,
    AddProfile,
    LaunchModLoader,
    FinishInstall,
    FinishUpdate,
}

impl Phase {
    pub const ALL: [Phase; 10] = [
        Phase::Start,
        Phase::DownloadModLoader,
        Phase::RemoveMods,
        Phase::DownloadMods,
        Phase::DownloadResources,
        Phase::UpdateSettings,
        Phase::AddProfile,
        Phase::LaunchModLoader,
        Phase::FinishInstall,
        Phase::FinishUpdate,
    ];

    /// Localization key for the phase title.
    pub fn key(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::DownloadModLoader => "downloadModLoader",
            Phase::RemoveMods => "removeMods",
            Phase::DownloadMods => "downloadMods",
            Phase::DownloadResources => "downloadResources",
            Phase::UpdateSettings => "updateSettings",
            Phase::AddProfile => "addProfile",
            Phase::LaunchModLoader => "launchModLoader",
            Phase::FinishInstall => "finishInstall",
            Phase::FinishUpdate => "finishUpdate",
        }
    }

    /// Phase shown once a run in `mode` has succeeded.
    pub fn finish_for(mode: InstallerMode) -> Phase {
        match mode {
            InstallerMode::Install => Phase::FinishInstall,
            InstallerMode::Update => Phase::FinishUpdate,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertLevel {
    Info,
    Warning,
}

/// Alert message keys the engine is known to emit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AlertKey {
    FailedAddProfile,
    FailedLaunchModLoader,
    LaunchModLoader,
}

impl AlertKey {
    pub const ALL: [AlertKey; 3] = [
        AlertKey::FailedAddProfile,
        AlertKey::FailedLaunchModLoader,
        AlertKey::LaunchModLoader,
    ];

    pub fn as_key(self) -> &'static str {
        match self {
            AlertKey::FailedAddProfile => "alertOnFailedAddProfile",
            AlertKey::FailedLaunchModLoader => "alertOnFailedLaunchModLoader",
            AlertKey::LaunchModLoader => "alertOnLaunchModLoader",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_key() == key)
    }
}

/// Alert message reference; keys outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertMessage {
    Known(AlertKey),
    Unresolved(String),
}

impl AlertMessage {
    pub fn from_key(key: &str) -> Self {
        match AlertKey::from_key(key) {
            Some(known) => AlertMessage::Known(known),
            None => AlertMessage::Unresolved(key.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            AlertMessage::Known(known) => known.as_key(),
            AlertMessage::Unresolved(raw) => raw,
        }
    }
}

/// Clamp a progress fraction into [0, 1]. NaN counts as no progress.
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}

/// Rounded percentage for display.
pub fn progress_percent(progress: f32) -> u16 {
    (clamp_progress(progress) * 100.0).round() as u16
}
