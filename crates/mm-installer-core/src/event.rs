//! Installer event wire format.
//!
//! Events travel over the channel as JSON objects tagged by `type`, e.g.
//! `{"type":"changePhase","phase":"downloadMods"}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AlertLevel, Phase};

/// Topic the engine publishes run events on.
pub const INSTALLER_EVENT_TOPIC: &str = "installer://event";

/// Phases the engine is allowed to announce.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnginePhase {
    DownloadModLoader,
    RemoveMods,
    DownloadMods,
    DownloadResources,
    UpdateSettings,
    AddProfile,
    LaunchModLoader,
}

impl From<EnginePhase> for Phase {
    fn from(phase: EnginePhase) -> Self {
        match phase {
            EnginePhase::DownloadModLoader => Phase::DownloadModLoader,
            EnginePhase::RemoveMods => Phase::RemoveMods,
            EnginePhase::DownloadMods => Phase::DownloadMods,
            EnginePhase::DownloadResources => Phase::DownloadResources,
            EnginePhase::UpdateSettings => Phase::UpdateSettings,
            EnginePhase::AddProfile => Phase::AddProfile,
            EnginePhase::LaunchModLoader => Phase::LaunchModLoader,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InstallerEvent {
    ChangePhase {
        phase: EnginePhase,
    },
    ChangeDetail {
        detail: String,
    },
    UpdateProgress {
        progress: f32,
    },
    AddAlert {
        level: AlertLevel,
        translation_key: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty installer event payload")]
    Empty,
    #[error("malformed installer event: {0}")]
    Malformed(String),
}

impl InstallerEvent {
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }
        serde_json::from_str(raw).map_err(|err| DecodeError::Malformed(err.to_string()))
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Short tag used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            InstallerEvent::ChangePhase { .. } => "changePhase",
            InstallerEvent::ChangeDetail { .. } => "changeDetail",
            InstallerEvent::UpdateProgress { .. } => "updateProgress",
            InstallerEvent::AddAlert { .. } => "addAlert",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_event_kind() {
        assert_eq!(
            InstallerEvent::decode(r#"{"type":"changePhase","phase":"removeMods"}"#),
            Ok(InstallerEvent::ChangePhase {
                phase: EnginePhase::RemoveMods
            })
        );
        assert_eq!(
            InstallerEvent::decode(r#"{"type":"changeDetail","detail":"jei-1.20.jar"}"#),
            Ok(InstallerEvent::ChangeDetail {
                detail: "jei-1.20.jar".into()
            })
        );
        assert_eq!(
            InstallerEvent::decode(r#"{"type":"updateProgress","progress":0.25}"#),
            Ok(InstallerEvent::UpdateProgress { progress: 0.25 })
        );
        assert_eq!(
            InstallerEvent::decode(
                r#"{"type":"addAlert","level":"warning","translation_key":"alertOnFailedAddProfile"}"#
            ),
            Ok(InstallerEvent::AddAlert {
                level: AlertLevel::Warning,
                translation_key: "alertOnFailedAddProfile".into()
            })
        );
    }

    #[test]
    fn unknown_phase_tag_is_a_decode_error() {
        let err = InstallerEvent::decode(r#"{"type":"changePhase","phase":"bakeCake"}"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(ref msg) if msg.contains("bakeCake")));
    }

    #[test]
    fn unknown_type_and_garbage_are_rejected() {
        assert!(InstallerEvent::decode(r#"{"type":"explode"}"#).is_err());
        assert!(InstallerEvent::decode("not json").is_err());
        assert_eq!(InstallerEvent::decode("   "), Err(DecodeError::Empty));
    }

    #[test]
    fn encode_uses_engine_field_names() {
        let encoded = InstallerEvent::AddAlert {
            level: AlertLevel::Info,
            translation_key: "alertOnLaunchModLoader".into(),
        }
        .encode()
        .unwrap();
        assert_eq!(
            encoded,
            r#"{"type":"addAlert","level":"info","translation_key":"alertOnLaunchModLoader"}"#
        );
    }
}
