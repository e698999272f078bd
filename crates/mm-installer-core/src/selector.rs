//! Mode selection against the engine's authoritative checks.

use tracing::{info, warn};

use crate::engine::{EngineError, InstallationEngine};
use crate::locale::{Locale, TextKey};
use crate::model::{InstallerMode, ModeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The run may start with this mode.
    Accepted(InstallerMode),
    /// Stay on the selection screen and show `reason`.
    Rejected { mode: InstallerMode, reason: String },
}

impl Selection {
    pub fn accepted_mode(&self) -> Option<InstallerMode> {
        match self {
            Selection::Accepted(mode) => Some(*mode),
            Selection::Rejected { .. } => None,
        }
    }
}

/// Turn an engine reply into a selection. A failed call is treated as a
/// rejection carrying the failure text.
pub fn interpret(
    mode: InstallerMode,
    result: Result<ModeResult, EngineError>,
    locale: &Locale,
) -> Selection {
    match result {
        Ok(reply) if reply.is_accept => {
            info!(%mode, "mode accepted");
            Selection::Accepted(mode)
        }
        Ok(reply) => {
            let reason = reply
                .error
                .filter(|reason| !reason.trim().is_empty())
                .unwrap_or_else(|| locale.text(TextKey::ModeRejected).to_string());
            warn!(%mode, %reason, "mode rejected");
            Selection::Rejected { mode, reason }
        }
        Err(err) => {
            warn!(%mode, %err, "mode selection call failed");
            Selection::Rejected {
                mode,
                reason: err.to_string(),
            }
        }
    }
}

pub async fn select_mode<E>(engine: &E, mode: InstallerMode, locale: &Locale) -> Selection
where
    E: InstallationEngine + ?Sized,
{
    interpret(mode, engine.select_mode(mode).await, locale)
}
