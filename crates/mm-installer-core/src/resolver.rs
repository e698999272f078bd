//! What the user sees and may do once a run reaches a terminal state.

use thiserror::Error;
use tracing::info;

use crate::locale::TextKey;
use crate::model::InstallerMode;
use crate::orchestrator::{Orchestrator, RunStatus};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolverAction {
    OpenLogFolder,
    Dismiss,
    Exit,
}

impl ResolverAction {
    pub fn text_key(self) -> TextKey {
        match self {
            ResolverAction::OpenLogFolder => TextKey::OpenLogFolder,
            ResolverAction::Dismiss => TextKey::Dismiss,
            ResolverAction::Exit => TextKey::Exit,
        }
    }
}

const ERROR_ACTIONS: &[ResolverAction] = &[ResolverAction::OpenLogFolder, ResolverAction::Dismiss];
const FINISH_ACTIONS: &[ResolverAction] = &[ResolverAction::Exit];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No terminal outcome yet.
    Pending,
    Finished {
        mode: InstallerMode,
        message: String,
    },
    Errored {
        mode: InstallerMode,
        framing: String,
        message: String,
    },
}

impl Resolution {
    pub fn actions(&self) -> &'static [ResolverAction] {
        match self {
            Resolution::Pending => &[],
            Resolution::Finished { .. } => FINISH_ACTIONS,
            Resolution::Errored { .. } => ERROR_ACTIONS,
        }
    }

    pub fn offers(&self, action: ResolverAction) -> bool {
        self.actions().contains(&action)
    }

    /// Full text for a dialog body.
    pub fn user_text(&self) -> Option<String> {
        match self {
            Resolution::Pending => None,
            Resolution::Finished { message, .. } => Some(message.clone()),
            Resolution::Errored {
                framing, message, ..
            } => Some(format!("{framing}\n{message}")),
        }
    }
}

pub fn resolve(orchestrator: &Orchestrator) -> Resolution {
    let locale = orchestrator.locale();
    match orchestrator.status() {
        RunStatus::Idle | RunStatus::Running { .. } => Resolution::Pending,
        RunStatus::Finished { mode } => Resolution::Finished {
            mode: *mode,
            message: locale.text(TextKey::finished_for(*mode)).to_string(),
        },
        RunStatus::Errored { mode, message } => Resolution::Errored {
            mode: *mode,
            framing: locale.text(TextKey::failed_for(*mode)).to_string(),
            message: message.clone(),
        },
    }
}

/// Host side effects the resolver delegates.
pub trait CompletionHost {
    /// Reveal the diagnostic logs. Fire-and-forget.
    fn open_log_folder(&mut self);
    /// Terminal callback for an acknowledged successful run.
    fn exit(&mut self);
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{action:?} is not offered while the installer is {state}")]
pub struct ActionNotOffered {
    pub action: ResolverAction,
    pub state: &'static str,
}

pub fn perform(
    action: ResolverAction,
    orchestrator: &mut Orchestrator,
    host: &mut dyn CompletionHost,
) -> Result<(), ActionNotOffered> {
    if !resolve(orchestrator).offers(action) {
        return Err(ActionNotOffered {
            action,
            state: orchestrator.status().label(),
        });
    }
    info!(?action, "resolver action");
    match action {
        ResolverAction::OpenLogFolder => host.open_log_folder(),
        ResolverAction::Dismiss => {
            orchestrator.dismiss();
        }
        ResolverAction::Exit => host.exit(),
    }
    Ok(())
}
