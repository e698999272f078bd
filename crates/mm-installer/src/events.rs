//! Messages funneled into the UI thread.
//!
//! Terminal input, engine replies and channel deliveries share one queue so
//! the UI applies them in arrival order.

use crossterm::event::Event;
use mm_installer_core::{EngineError, InstallerMode, ModeResult, RunId, TitleStatus};

pub enum UiMessage {
    Input(Event),
    Status(Result<TitleStatus, EngineError>),
    Selection(InstallerMode, Result<ModeResult, EngineError>),
    Channel(RunId, String),
    RunFinished(RunId, Result<(), EngineError>),
}
