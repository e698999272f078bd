//! Installation engine interface and the bundled engine adapters.
//!
//! The engine does the real work (downloads, mod loader setup, launcher
//! profiles). This crate only drives it through [`InstallationEngine`].

mod demo;
mod process;

use async_trait::async_trait;
use thiserror::Error;

use crate::channel::EventEmitter;
use crate::model::{InstallerMode, ModeResult, TitleStatus};

pub use demo::DemoEngine;
pub use process::ProcessEngine;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The engine reported a failure; the text is shown to the user as-is.
    #[error("{0}")]
    Failed(String),
    #[error("failed to start engine: {0}")]
    Spawn(String),
    #[error("invalid engine response: {0}")]
    Protocol(String),
}

#[async_trait]
pub trait InstallationEngine: Send + Sync {
    /// Report which modes can be entered right now.
    async fn initialize_title(&self) -> Result<TitleStatus, EngineError>;

    /// Validate a requested mode.
    async fn select_mode(&self, mode: InstallerMode) -> Result<ModeResult, EngineError>;

    /// Execute a run, publishing progress through `events` until it returns.
    async fn run_installer(
        &self,
        mode: InstallerMode,
        events: EventEmitter,
    ) -> Result<(), EngineError>;

    /// Reveal the diagnostic log location. Failures are logged, not returned.
    async fn open_log_folder(&self);
}
