//! Simulated engine that walks the real phase sequences with fake items.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::channel::EventEmitter;
use crate::event::EnginePhase;
use crate::model::{AlertKey, AlertLevel, InstallerMode, ModeResult, TitleStatus};

use super::process::open_path;
use super::{EngineError, InstallationEngine};

const LOADER_ITEMS: &[&str] = &["neoforge-21.1.77-installer.jar"];
const MOD_ITEMS: &[&str] = &[
    "jei-1.21.1-19.21.0.jar",
    "create-1.21.1-6.0.4.jar",
    "sodium-0.6.5.jar",
    "journeymap-1.21.1-6.0.0.jar",
];
const RESOURCE_ITEMS: &[&str] = &["faithful-32x.zip", "complementary-shaders.zip"];
const SETTINGS_ITEMS: &[&str] = &["options.txt", "config/jei-client.toml"];

pub struct DemoEngine {
    status: TitleStatus,
    step_delay: Duration,
    failure: Option<String>,
    launch_mod_loader: bool,
    log_dir: PathBuf,
}

impl DemoEngine {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            status: TitleStatus {
                can_install: true,
                can_update: true,
            },
            step_delay: Duration::from_millis(350),
            failure: None,
            launch_mod_loader: true,
            log_dir,
        }
    }

    pub fn with_status(mut self, status: TitleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Fail the run part way through the mod downloads.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn with_launch_mod_loader(mut self, enabled: bool) -> Self {
        self.launch_mod_loader = enabled;
        self
    }

    async fn walk(
        &self,
        events: &EventEmitter,
        phase: EnginePhase,
        items: &[&str],
    ) -> Result<(), EngineError> {
        events.change_phase(phase);
        let total = items.len().max(1) as f32;
        for (index, item) in items.iter().enumerate() {
            events.change_detail(*item);
            tokio::time::sleep(self.step_delay).await;
            if phase == EnginePhase::DownloadMods && index + 1 == items.len() / 2 {
                if let Some(message) = &self.failure {
                    return Err(EngineError::Failed(message.clone()));
                }
            }
            events.update_progress((index + 1) as f32 / total);
        }
        Ok(())
    }

    async fn run_install(&self, events: &EventEmitter) -> Result<(), EngineError> {
        self.walk(events, EnginePhase::DownloadModLoader, LOADER_ITEMS)
            .await?;
        self.walk(events, EnginePhase::DownloadMods, MOD_ITEMS).await?;
        self.walk(events, EnginePhase::DownloadResources, RESOURCE_ITEMS)
            .await?;
        events.change_phase(EnginePhase::AddProfile);
        tokio::time::sleep(self.step_delay).await;
        if self.launch_mod_loader {
            events.change_phase(EnginePhase::LaunchModLoader);
            tokio::time::sleep(self.step_delay).await;
            events.add_alert(AlertLevel::Info, AlertKey::LaunchModLoader);
        }
        Ok(())
    }

    async fn run_update(&self, events: &EventEmitter) -> Result<(), EngineError> {
        self.walk(events, EnginePhase::RemoveMods, &MOD_ITEMS[..1])
            .await?;
        self.walk(events, EnginePhase::DownloadMods, MOD_ITEMS).await?;
        self.walk(events, EnginePhase::DownloadResources, RESOURCE_ITEMS)
            .await?;
        self.walk(events, EnginePhase::UpdateSettings, SETTINGS_ITEMS)
            .await
    }
}

#[async_trait]
impl InstallationEngine for DemoEngine {
    async fn initialize_title(&self) -> Result<TitleStatus, EngineError> {
        Ok(self.status)
    }

    async fn select_mode(&self, mode: InstallerMode) -> Result<ModeResult, EngineError> {
        if self.status.allows(mode) {
            return Ok(ModeResult::accept());
        }
        Ok(match mode {
            InstallerMode::Install => ModeResult::reject("The modpack is already installed."),
            InstallerMode::Update => {
                ModeResult::reject("Nothing is installed yet, so there is nothing to update.")
            }
        })
    }

    async fn run_installer(
        &self,
        mode: InstallerMode,
        events: EventEmitter,
    ) -> Result<(), EngineError> {
        info!(%mode, "demo run started");
        events.update_progress(0.0);
        match mode {
            InstallerMode::Install => self.run_install(&events).await,
            InstallerMode::Update => self.run_update(&events).await,
        }
    }

    async fn open_log_folder(&self) {
        open_path(&self.log_dir).await;
    }
}
