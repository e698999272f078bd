//! Engine calls on the tokio runtime, reported back to the UI thread.
//!
//! Every reply is sent as a [`UiMessage`]; the UI thread is the only place
//! orchestrator state changes.

use std::sync::mpsc;
use std::sync::Arc;

use mm_installer_core::{
    CompletionHost, EventBus, InstallationEngine, InstallerMode, Orchestrator, OrchestratorError,
    RunId,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::events::UiMessage;

pub struct Worker {
    runtime: Handle,
    engine: Arc<dyn InstallationEngine>,
    bus: EventBus,
    ui_tx: mpsc::Sender<UiMessage>,
    // Engine call of the most recent run, until that run is settled.
    active: Option<(RunId, JoinHandle<()>)>,
}

impl Worker {
    pub fn new(
        runtime: Handle,
        engine: Arc<dyn InstallationEngine>,
        ui_tx: mpsc::Sender<UiMessage>,
    ) -> Self {
        Self {
            runtime,
            engine,
            bus: EventBus::new(),
            ui_tx,
            active: None,
        }
    }

    pub fn query_status(&self) {
        let engine = self.engine.clone();
        let ui_tx = self.ui_tx.clone();
        self.runtime.spawn(async move {
            let result = engine.initialize_title().await;
            let _ = ui_tx.send(UiMessage::Status(result));
        });
    }

    pub fn select_mode(&self, mode: InstallerMode) {
        let engine = self.engine.clone();
        let ui_tx = self.ui_tx.clone();
        self.runtime.spawn(async move {
            let result = engine.select_mode(mode).await;
            let _ = ui_tx.send(UiMessage::Selection(mode, result));
        });
    }

    /// Subscribe the orchestrator, then invoke the engine. Channel payloads
    /// and the final result both reach the UI thread tagged with the run id.
    pub fn start_run(
        &mut self,
        orchestrator: &mut Orchestrator,
        mode: InstallerMode,
    ) -> Result<RunId, OrchestratorError> {
        let deliver_tx = self.ui_tx.clone();
        let run = orchestrator.start(mode, &self.bus, move |run, payload| {
            let _ = deliver_tx.send(UiMessage::Channel(run, payload.to_string()));
        })?;

        let Some(emitter) = orchestrator.emitter() else {
            return Ok(run);
        };
        let engine = self.engine.clone();
        let ui_tx = self.ui_tx.clone();
        let handle = self.runtime.spawn(async move {
            let result = engine.run_installer(mode, emitter).await;
            debug!(run = run.get(), ok = result.is_ok(), "engine run returned");
            let _ = ui_tx.send(UiMessage::RunFinished(run, result));
        });
        self.active = Some((run, handle));
        Ok(run)
    }

    /// Abort the engine call once its run is no longer the active one, e.g.
    /// after a channel violation or a teardown. Aborting drops the engine
    /// future, which kills a spawned engine process.
    pub fn settle(&mut self, orchestrator: &Orchestrator) {
        let Some((run, _)) = &self.active else {
            return;
        };
        if orchestrator.current_run() == Some(*run) {
            return;
        }
        if let Some((run, handle)) = self.active.take() {
            if !handle.is_finished() {
                warn!(run = run.get(), "aborting engine call for an ended run");
                handle.abort();
            }
        }
    }

    pub fn open_log_folder(&self) {
        let engine = self.engine.clone();
        self.runtime.spawn(async move {
            engine.open_log_folder().await;
        });
    }
}

/// Resolver side effects for the TUI.
pub struct TuiHost<'a> {
    pub worker: &'a Worker,
    pub exit: bool,
}

impl CompletionHost for TuiHost<'_> {
    fn open_log_folder(&mut self) {
        self.worker.open_log_folder();
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}
