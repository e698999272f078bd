//! Non-interactive run: status, selection and one run narrated via tracing.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use mm_installer_core::{
    resolve, select_mode, AlertLevel, EventBus, InstallationEngine, InstallerMode, Locale,
    Orchestrator, Phase, Resolution, RunState, Selection, StatusGate,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};

pub(super) fn run(
    runtime: &Runtime,
    engine: Arc<dyn InstallationEngine>,
    locale: Arc<Locale>,
    mode: InstallerMode,
) -> Result<()> {
    runtime.block_on(async {
        let mut gate = StatusGate::new();
        gate.query(engine.as_ref())
            .await
            .context("query installer status")?;
        if !gate.offers(mode) {
            warn!(%mode, "status does not offer this mode; asking the engine anyway");
        }

        match select_mode(engine.as_ref(), mode, &locale).await {
            Selection::Accepted(_) => {}
            Selection::Rejected { reason, .. } => {
                bail!("{} rejected: {reason}", locale.mode_label(mode))
            }
        }

        let bus = EventBus::new();
        let mut orchestrator = Orchestrator::new(locale.clone());
        let mut narrator = Narrator::new(&locale);
        orchestrator
            .run(engine.as_ref(), &bus, mode, |state| narrator.observe(state))
            .await?;

        match resolve(&orchestrator) {
            Resolution::Finished { message, .. } => {
                info!("{message}");
                Ok(())
            }
            Resolution::Errored {
                framing, message, ..
            } => Err(anyhow!("{framing}: {message}")),
            Resolution::Pending => Err(anyhow!("run ended without an outcome")),
        }
    })
}

/// Logs only what changed since the previous observation.
struct Narrator<'a> {
    locale: &'a Locale,
    phase: Option<Phase>,
    detail: String,
    percent_step: u16,
    alerts_seen: u64,
}

impl<'a> Narrator<'a> {
    fn new(locale: &'a Locale) -> Self {
        Self {
            locale,
            phase: None,
            detail: String::new(),
            percent_step: 0,
            alerts_seen: 0,
        }
    }

    fn observe(&mut self, state: &RunState) {
        if self.phase != Some(state.phase) {
            self.phase = Some(state.phase);
            self.detail.clear();
            self.percent_step = 0;
            info!(phase = %state.phase, "{}", self.locale.phase(state.phase));
        }
        if !state.detail.is_empty() && state.detail != self.detail {
            self.detail.clone_from(&state.detail);
            info!(detail = %state.detail, "working");
        }
        let step = state.percent() / 25;
        if step > self.percent_step {
            self.percent_step = step;
            info!(percent = state.percent(), "progress");
        }
        for alert in state.alerts.iter() {
            if alert.id.get() > self.alerts_seen {
                self.alerts_seen = alert.id.get();
                match alert.level {
                    AlertLevel::Info => info!(alert = %alert.text, "alert"),
                    AlertLevel::Warning => warn!(alert = %alert.text, "alert"),
                }
            }
        }
    }
}
