//! Run state machine: `Idle -> Running -> {Finished | Errored}`.
//!
//! The orchestrator owns the event channel subscription for the active run.
//! Deliveries and completions are stamped with the [`RunId`] they belong to,
//! so anything arriving for a run that is no longer active is ignored.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::alerts::{AlertId, AlertQueue};
use crate::channel::{EventBus, EventEmitter, Subscription};
use crate::engine::{EngineError, InstallationEngine};
use crate::event::{InstallerEvent, INSTALLER_EVENT_TOPIC};
use crate::locale::Locale;
use crate::model::{clamp_progress, progress_percent, AlertMessage, InstallerMode, Phase};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Finished,
    Errored(String),
}

/// Everything the run screen shows.
#[derive(Debug)]
pub struct RunState {
    pub phase: Phase,
    pub detail: String,
    pub progress: f32,
    pub alerts: AlertQueue,
    pub outcome: Outcome,
    /// Phases in the order they were entered.
    pub phase_history: Vec<Phase>,
}

impl RunState {
    fn new() -> Self {
        Self {
            phase: Phase::Start,
            detail: String::new(),
            progress: 0.0,
            alerts: AlertQueue::new(),
            outcome: Outcome::Running,
            phase_history: Vec::new(),
        }
    }

    pub fn percent(&self) -> u16 {
        progress_percent(self.progress)
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.detail.clear();
        self.progress = 0.0;
        self.phase_history.push(phase);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running { id: RunId, mode: InstallerMode },
    Finished { mode: InstallerMode },
    Errored { mode: InstallerMode, message: String },
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running { .. } => "running",
            RunStatus::Finished { .. } => "finished",
            RunStatus::Errored { .. } => "errored",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("cannot start a run while the installer is {0}")]
    NotIdle(&'static str),
}

pub struct Orchestrator {
    locale: Arc<Locale>,
    status: RunStatus,
    run: RunState,
    next_run: u64,
    subscription: Option<Subscription>,
}

impl Orchestrator {
    pub fn new(locale: Arc<Locale>) -> Self {
        Self {
            locale,
            status: RunStatus::Idle,
            run: RunState::new(),
            next_run: 0,
            subscription: None,
        }
    }

    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    pub fn state(&self) -> &RunState {
        &self.run
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn mode(&self) -> Option<InstallerMode> {
        match self.status {
            RunStatus::Idle => None,
            RunStatus::Running { mode, .. }
            | RunStatus::Finished { mode }
            | RunStatus::Errored { mode, .. } => Some(mode),
        }
    }

    pub fn current_run(&self) -> Option<RunId> {
        match self.status {
            RunStatus::Running { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, RunStatus::Running { .. })
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Emitter for the active run's engine. It stops delivering as soon as
    /// the run leaves `Running`, so an abandoned engine cannot reach a later
    /// run.
    pub fn emitter(&self) -> Option<EventEmitter> {
        self.subscription.as_ref().map(Subscription::emitter)
    }

    /// Enter `Running`: subscribe to the installer topic and route every
    /// payload to `deliver` tagged with the new run id.
    pub fn start<F>(
        &mut self,
        mode: InstallerMode,
        bus: &EventBus,
        deliver: F,
    ) -> Result<RunId, OrchestratorError>
    where
        F: Fn(RunId, &str) + Send + Sync + 'static,
    {
        if self.status != RunStatus::Idle {
            warn!(%mode, state = self.status.label(), "ignoring start request");
            return Err(OrchestratorError::NotIdle(self.status.label()));
        }
        self.next_run += 1;
        let id = RunId(self.next_run);
        self.run = RunState::new();
        self.subscription = Some(bus.subscribe(INSTALLER_EVENT_TOPIC, move |payload| {
            deliver(id, payload)
        }));
        self.status = RunStatus::Running { id, mode };
        info!(%mode, run = id.get(), "run started");
        Ok(id)
    }

    /// Apply one channel payload. Returns whether the run state changed.
    pub fn handle_message(&mut self, run: RunId, payload: &str) -> bool {
        if self.current_run() != Some(run) {
            debug!(run = run.get(), "dropping event for inactive run");
            return false;
        }
        match InstallerEvent::decode(payload) {
            Ok(event) => {
                self.apply(event);
                true
            }
            Err(err) => {
                error!(%err, "installer event violated the channel contract");
                self.fail(err.to_string());
                true
            }
        }
    }

    fn apply(&mut self, event: InstallerEvent) {
        match event {
            InstallerEvent::ChangePhase { phase } => {
                let phase = Phase::from(phase);
                debug!(%phase, "phase changed");
                self.run.enter_phase(phase);
            }
            InstallerEvent::ChangeDetail { detail } => {
                self.run.detail = detail;
            }
            InstallerEvent::UpdateProgress { progress } => {
                self.run.progress = clamp_progress(progress);
            }
            InstallerEvent::AddAlert {
                level,
                translation_key,
            } => {
                let message = AlertMessage::from_key(&translation_key);
                let text = self.locale.alert(&message);
                let id = self.run.alerts.push(level, message, text);
                info!(?level, key = %translation_key, alert = id.get(), "alert raised");
            }
        }
    }

    /// Resolve the run from the engine call's own result. Returns whether the
    /// result was applied; results for inactive runs are ignored.
    pub fn complete(&mut self, run: RunId, result: Result<(), EngineError>) -> bool {
        if self.current_run() != Some(run) {
            debug!(run = run.get(), "dropping completion for inactive run");
            return false;
        }
        match result {
            Ok(()) => self.finish(),
            Err(err) => {
                error!(%err, "run failed");
                self.fail(err.to_string());
            }
        }
        true
    }

    fn finish(&mut self) {
        let Some(mode) = self.mode() else {
            return;
        };
        self.release();
        self.run.enter_phase(Phase::finish_for(mode));
        self.run.outcome = Outcome::Finished;
        self.status = RunStatus::Finished { mode };
        info!(%mode, "run finished");
    }

    fn fail(&mut self, message: String) {
        let Some(mode) = self.mode() else {
            return;
        };
        self.release();
        self.run.outcome = Outcome::Errored(message.clone());
        self.status = RunStatus::Errored { mode, message };
    }

    pub fn dismiss_alert(&mut self, id: AlertId) -> bool {
        self.run.alerts.dismiss(id).is_some()
    }

    /// Leave an errored run and return to `Idle`, discarding its state.
    pub fn dismiss(&mut self) -> bool {
        if !matches!(self.status, RunStatus::Errored { .. }) {
            return false;
        }
        self.reset();
        true
    }

    /// Forced teardown, e.g. the hosting screen closing mid-run.
    pub fn teardown(&mut self) {
        if self.is_running() {
            warn!("tearing down an active run");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.release();
        self.run = RunState::new();
        self.status = RunStatus::Idle;
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Drive a whole run: start, pump channel events while the engine works,
    /// then resolve from the engine result. `observe` sees the state after
    /// every change.
    pub async fn run<E, F>(
        &mut self,
        engine: &E,
        bus: &EventBus,
        mode: InstallerMode,
        mut observe: F,
    ) -> Result<RunId, OrchestratorError>
    where
        E: InstallationEngine + ?Sized,
        F: FnMut(&RunState),
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<(RunId, String)>();
        let id = self.start(mode, bus, move |run, payload| {
            let _ = tx.send((run, payload.to_string()));
        })?;

        let Some(emitter) = self.emitter() else {
            return Ok(id);
        };
        let engine_run = engine.run_installer(mode, emitter);
        tokio::pin!(engine_run);
        let result = loop {
            tokio::select! {
                biased;
                Some((run, payload)) = rx.recv() => {
                    if self.handle_message(run, &payload) {
                        observe(&self.run);
                    }
                    if self.current_run() != Some(id) {
                        // Ended by a channel violation; dropping the future stops the engine.
                        warn!(run = id.get(), "abandoning engine call for an ended run");
                        return Ok(id);
                    }
                }
                result = &mut engine_run => break result,
            }
        };

        // Events emitted before the engine returned still precede completion.
        while let Ok((run, payload)) = rx.try_recv() {
            if self.handle_message(run, &payload) {
                observe(&self.run);
            }
        }
        if self.complete(id, result) {
            observe(&self.run);
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::channel::EventEmitter;
    use crate::event::EnginePhase;
    use crate::model::{AlertLevel, ModeResult, TitleStatus};

    struct ScriptedEngine {
        script: Vec<InstallerEvent>,
        raw: Vec<String>,
        outcome: Result<(), EngineError>,
        runs: AtomicUsize,
    }

    impl ScriptedEngine {
        fn new(script: Vec<InstallerEvent>, outcome: Result<(), EngineError>) -> Self {
            Self {
                script,
                raw: Vec::new(),
                outcome,
                runs: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InstallationEngine for ScriptedEngine {
        async fn initialize_title(&self) -> Result<TitleStatus, EngineError> {
            Ok(TitleStatus::default())
        }

        async fn select_mode(&self, _mode: InstallerMode) -> Result<ModeResult, EngineError> {
            Ok(ModeResult::accept())
        }

        async fn run_installer(
            &self,
            _mode: InstallerMode,
            events: EventEmitter,
        ) -> Result<(), EngineError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            for event in &self.script {
                events.emit(event);
                tokio::task::yield_now().await;
            }
            for raw in &self.raw {
                events.emit_raw(raw);
            }
            self.outcome.clone()
        }

        async fn open_log_folder(&self) {}
    }

    fn phase(phase: EnginePhase) -> InstallerEvent {
        InstallerEvent::ChangePhase { phase }
    }

    fn progress(progress: f32) -> InstallerEvent {
        InstallerEvent::UpdateProgress { progress }
    }

    fn encoded(event: InstallerEvent) -> String {
        event.encode().unwrap()
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(Arc::new(Locale::english()))
    }

    fn started(bus: &EventBus) -> (Orchestrator, RunId) {
        let mut orch = orchestrator();
        let id = orch
            .start(InstallerMode::Install, bus, |_, _| {})
            .expect("idle orchestrator starts");
        (orch, id)
    }

    #[tokio::test]
    async fn install_run_ends_in_finish_phase() {
        let engine = ScriptedEngine::new(
            vec![
                phase(EnginePhase::DownloadModLoader),
                progress(0.5),
                phase(EnginePhase::DownloadMods),
                progress(1.0),
            ],
            Ok(()),
        );
        let bus = EventBus::new();
        let mut orch = orchestrator();
        let mut observed = Vec::new();
        orch.run(&engine, &bus, InstallerMode::Install, |state| {
            observed.push(state.percent())
        })
        .await
        .unwrap();

        let state = orch.state();
        assert_eq!(state.phase, Phase::FinishInstall);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.outcome, Outcome::Finished);
        assert_eq!(
            state.phase_history,
            vec![
                Phase::DownloadModLoader,
                Phase::DownloadMods,
                Phase::FinishInstall
            ]
        );
        assert_eq!(observed, vec![0, 50, 0, 100, 0]);
        assert_eq!(orch.status(), &RunStatus::Finished { mode: InstallerMode::Install });
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 0);
    }

    #[tokio::test]
    async fn update_failure_becomes_errored_state() {
        let engine = ScriptedEngine::new(
            vec![phase(EnginePhase::RemoveMods)],
            Err(EngineError::Failed("disk full".into())),
        );
        let bus = EventBus::new();
        let mut orch = orchestrator();
        orch.run(&engine, &bus, InstallerMode::Update, |_| {})
            .await
            .unwrap();

        assert_eq!(orch.state().outcome, Outcome::Errored("disk full".into()));
        assert_eq!(
            orch.status(),
            &RunStatus::Errored {
                mode: InstallerMode::Update,
                message: "disk full".into()
            }
        );
        assert!(!orch.is_subscribed());
    }

    #[tokio::test]
    async fn run_without_any_events_still_completes() {
        let engine = ScriptedEngine::new(Vec::new(), Ok(()));
        let bus = EventBus::new();
        let mut orch = orchestrator();
        orch.run(&engine, &bus, InstallerMode::Update, |_| {})
            .await
            .unwrap();
        assert_eq!(orch.state().phase, Phase::FinishUpdate);
    }

    #[tokio::test]
    async fn malformed_event_mid_run_is_fatal_and_later_result_ignored() {
        let mut engine = ScriptedEngine::new(vec![phase(EnginePhase::DownloadMods)], Ok(()));
        engine.raw = vec![
            r#"{"type":"changePhase","phase":"bakeCake"}"#.to_string(),
            encoded(phase(EnginePhase::AddProfile)),
        ];
        let bus = EventBus::new();
        let mut orch = orchestrator();
        orch.run(&engine, &bus, InstallerMode::Install, |_| {})
            .await
            .unwrap();

        match orch.state().outcome.clone() {
            Outcome::Errored(message) => assert!(message.contains("bakeCake")),
            other => panic!("expected errored outcome, got {other:?}"),
        }
        assert_eq!(orch.state().phase, Phase::DownloadMods);
    }

    #[test]
    fn phase_change_resets_detail_and_progress() {
        let bus = EventBus::new();
        let (mut orch, id) = started(&bus);
        orch.handle_message(id, &encoded(phase(EnginePhase::DownloadMods)));
        orch.handle_message(
            id,
            &encoded(InstallerEvent::ChangeDetail {
                detail: "create.jar".into(),
            }),
        );
        orch.handle_message(id, &encoded(progress(0.8)));
        assert_eq!(orch.state().detail, "create.jar");
        assert_eq!(orch.state().percent(), 80);

        orch.handle_message(id, &encoded(phase(EnginePhase::DownloadResources)));
        assert_eq!(orch.state().detail, "");
        assert_eq!(orch.state().progress, 0.0);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let bus = EventBus::new();
        let (mut orch, id) = started(&bus);
        orch.handle_message(id, r#"{"type":"updateProgress","progress":-0.2}"#);
        assert_eq!(orch.state().percent(), 0);
        orch.handle_message(id, r#"{"type":"updateProgress","progress":1.7}"#);
        assert_eq!(orch.state().percent(), 100);
        assert_eq!(orch.state().outcome, Outcome::Running);
    }

    #[test]
    fn phase_sequence_matches_emission_order() {
        let bus = EventBus::new();
        let (mut orch, _) = started(&bus);
        // Route through the bus to cover the real delivery path.
        let emitter = bus.emitter();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _watcher = bus.subscribe(INSTALLER_EVENT_TOPIC, move |payload| {
            sink.lock().unwrap().push(payload.to_string())
        });
        for next in [
            EnginePhase::RemoveMods,
            EnginePhase::DownloadMods,
            EnginePhase::DownloadMods,
            EnginePhase::UpdateSettings,
        ] {
            emitter.change_phase(next);
        }
        let id = orch.current_run().unwrap();
        for payload in seen.lock().unwrap().iter() {
            orch.handle_message(id, payload);
        }
        assert_eq!(
            orch.state().phase_history,
            vec![
                Phase::RemoveMods,
                Phase::DownloadMods,
                Phase::DownloadMods,
                Phase::UpdateSettings
            ]
        );
    }

    #[test]
    fn unknown_alert_key_shows_raw_key_and_run_continues() {
        let bus = EventBus::new();
        let (mut orch, id) = started(&bus);
        orch.handle_message(
            id,
            r#"{"type":"addAlert","level":"warning","translation_key":"alertOnMystery"}"#,
        );
        orch.handle_message(
            id,
            r#"{"type":"addAlert","level":"info","translation_key":"alertOnLaunchModLoader"}"#,
        );
        let alerts: Vec<_> = orch.state().alerts.iter().collect();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].text, "alertOnMystery");
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_ne!(alerts[1].text, "alertOnLaunchModLoader");
        assert!(orch.is_running());
    }

    #[test]
    fn second_start_while_running_is_rejected() {
        let bus = EventBus::new();
        let (mut orch, id) = started(&bus);
        let second = orch.start(InstallerMode::Update, &bus, |_, _| {});
        assert_eq!(second, Err(OrchestratorError::NotIdle("running")));
        assert_eq!(orch.current_run(), Some(id));
        assert_eq!(orch.mode(), Some(InstallerMode::Install));
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 1);
    }

    #[test]
    fn stray_events_after_terminal_state_change_nothing() {
        let bus = EventBus::new();
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = delivered.clone();
        let mut orch = orchestrator();
        let id = orch
            .start(InstallerMode::Install, &bus, move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        orch.handle_message(id, &encoded(phase(EnginePhase::DownloadMods)));
        assert!(orch.complete(id, Ok(())));

        bus.emitter().change_phase(EnginePhase::AddProfile);
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
        assert!(!orch.handle_message(id, &encoded(phase(EnginePhase::AddProfile))));
        assert!(!orch.complete(id, Err(EngineError::Failed("late".into()))));
        assert_eq!(orch.state().phase, Phase::FinishInstall);
        assert_eq!(orch.state().outcome, Outcome::Finished);
    }

    #[test]
    fn dismiss_after_error_allows_a_fresh_run() {
        let bus = EventBus::new();
        let (mut orch, first) = started(&bus);
        orch.handle_message(
            first,
            r#"{"type":"addAlert","level":"info","translation_key":"alertOnLaunchModLoader"}"#,
        );
        orch.complete(first, Err(EngineError::Failed("boom".into())));
        assert!(orch.dismiss());
        assert_eq!(orch.status(), &RunStatus::Idle);
        assert!(orch.state().alerts.is_empty());

        let second = orch.start(InstallerMode::Update, &bus, |_, _| {}).unwrap();
        assert_ne!(first, second);
        // Messages stamped with the old run never reach the new one.
        assert!(!orch.handle_message(first, &encoded(phase(EnginePhase::RemoveMods))));
        assert_eq!(orch.state().phase, Phase::Start);
    }

    #[test]
    fn abandoned_engine_cannot_reach_the_next_run() {
        let bus = EventBus::new();
        let queue = Arc::new(Mutex::new(Vec::<(RunId, String)>::new()));
        let mut orch = orchestrator();
        let sink = queue.clone();
        let first = orch
            .start(InstallerMode::Install, &bus, move |run, payload| {
                sink.lock().unwrap().push((run, payload.to_string()))
            })
            .unwrap();
        let first_engine = orch.emitter().unwrap();

        first_engine.emit_raw("not json");
        for (run, payload) in queue.lock().unwrap().drain(..) {
            orch.handle_message(run, &payload);
        }
        assert!(matches!(orch.status(), RunStatus::Errored { .. }));
        assert!(orch.emitter().is_none());
        assert!(orch.dismiss());

        let sink = queue.clone();
        let second = orch
            .start(InstallerMode::Update, &bus, move |run, payload| {
                sink.lock().unwrap().push((run, payload.to_string()))
            })
            .unwrap();
        assert_ne!(first, second);

        first_engine.change_phase(EnginePhase::LaunchModLoader);
        assert!(queue.lock().unwrap().is_empty());
        assert_eq!(orch.state().phase, Phase::Start);
        assert!(orch.state().phase_history.is_empty());

        orch.emitter().unwrap().change_phase(EnginePhase::RemoveMods);
        for (run, payload) in queue.lock().unwrap().drain(..) {
            orch.handle_message(run, &payload);
        }
        assert_eq!(orch.state().phase, Phase::RemoveMods);
    }

    #[tokio::test]
    async fn violation_stops_waiting_on_the_engine() {
        struct EndlessEngine;

        #[async_trait]
        impl InstallationEngine for EndlessEngine {
            async fn initialize_title(&self) -> Result<TitleStatus, EngineError> {
                Ok(TitleStatus::default())
            }

            async fn select_mode(&self, _mode: InstallerMode) -> Result<ModeResult, EngineError> {
                Ok(ModeResult::accept())
            }

            async fn run_installer(
                &self,
                _mode: InstallerMode,
                events: EventEmitter,
            ) -> Result<(), EngineError> {
                events.emit_raw("{\"type\":\"shrug\"}");
                std::future::pending::<()>().await;
                Ok(())
            }

            async fn open_log_folder(&self) {}
        }

        let bus = EventBus::new();
        let mut orch = orchestrator();
        orch.run(&EndlessEngine, &bus, InstallerMode::Install, |_| {})
            .await
            .unwrap();
        assert!(matches!(orch.status(), RunStatus::Errored { .. }));
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 0);
    }

    #[test]
    fn dismiss_is_refused_unless_errored() {
        let bus = EventBus::new();
        let (mut orch, id) = started(&bus);
        assert!(!orch.dismiss());
        orch.complete(id, Ok(()));
        assert!(!orch.dismiss());
        assert_eq!(orch.status(), &RunStatus::Finished { mode: InstallerMode::Install });
    }

    #[test]
    fn teardown_and_drop_release_the_subscription() {
        let bus = EventBus::new();
        let (mut orch, _) = started(&bus);
        orch.teardown();
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 0);
        assert_eq!(orch.status(), &RunStatus::Idle);

        let (orch, _) = started(&bus);
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 1);
        drop(orch);
        assert_eq!(bus.listener_count(INSTALLER_EVENT_TOPIC), 0);
    }

    #[test]
    fn dismissing_an_alert_leaves_the_rest() {
        let bus = EventBus::new();
        let (mut orch, id) = started(&bus);
        for key in ["a", "b", "c"] {
            orch.handle_message(
                id,
                &format!(r#"{{"type":"addAlert","level":"info","translation_key":"{key}"}}"#),
            );
        }
        let ids = orch.state().alerts.ids();
        assert!(orch.dismiss_alert(ids[1]));
        let remaining: Vec<_> = orch
            .state()
            .alerts
            .iter()
            .map(|alert| alert.text.clone())
            .collect();
        assert_eq!(remaining, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn run_is_rejected_while_another_is_active() {
        let engine = ScriptedEngine::new(Vec::new(), Ok(()));
        let bus = EventBus::new();
        let (mut orch, _) = started(&bus);
        let result = orch.run(&engine, &bus, InstallerMode::Update, |_| {}).await;
        assert!(result.is_err());
        assert_eq!(engine.runs.load(Ordering::SeqCst), 0);
    }
}
