//! One-shot readiness query that decides which modes are offered.

use tracing::{debug, info, warn};

use crate::engine::{EngineError, InstallationEngine};
use crate::model::{InstallerMode, TitleStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Unqueried,
    Pending,
    Ready(TitleStatus),
    Failed(EngineError),
}

#[derive(Debug)]
pub struct StatusGate {
    state: GateState,
}

impl Default for StatusGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Unqueried,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Claim the query. Only the first caller gets `true`; later callers
    /// are suppressed rather than queued.
    pub fn begin(&mut self) -> bool {
        if self.state != GateState::Unqueried {
            debug!(state = ?self.state, "status query suppressed");
            return false;
        }
        self.state = GateState::Pending;
        true
    }

    /// Record the result of the claimed query and hand it back.
    pub fn resolve(
        &mut self,
        result: Result<TitleStatus, EngineError>,
    ) -> Result<TitleStatus, EngineError> {
        if self.state != GateState::Pending {
            warn!(state = ?self.state, "status result arrived without a pending query");
        }
        match &result {
            Ok(status) => {
                info!(
                    can_install = status.can_install,
                    can_update = status.can_update,
                    "installer status ready"
                );
                self.state = GateState::Ready(*status);
            }
            Err(err) => {
                warn!(%err, "installer status query failed");
                self.state = GateState::Failed(err.clone());
            }
        }
        result
    }

    pub fn status(&self) -> Option<TitleStatus> {
        match self.state {
            GateState::Ready(status) => Some(status),
            _ => None,
        }
    }

    pub fn offers(&self, mode: InstallerMode) -> bool {
        self.status().map(|status| status.allows(mode)).unwrap_or(false)
    }

    pub fn offered_modes(&self) -> Vec<InstallerMode> {
        InstallerMode::all()
            .into_iter()
            .filter(|mode| self.offers(*mode))
            .collect()
    }

    /// Query the engine once. Returns `Ok(None)` when another query is
    /// already in flight; repeated calls afterwards replay the first result.
    pub async fn query<E>(&mut self, engine: &E) -> Result<Option<TitleStatus>, EngineError>
    where
        E: InstallationEngine + ?Sized,
    {
        match &self.state {
            GateState::Ready(status) => return Ok(Some(*status)),
            GateState::Failed(err) => return Err(err.clone()),
            GateState::Pending => return Ok(None),
            GateState::Unqueried => {}
        }
        self.begin();
        let result = engine.initialize_title().await;
        self.resolve(result).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::channel::EventEmitter;
    use crate::model::ModeResult;

    struct CountingEngine {
        calls: AtomicUsize,
        result: Result<TitleStatus, EngineError>,
    }

    #[async_trait]
    impl InstallationEngine for CountingEngine {
        async fn initialize_title(&self) -> Result<TitleStatus, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }

        async fn select_mode(&self, _mode: InstallerMode) -> Result<ModeResult, EngineError> {
            Ok(ModeResult::accept())
        }

        async fn run_installer(
            &self,
            _mode: InstallerMode,
            _events: EventEmitter,
        ) -> Result<(), EngineError> {
            Ok(())
        }

        async fn open_log_folder(&self) {}
    }

    #[tokio::test]
    async fn queries_engine_once_and_gates_modes() {
        let engine = CountingEngine {
            calls: AtomicUsize::new(0),
            result: Ok(TitleStatus {
                can_install: false,
                can_update: true,
            }),
        };
        let mut gate = StatusGate::new();
        let first = gate.query(&engine).await.unwrap();
        let second = gate.query(&engine).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.offered_modes(), vec![InstallerMode::Update]);
    }

    #[test]
    fn second_begin_while_pending_is_suppressed() {
        let mut gate = StatusGate::new();
        assert!(gate.begin());
        assert!(!gate.begin());
        assert_eq!(gate.state(), &GateState::Pending);
        assert!(gate.offered_modes().is_empty());
    }

    #[tokio::test]
    async fn failure_propagates_and_sticks() {
        let engine = CountingEngine {
            calls: AtomicUsize::new(0),
            result: Err(EngineError::Spawn("engine missing".into())),
        };
        let mut gate = StatusGate::new();
        assert!(gate.query(&engine).await.is_err());
        assert!(gate.query(&engine).await.is_err());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert!(!gate.offers(InstallerMode::Install));
    }
}
