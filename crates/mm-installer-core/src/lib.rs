//! Installer orchestration for modpack install and update runs.

pub mod alerts;
pub mod channel;
pub mod config;
pub mod engine;
pub mod event;
pub mod gate;
pub mod locale;
pub mod model;
pub mod orchestrator;
pub mod resolver;
pub mod selector;

pub use alerts::{Alert, AlertId, AlertQueue};
pub use channel::{EventBus, EventEmitter, Subscription};
pub use config::*;
pub use engine::{DemoEngine, EngineError, InstallationEngine, ProcessEngine};
pub use event::{DecodeError, EnginePhase, InstallerEvent, INSTALLER_EVENT_TOPIC};
pub use gate::{GateState, StatusGate};
pub use locale::{Locale, LocaleError, TextKey};
pub use model::*;
pub use orchestrator::{Orchestrator, OrchestratorError, Outcome, RunId, RunState, RunStatus};
pub use resolver::{resolve, ActionNotOffered, CompletionHost, Resolution, ResolverAction};
pub use selector::{select_mode, Selection};
