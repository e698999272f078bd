//! UI state for the installer TUI.

use std::sync::Arc;

use mm_installer_core::resolver::resolve;
use mm_installer_core::{
    AlertId, GateState, InstallerMode, Locale, Orchestrator, Resolution, ResolverAction,
    StatusGate, TextKey,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    // Status check and mode selection.
    Welcome,
    // Progress of the active or last run.
    Run,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuItem {
    Mode(InstallerMode),
    Quit,
}

pub struct App {
    pub locale: Arc<Locale>,
    pub gate: StatusGate,
    pub orchestrator: Orchestrator,
    pub screen: Screen,
    pub menu_index: usize,
    // Mode awaiting the engine's select reply.
    pub selecting: Option<InstallerMode>,
    // Rejection text shown under the menu.
    pub notice: Option<String>,
    pub alert_index: usize,
    pub action_index: usize,
    pub exit_requested: bool,
}

impl App {
    pub fn new(locale: Arc<Locale>) -> Self {
        Self {
            orchestrator: Orchestrator::new(locale.clone()),
            locale,
            gate: StatusGate::new(),
            screen: Screen::Welcome,
            menu_index: 0,
            selecting: None,
            notice: None,
            alert_index: 0,
            action_index: 0,
            exit_requested: false,
        }
    }

    pub fn menu_items() -> [MenuItem; 3] {
        [
            MenuItem::Mode(InstallerMode::Install),
            MenuItem::Mode(InstallerMode::Update),
            MenuItem::Quit,
        ]
    }

    pub fn selected_menu(&self) -> MenuItem {
        let items = Self::menu_items();
        items[self.menu_index.min(items.len() - 1)]
    }

    /// Only modes the status gate reported as available can be chosen.
    pub fn menu_enabled(&self, item: MenuItem) -> bool {
        match item {
            MenuItem::Mode(mode) => self.gate.offers(mode) && self.selecting.is_none(),
            MenuItem::Quit => true,
        }
    }

    pub fn menu_label(&self, item: MenuItem) -> &str {
        match item {
            MenuItem::Mode(mode) => self.locale.mode_label(mode),
            MenuItem::Quit => self.locale.text(TextKey::Exit),
        }
    }

    pub fn status_failure(&self) -> Option<String> {
        match self.gate.state() {
            GateState::Failed(err) => Some(format!(
                "{}: {err}",
                self.locale.text(TextKey::StatusFailed)
            )),
            _ => None,
        }
    }

    pub fn resolution(&self) -> Resolution {
        resolve(&self.orchestrator)
    }

    pub fn selected_action(&self) -> Option<ResolverAction> {
        let resolution = self.resolution();
        let actions = resolution.actions();
        actions
            .get(self.action_index.min(actions.len().saturating_sub(1)))
            .copied()
    }

    pub fn selected_alert(&self) -> Option<AlertId> {
        let ids = self.orchestrator.state().alerts.ids();
        ids.get(self.alert_index.min(ids.len().saturating_sub(1)))
            .copied()
    }

    /// Keep the alert cursor inside the queue after removals.
    pub fn clamp_alert_index(&mut self) {
        let len = self.orchestrator.state().alerts.len();
        self.alert_index = self.alert_index.min(len.saturating_sub(1));
    }

    pub fn back_to_menu(&mut self) {
        self.screen = Screen::Welcome;
        self.alert_index = 0;
        self.action_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use mm_installer_core::{EngineError, EventBus, TitleStatus};

    use super::*;

    fn app() -> App {
        App::new(Arc::new(Locale::english()))
    }

    #[test]
    fn modes_stay_disabled_until_status_arrives() {
        let mut app = app();
        assert!(!app.menu_enabled(MenuItem::Mode(InstallerMode::Install)));
        assert!(app.menu_enabled(MenuItem::Quit));

        app.gate.begin();
        let _ = app.gate.resolve(Ok(TitleStatus {
            can_install: true,
            can_update: false,
        }));
        assert!(app.menu_enabled(MenuItem::Mode(InstallerMode::Install)));
        assert!(!app.menu_enabled(MenuItem::Mode(InstallerMode::Update)));

        app.selecting = Some(InstallerMode::Install);
        assert!(!app.menu_enabled(MenuItem::Mode(InstallerMode::Install)));
    }

    #[test]
    fn failed_status_is_reported() {
        let mut app = app();
        app.gate.begin();
        let _ = app.gate.resolve(Err(EngineError::Spawn("engine missing".into())));
        let failure = app.status_failure().unwrap();
        assert!(failure.contains("engine missing"));
    }

    #[test]
    fn actions_follow_the_resolution() {
        let mut app = app();
        assert_eq!(app.selected_action(), None);

        let bus = EventBus::new();
        let run = app
            .orchestrator
            .start(InstallerMode::Install, &bus, |_, _| {})
            .unwrap();
        app.orchestrator
            .complete(run, Err(EngineError::Failed("boom".into())));
        app.action_index = 7;
        assert_eq!(app.selected_action(), Some(ResolverAction::Dismiss));
    }
}
