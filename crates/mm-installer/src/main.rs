//! Modpack installer entrypoint: ratatui front end or a headless run.

mod app;
mod events;
mod headless;
mod runtime_config;
mod terminal;
mod ui;
mod worker;

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use mm_installer_core::resolver::perform;
use mm_installer_core::selector::interpret;
use mm_installer_core::{InstallerMode, RunStatus, Selection};
use tracing::{error, info, warn};

use crate::app::{App, MenuItem, Screen};
use crate::events::UiMessage;
use crate::runtime_config::{build_engine, init_tracing, load_config, load_locale, LogTarget};
use crate::terminal::TerminalGuard;
use crate::worker::{TuiHost, Worker};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the built-in simulated engine
    #[arg(long)]
    demo: bool,

    /// Make the simulated engine fail during the mod downloads
    #[arg(long, value_name = "MESSAGE", requires = "demo")]
    demo_failure: Option<String>,

    /// Report the modpack as installed, so only update is offered
    #[arg(long, requires = "demo")]
    demo_installed: bool,

    /// End simulated installs after adding the profile
    #[arg(long, requires = "demo")]
    demo_skip_launch: bool,

    /// Delay between simulated steps in milliseconds
    #[arg(long, value_name = "MS", requires = "demo")]
    demo_step_ms: Option<u64>,

    /// Run without the terminal UI; requires --mode
    #[arg(long)]
    headless: bool,

    /// Mode for a headless run
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Validate configuration and locale, then exit
    #[arg(long)]
    check: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Install,
    Update,
}

impl From<ModeArg> for InstallerMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Install => InstallerMode::Install,
            ModeArg::Update => InstallerMode::Update,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_config(&args)?;
    let target = if args.headless || args.check {
        LogTarget::Stderr
    } else {
        LogTarget::File(&settings.log_dir)
    };
    init_tracing(&settings.config, target)?;
    info!(version = env!("CARGO_PKG_VERSION"), "mm-installer starting");

    let locale = Arc::new(load_locale(&settings)?);
    let engine = build_engine(&args, &settings)?;
    if args.check {
        info!(log_dir = %settings.log_dir.display(), "configuration ok");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    if args.headless {
        let mode = args
            .mode
            .ok_or_else(|| anyhow!("--headless requires --mode"))?;
        return headless::run(&runtime, engine, locale, mode.into());
    }

    let (ui_tx, ui_rx) = mpsc::channel::<UiMessage>();
    let mut worker = Worker::new(runtime.handle().clone(), engine, ui_tx.clone());
    let mut app = App::new(locale);

    let mut terminal_guard = TerminalGuard::new().context("initialize terminal")?;
    let result = run_app(&mut terminal_guard, &mut app, &mut worker, ui_tx, ui_rx);
    // Leaving mid-run releases the channel and stops the engine.
    app.orchestrator.teardown();
    worker.settle(&app.orchestrator);
    terminal_guard.restore()?;
    result
}

fn run_app(
    terminal_guard: &mut TerminalGuard,
    app: &mut App,
    worker: &mut Worker,
    ui_tx: mpsc::Sender<UiMessage>,
    ui_rx: mpsc::Receiver<UiMessage>,
) -> Result<()> {
    spawn_input_thread(ui_tx);
    if app.gate.begin() {
        worker.query_status();
    }

    terminal_guard
        .terminal_mut()
        .draw(|frame| ui::draw(frame, app))?;

    loop {
        match ui_rx.recv() {
            Ok(message) => apply_message(app, worker, message),
            Err(_) => return Ok(()),
        }
        // Coalesce bursts of engine events into one redraw.
        while let Ok(message) = ui_rx.try_recv() {
            apply_message(app, worker, message);
            if app.exit_requested {
                break;
            }
        }
        if app.exit_requested {
            return Ok(());
        }

        terminal_guard
            .terminal_mut()
            .draw(|frame| ui::draw(frame, app))?;
    }
}

fn apply_message(app: &mut App, worker: &mut Worker, message: UiMessage) {
    match message {
        UiMessage::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => match app.screen {
            Screen::Welcome => handle_welcome_key(app, worker, key),
            Screen::Run => handle_run_key(app, worker, key),
        },
        UiMessage::Input(_) => {}
        UiMessage::Status(result) => {
            let _ = app.gate.resolve(result);
        }
        UiMessage::Selection(mode, result) => {
            // A rejection keeps the user on the menu with the reason shown.
            app.selecting = None;
            match interpret(mode, result, &app.locale) {
                Selection::Accepted(mode) => start_run(app, worker, mode),
                Selection::Rejected { reason, .. } => app.notice = Some(reason),
            }
        }
        // Deliveries and completions carry their run id; stale ones are ignored.
        UiMessage::Channel(run, payload) => {
            if app.orchestrator.handle_message(run, &payload) {
                app.clamp_alert_index();
            }
        }
        UiMessage::RunFinished(run, result) => {
            app.orchestrator.complete(run, result);
        }
    }
    // A violation or dismissal can end a run while its engine still works.
    worker.settle(&app.orchestrator);
}

fn handle_welcome_key(app: &mut App, worker: &Worker, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.exit_requested = true,
        KeyCode::Up => {
            app.menu_index = app.menu_index.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.menu_index + 1 < App::menu_items().len() {
                app.menu_index += 1;
            }
        }
        KeyCode::Enter => {
            // Disabled entries ignore Enter; one selection call at a time.
            let item = app.selected_menu();
            if !app.menu_enabled(item) {
                return;
            }
            match item {
                MenuItem::Quit => app.exit_requested = true,
                MenuItem::Mode(mode) => {
                    app.notice = None;
                    app.selecting = Some(mode);
                    worker.select_mode(mode);
                }
            }
        }
        _ => {}
    }
}

fn start_run(app: &mut App, worker: &mut Worker, mode: InstallerMode) {
    match worker.start_run(&mut app.orchestrator, mode) {
        Ok(run) => {
            info!(%mode, run = run.get(), "run screen opened");
            app.screen = Screen::Run;
            app.alert_index = 0;
            app.action_index = 0;
        }
        Err(err) => warn!(%err, "run not started"),
    }
}

fn handle_run_key(app: &mut App, worker: &Worker, key: KeyEvent) {
    // While the engine works only the alert list is interactive; there is
    // no cancel.
    if app.orchestrator.is_running() {
        match key.code {
            KeyCode::Up => app.alert_index = app.alert_index.saturating_sub(1),
            KeyCode::Down => {
                app.alert_index += 1;
                app.clamp_alert_index();
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(id) = app.selected_alert() {
                    app.orchestrator.dismiss_alert(id);
                    app.clamp_alert_index();
                }
            }
            _ => {}
        }
        return;
    }

    // Terminal state: keys drive the resolution dialog's buttons.
    let count = app.resolution().actions().len();
    match key.code {
        KeyCode::Left => app.action_index = app.action_index.saturating_sub(1),
        KeyCode::Right | KeyCode::Tab => {
            if app.action_index + 1 < count {
                app.action_index += 1;
            }
        }
        KeyCode::Enter => {
            // Nothing to resolve, e.g. after a teardown; go back to the menu.
            let Some(action) = app.selected_action() else {
                app.back_to_menu();
                return;
            };
            let mut host = TuiHost {
                worker,
                exit: false,
            };
            if let Err(err) = perform(action, &mut app.orchestrator, &mut host) {
                error!(%err, "resolver action rejected");
                return;
            }
            // Exit ends the loop; dismiss has returned the orchestrator to Idle;
            // opening the log folder keeps the dialog up.
            if host.exit {
                app.exit_requested = true;
            } else if app.orchestrator.status() == &RunStatus::Idle {
                app.back_to_menu();
            }
        }
        _ => {}
    }
}

fn spawn_input_thread(ui_tx: mpsc::Sender<UiMessage>) {
    // Forward blocking terminal events to the UI thread; exit on channel close.
    thread::spawn(move || {
        while let Ok(event) = event::read() {
            if ui_tx.send(UiMessage::Input(event)).is_err() {
                break;
            }
        }
    });
}
