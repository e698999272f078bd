//! Configuration loading, engine wiring and tracing setup.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use mm_installer_core::{
    Config, DemoEngine, InstallationEngine, Locale, ProcessEngine, TitleStatus,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::Args;

const LOG_FILE: &str = "installer.log";

pub(super) struct Settings {
    pub config: Config,
    /// Directory relative config paths resolve against.
    pub base_dir: PathBuf,
    pub log_dir: PathBuf,
}

pub(super) enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

pub(super) fn load_config(args: &Args) -> Result<Settings> {
    let (config, base_dir) = match args.config.as_ref() {
        Some(path) => {
            let config = Config::load_from_path(path).context("read config from path")?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (config, base)
        }
        None => {
            let config = Config::load_default().context("read default config")?;
            let base = Config::default_config_dir().context("resolve config directory")?;
            (config, base)
        }
    };
    let log_dir = config
        .log_dir(&base_dir)
        .context("resolve log directory")?;
    Ok(Settings {
        config,
        base_dir,
        log_dir,
    })
}

pub(super) fn init_tracing(config: &Config, target: LogTarget<'_>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            config
                .general
                .log_level
                .clone()
                .unwrap_or_else(|| "info".to_string()),
        )
    });
    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File(dir) => {
            // The alternate screen owns stdout, so logs go to a file instead.
            fs::create_dir_all(dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
            let path = dir.join(LOG_FILE);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }
    Ok(())
}

pub(super) fn load_locale(settings: &Settings) -> Result<Locale> {
    let Some(path) = settings.config.locale_path(&settings.base_dir) else {
        return Ok(Locale::english());
    };
    info!(path = %path.display(), "loading locale");
    Locale::load_from_path(&path).with_context(|| format!("read locale from {}", path.display()))
}

pub(super) fn build_engine(
    args: &Args,
    settings: &Settings,
) -> Result<Arc<dyn InstallationEngine>> {
    if args.demo {
        info!(
            installed = args.demo_installed,
            failure = ?args.demo_failure,
            "using the demo engine"
        );
        let mut engine = DemoEngine::new(settings.log_dir.clone())
            .with_launch_mod_loader(!args.demo_skip_launch);
        if args.demo_installed {
            engine = engine.with_status(TitleStatus {
                can_install: false,
                can_update: true,
            });
        }
        if let Some(step) = args.demo_step_ms {
            engine = engine.with_step_delay(Duration::from_millis(step));
        }
        if let Some(message) = &args.demo_failure {
            engine = engine.with_failure(message.clone());
        }
        return Ok(Arc::new(engine));
    }
    let command = settings
        .config
        .engine_command(&settings.base_dir)
        .ok_or_else(|| anyhow!("no engine configured; set [engine].command or pass --demo"))?;
    info!(%command, args = ?settings.config.engine.args, "using process engine");
    Ok(Arc::new(ProcessEngine::new(
        command,
        settings.config.engine.args.clone(),
        settings.log_dir.clone(),
    )))
}
