//! Engine adapter for an external engine executable.
//!
//! `status` and `select <mode>` print one JSON document on stdout. `run <mode>`
//! prints one installer event per line and signals the outcome through its
//! exit status, with the failure reason on the last stderr line.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::channel::EventEmitter;
use crate::model::{InstallerMode, ModeResult, TitleStatus};

use super::{EngineError, InstallationEngine};

pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
    log_dir: PathBuf,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>, log_dir: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            log_dir,
        }
    }

    fn command(&self, subcommand: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .args(subcommand)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }

    async fn query<T: DeserializeOwned>(&self, subcommand: &[&str]) -> Result<T, EngineError> {
        let label = subcommand.join(" ");
        let output = self
            .command(subcommand)
            .output()
            .await
            .map_err(|err| EngineError::Spawn(format!("{}: {}", self.program, err)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Failed(failure_message(
                &stderr,
                &output.status.to_string(),
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(command = %label, "engine query completed");
        serde_json::from_str(stdout.trim())
            .map_err(|err| EngineError::Protocol(format!("{label}: {err}")))
    }
}

#[async_trait]
impl InstallationEngine for ProcessEngine {
    async fn initialize_title(&self) -> Result<TitleStatus, EngineError> {
        self.query(&["status"]).await
    }

    async fn select_mode(&self, mode: InstallerMode) -> Result<ModeResult, EngineError> {
        self.query(&["select", mode.as_str()]).await
    }

    async fn run_installer(
        &self,
        mode: InstallerMode,
        events: EventEmitter,
    ) -> Result<(), EngineError> {
        let mut child = self
            .command(&["run", mode.as_str()])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| EngineError::Spawn(format!("{}: {}", self.program, err)))?;
        info!(%mode, program = %self.program, "engine run started");

        let stderr_task = child
            .stderr
            .take()
            .map(|stream| tokio::spawn(collect_stderr(stream)));

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if !line.trim().is_empty() {
                            events.emit_raw(&line);
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!(%err, "failed to read engine output");
                        break;
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|err| EngineError::Spawn(format!("{}: {}", self.program, err)))?;
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if status.success() {
            info!(%mode, "engine run completed");
            Ok(())
        } else {
            Err(EngineError::Failed(failure_message(
                &stderr,
                &status.to_string(),
            )))
        }
    }

    async fn open_log_folder(&self) {
        prepare_log_dir(&self.log_dir);
        open_path(&self.log_dir).await;
    }
}

async fn collect_stderr(stream: impl AsyncRead + Unpin) -> String {
    let mut collected = String::new();
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(line = %line, "engine stderr");
        collected.push_str(&line);
        collected.push('\n');
    }
    collected
}

/// Create the log folder if the engine has not written one yet.
fn prepare_log_dir(dir: &Path) {
    if let Err(err) = std::fs::create_dir_all(dir) {
        warn!(%err, path = %dir.display(), "failed to create log folder");
    }
}

/// Last non-empty stderr line, or a generic exit description.
fn failure_message(stderr: &str, status: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("engine exited with {status}"))
}

pub(crate) async fn open_path(path: &Path) {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let result = Command::new(opener)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match result {
        Ok(status) if status.success() => {
            debug!(path = %path.display(), "opened log folder");
        }
        Ok(status) => warn!(%status, opener, "log folder opener exited with failure"),
        Err(err) => warn!(%err, opener, "failed to open log folder"),
    }
}
