use crate::{
    CoreError, CoreResult,
    capture::{
        AnchorRecord, ControlSignal, EngineFailure, EngineMessage, EngineRunner, EngineSubcommand,
        ProcessSignaller, RecoveryAnchors, StartArgs, engine::log_message,
    },
};

use std::{panic::Location, path::PathBuf, time::Duration};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Default time allowed for the engine to confirm startup.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(10);
/// Default time allowed for a short engine subcommand.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(15);
/// Default time allowed for the capture process to exit after SIGINT.
pub const DEFAULT_EXIT_TIMEOUT: Duration = Duration::from_secs(5);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How pause and resume reach the capture process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStrategy {
    /// SIGSTOP / SIGCONT straight to the capture pid.
    #[default]
    Signal,
    /// The engine's own `pause` / `resume` subcommands.
    Subcommand,
}

/// Reference to a running capture process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    /// Pid of the process doing the capture.
    pub pid: i32,
    /// Output file announced by the engine, when known.
    pub output_path: Option<PathBuf>,
    /// Rebuilt from recovery anchors rather than spawned by this controller.
    pub recovered: bool,
}

impl From<AnchorRecord> for ProcessHandle {
    fn from(record: AnchorRecord) -> Self {
        Self {
            pid: record.pid,
            output_path: record.output_path,
            recovered: true,
        }
    }
}

/// What `terminate` learned while stopping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopOutcome {
    /// Path from the engine's `Recording saved:` announcement.
    pub saved_path: Option<PathBuf>,
}

/// Timeouts and strategy for a [`CaptureProcessManager`].
#[derive(Debug, Clone, Copy)]
pub struct ManagerSettings {
    /// Pause/resume delivery.
    pub strategy: ControlStrategy,
    /// Engine start confirmation timeout.
    pub start_timeout: Duration,
    /// Short subcommand timeout.
    pub command_timeout: Duration,
    /// Wait for process exit after SIGINT.
    pub exit_timeout: Duration,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            strategy: ControlStrategy::default(),
            start_timeout: DEFAULT_START_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            exit_timeout: DEFAULT_EXIT_TIMEOUT,
        }
    }
}

/// Spawns, signals and terminates the capture engine.
pub struct CaptureProcessManager<E: EngineRunner, S: ProcessSignaller> {
    engine: E,
    signaller: S,
    anchors: RecoveryAnchors,
    settings: ManagerSettings,
}

impl<E: EngineRunner, S: ProcessSignaller> CaptureProcessManager<E, S> {
    /// Manager driving `engine`, persisting anchors in `anchors`.
    pub fn new(engine: E, signaller: S, anchors: RecoveryAnchors, settings: ManagerSettings) -> Self {
        Self {
            engine,
            signaller,
            anchors,
            settings,
        }
    }

    /// Recovery anchors in use.
    pub fn anchors(&self) -> &RecoveryAnchors {
        &self.anchors
    }

    /// Start the capture engine.
    ///
    /// Anchors are on disk before this returns `Ok`.
    ///
    /// # Errors
    ///
    /// `ExecutableNotFound`, `PermissionDenied`, `NoDeviceFound`,
    /// `AlreadyRecording` or `SpawnFailed` as reported by the engine.
    #[instrument(skip(self))]
    pub async fn spawn(&self, args: &StartArgs) -> CoreResult<ProcessHandle> {
        let reply = self.engine.start(args, self.settings.start_timeout).await?;

        let mut started = false;
        let mut pid = None;
        let mut output_path = None;

        for message in &reply.messages {
            match message {
                EngineMessage::Failure(failure) => {
                    warn!(?failure, "Engine refused to start");
                    return Err(failure.into_error());
                }
                EngineMessage::Started => started = true,
                EngineMessage::Pid(p) => pid = Some(*p),
                EngineMessage::Output(p) | EngineMessage::Saved(p) => output_path = Some(p.clone()),
                other => log_message(other),
            }
        }

        if !started {
            return Err(CoreError::SpawnFailed {
                reason: "engine exited without confirming start".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let pid = pid
            .or_else(|| {
                reply
                    .engine_pid
                    .and_then(|p| i32::try_from(p).ok())
                    .filter(|p| *p > 0)
            })
            .ok_or_else(|| CoreError::SpawnFailed {
                reason: "no capture pid available".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.anchors.write(pid, output_path.as_deref())?;

        info!(pid, output_path = ?output_path, "Capture process started");

        Ok(ProcessHandle {
            pid,
            output_path,
            recovered: false,
        })
    }

    /// Freeze encoding without ending the process.
    #[instrument(skip(self))]
    pub async fn pause(&self, handle: &ProcessHandle) -> CoreResult<()> {
        self.control(handle, ControlSignal::Pause, EngineSubcommand::Pause)
            .await
    }

    /// Unfreeze encoding.
    #[instrument(skip(self))]
    pub async fn resume(&self, handle: &ProcessHandle) -> CoreResult<()> {
        self.control(handle, ControlSignal::Resume, EngineSubcommand::Resume)
            .await
    }

    async fn control(
        &self,
        handle: &ProcessHandle,
        signal: ControlSignal,
        subcommand: EngineSubcommand,
    ) -> CoreResult<()> {
        match self.settings.strategy {
            ControlStrategy::Signal => self.signaller.signal(handle.pid, signal),
            ControlStrategy::Subcommand => {
                let reply = self
                    .engine
                    .run(subcommand, self.settings.command_timeout)
                    .await
                    .map_err(|e| CoreError::SignalDeliveryFailed {
                        pid: handle.pid,
                        reason: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?;

                match reply.failure() {
                    Some(failure) => Err(CoreError::SignalDeliveryFailed {
                        pid: handle.pid,
                        reason: format!("engine {} reported {:?}", subcommand.as_str(), failure),
                        location: ErrorLocation::from(Location::caller()),
                    }),
                    None => Ok(()),
                }
            }
        }
    }

    /// Gracefully stop the capture and wait for it to finish.
    ///
    /// Asks the engine to stop first; if the engine does not know the
    /// process (e.g. it was restarted), interrupts the pid directly and
    /// waits for it to exit. Anchors are removed on success only, so a
    /// failed stop can be retried through them.
    #[instrument(skip(self))]
    pub async fn terminate(&self, handle: &ProcessHandle) -> CoreResult<StopOutcome> {
        let mut outcome = StopOutcome::default();
        let mut engine_stopped = false;

        match self
            .engine
            .run(EngineSubcommand::Stop, self.settings.command_timeout)
            .await
        {
            Ok(reply) => {
                for message in &reply.messages {
                    match message {
                        EngineMessage::Stopped => engine_stopped = true,
                        EngineMessage::Saved(p) => {
                            engine_stopped = true;
                            outcome.saved_path = Some(p.clone());
                        }
                        EngineMessage::Failure(failure) => {
                            warn!(?failure, "Engine stop reported a failure")
                        }
                        other => log_message(other),
                    }
                }
                if reply.failure() == Some(EngineFailure::FfmpegFailed) {
                    engine_stopped = false;
                }
            }
            Err(e) => warn!(error = %e, "Engine stop command failed, falling back to signal"),
        }

        if !engine_stopped || self.signaller.is_alive(handle.pid) {
            self.interrupt_and_wait(handle.pid).await?;
        }

        self.anchors.clear()?;

        info!(pid = handle.pid, saved_path = ?outcome.saved_path, "Capture process stopped");

        Ok(outcome)
    }

    async fn interrupt_and_wait(&self, pid: i32) -> CoreResult<()> {
        if !self.signaller.is_alive(pid) {
            debug!(pid, "Capture process already gone");
            return Ok(());
        }

        self.signaller.signal(pid, ControlSignal::Interrupt)?;

        let deadline = tokio::time::Instant::now() + self.settings.exit_timeout;
        while self.signaller.is_alive(pid) {
            if tokio::time::Instant::now() >= deadline {
                return Err(CoreError::SignalDeliveryFailed {
                    pid,
                    reason: format!(
                        "process still running {:?} after interrupt",
                        self.settings.exit_timeout
                    ),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
        }

        debug!(pid, "Capture process exited after interrupt");
        Ok(())
    }

    /// Whether `pid` is still running.
    pub fn is_alive(&self, pid: i32) -> bool {
        self.signaller.is_alive(pid)
    }

    /// Handle rebuilt from leftover anchors, if any.
    pub fn recover(&self) -> Option<ProcessHandle> {
        self.anchors.read().map(ProcessHandle::from)
    }

    /// Delete the anchors unconditionally.
    #[instrument(skip(self))]
    pub fn force_clear(&self) -> CoreResult<()> {
        warn!(anchors = ?self.anchors.pid_file(), "Force-clearing recovery anchors");
        self.anchors.clear()
    }

    /// Ask the engine whether it is recording.
    #[instrument(skip(self))]
    pub async fn status(&self) -> CoreResult<bool> {
        let reply = self
            .engine
            .run(EngineSubcommand::Status, self.settings.command_timeout)
            .await?;

        if reply.contains(&EngineMessage::StatusRecording) {
            return Ok(true);
        }
        if reply.contains(&EngineMessage::StatusIdle) {
            return Ok(false);
        }
        Err(CoreError::SpawnFailed {
            reason: "engine status reply carried no status token".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Capture devices as listed by the engine.
    #[instrument(skip(self))]
    pub async fn devices(&self) -> CoreResult<Vec<String>> {
        let reply = self
            .engine
            .run(EngineSubcommand::Devices, self.settings.command_timeout)
            .await?;

        if let Some(failure) = reply.failure() {
            return Err(failure.into_error());
        }

        Ok(reply
            .messages
            .into_iter()
            .filter_map(|m| match m {
                EngineMessage::Info(line) | EngineMessage::Warning(line) => Some(line),
                _ => None,
            })
            .collect())
    }
}
