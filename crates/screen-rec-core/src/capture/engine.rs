use crate::{
    CoreError, CoreResult,
    capture::EngineMessage,
    geometry::Rect,
};

use std::{
    future::Future,
    io::ErrorKind,
    panic::Location,
    path::PathBuf,
    process::Stdio,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, Command},
    sync::mpsc,
};
use tracing::{debug, info, instrument, warn};

/// How long a confirmed start waits for trailing `Pid:` / `Output:` lines.
const START_DETAIL_WAIT: Duration = Duration::from_millis(500);

/// Arguments of `<engine> start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartArgs {
    /// Directory the engine writes into (engine default when `None`).
    pub output_dir: Option<PathBuf>,
    /// Crop rectangle for Window and Region captures.
    pub crop: Option<Rect>,
}

impl StartArgs {
    /// Command-line form, starting with the `start` subcommand.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["start".to_string()];

        if let Some(dir) = &self.output_dir {
            args.push("--output-dir".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }

        if let Some(rect) = self.crop {
            args.extend([
                "--x".to_string(),
                rect.x.to_string(),
                "--y".to_string(),
                rect.y.to_string(),
                "--width".to_string(),
                rect.width.to_string(),
                "--height".to_string(),
                rect.height.to_string(),
            ]);
        }

        args
    }
}

/// Engine subcommands other than `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSubcommand {
    /// `<engine> stop`
    Stop,
    /// `<engine> pause`
    Pause,
    /// `<engine> resume`
    Resume,
    /// `<engine> status`
    Status,
    /// `<engine> devices`
    Devices,
}

impl EngineSubcommand {
    /// Subcommand as passed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Status => "status",
            Self::Devices => "devices",
        }
    }
}

/// Messages produced by one engine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineReply {
    /// Classified output lines, stdout and stderr interleaved in arrival order.
    pub messages: Vec<EngineMessage>,
    /// Pid of the spawned engine process itself.
    pub engine_pid: Option<u32>,
}

impl EngineReply {
    /// First `ERR_*` sentinel, if any.
    pub fn failure(&self) -> Option<crate::capture::EngineFailure> {
        self.messages.iter().find_map(|m| match m {
            EngineMessage::Failure(f) => Some(*f),
            _ => None,
        })
    }

    /// Whether both the capture pid and the output path were announced.
    pub fn has_start_details(&self) -> bool {
        self.messages.iter().any(|m| matches!(m, EngineMessage::Pid(_)))
            && self.messages.iter().any(|m| matches!(m, EngineMessage::Output(_)))
    }

    /// Whether `message` occurs in the reply.
    pub fn contains(&self, message: &EngineMessage) -> bool {
        self.messages.iter().any(|m| m == message)
    }
}

/// Runs capture engine commands.
pub trait EngineRunner: Send + Sync {
    /// Run `<engine> start ...` until the start resolves (`REC_STARTED`, an
    /// `ERR_*` sentinel, or engine exit) or `timeout` elapses.
    fn start(
        &self,
        args: &StartArgs,
        timeout: Duration,
    ) -> impl Future<Output = CoreResult<EngineReply>> + Send;

    /// Run a short-lived subcommand to completion.
    fn run(
        &self,
        subcommand: EngineSubcommand,
        timeout: Duration,
    ) -> impl Future<Output = CoreResult<EngineReply>> + Send;
}

/// [`EngineRunner`] backed by an executable on disk.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
}

impl CommandEngine {
    /// Engine invoked as `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program path.
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    #[track_caller]
    fn spawn_error(&self, e: std::io::Error) -> CoreError {
        let location = ErrorLocation::from(Location::caller());
        match e.kind() {
            ErrorKind::NotFound => CoreError::ExecutableNotFound {
                program: self.program.clone(),
                location,
            },
            _ => CoreError::SpawnFailed {
                reason: format!("failed to run {:?}: {}", self.program, e),
                location,
            },
        }
    }
}

impl EngineRunner for CommandEngine {
    #[instrument(skip(self), fields(program = ?self.program))]
    async fn start(&self, args: &StartArgs, timeout: Duration) -> CoreResult<EngineReply> {
        let mut child = Command::new(&self.program)
            .args(args.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let engine_pid = child.id();
        let mut lines = forward_output(&mut child);
        let mut reply = EngineReply {
            messages: Vec::new(),
            engine_pid,
        };

        let resolved = tokio::time::timeout(timeout, async {
            while let Some(message) = lines.recv().await {
                let done = message.resolves_start();
                reply.messages.push(message);
                if done {
                    return true;
                }
            }
            false
        })
        .await;

        match resolved {
            Ok(true) => {
                debug!(?engine_pid, "Engine start resolved");
                if reply.contains(&EngineMessage::Started) {
                    // Detail lines may trail the sentinel.
                    let _ = tokio::time::timeout(START_DETAIL_WAIT, async {
                        while let Some(message) = lines.recv().await {
                            let detail = matches!(
                                message,
                                EngineMessage::Pid(_) | EngineMessage::Output(_)
                            );
                            reply.messages.push(message);
                            if detail && reply.has_start_details() {
                                break;
                            }
                        }
                    })
                    .await;
                }
            }
            Ok(false) => debug!(?engine_pid, "Engine output closed before start resolved"),
            Err(_) => {
                warn!(?engine_pid, timeout_ms = timeout.as_millis(), "Engine start timed out");
                let _ = child.start_kill();
                return Err(CoreError::SpawnFailed {
                    reason: format!("engine did not confirm start within {:?}", timeout),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        // A long-running engine keeps talking after startup; a wrapper that
        // daemonized the capture has already exited. Either way the rest of
        // its output is logged and the process is reaped off the loop.
        tokio::spawn(async move {
            while let Some(message) = lines.recv().await {
                log_message(&message);
            }
            match child.wait().await {
                Ok(status) => debug!(?engine_pid, %status, "Engine process exited"),
                Err(e) => warn!(?engine_pid, error = %e, "Failed to reap engine process"),
            }
        });

        Ok(reply)
    }

    #[instrument(skip(self), fields(program = ?self.program))]
    async fn run(&self, subcommand: EngineSubcommand, timeout: Duration) -> CoreResult<EngineReply> {
        let mut child = Command::new(&self.program)
            .arg(subcommand.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let engine_pid = child.id();
        let mut lines = forward_output(&mut child);
        let mut reply = EngineReply {
            messages: Vec::new(),
            engine_pid,
        };

        let finished = tokio::time::timeout(timeout, async {
            while let Some(message) = lines.recv().await {
                reply.messages.push(message);
            }
            child.wait().await
        })
        .await;

        match finished {
            Ok(Ok(status)) => {
                debug!(subcommand = subcommand.as_str(), %status, "Engine subcommand finished");
                Ok(reply)
            }
            Ok(Err(e)) => Err(CoreError::from(e)),
            Err(_) => Err(CoreError::SpawnFailed {
                reason: format!(
                    "engine {} did not finish within {:?}",
                    subcommand.as_str(),
                    timeout
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Log a message that arrived after nobody was waiting for it.
pub(crate) fn log_message(message: &EngineMessage) {
    match message {
        EngineMessage::Warning(line) => warn!(line = %line, "Engine stderr"),
        EngineMessage::Info(line) => info!(line = %line, "Engine output"),
        other => debug!(message = ?other, "Engine message"),
    }
}

/// Read stdout and stderr concurrently, classifying each line.
///
/// The channel closes once both streams reach EOF.
fn forward_output(child: &mut Child) -> mpsc::Receiver<EngineMessage> {
    let (tx, rx) = mpsc::channel(64);

    if let Some(stdout) = child.stdout.take() {
        let tx = tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(message) = EngineMessage::parse_stdout(&line)
                    && tx.send(message).await.is_err()
                {
                    break;
                }
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(message) = EngineMessage::parse_stderr(&line)
                    && tx.send(message).await.is_err()
                {
                    break;
                }
            }
        });
    }

    rx
}
