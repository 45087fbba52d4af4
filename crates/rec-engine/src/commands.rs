//! Engine subcommands.
//!
//! Every command reports to `out` through sentinel lines (`REC_*`) plus
//! `Pid:`, `Output:` and `Recording saved:` detail lines. Errors are
//! returned and printed as `ERR_*` by the caller.

use crate::{
    EngineError, EngineResult, StartOpts, StateFiles,
    ffmpeg::{self, Backend, CaptureSpec, Crop},
    process::{self, Sig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use chrono::Local;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Time ffmpeg gets to fail before a start counts as successful.
pub const STARTUP_CHECK: Duration = Duration::from_millis(400);
/// How long `stop` waits for ffmpeg to finalize and exit.
pub const EXIT_WAIT: Duration = Duration::from_secs(5);
/// How long `stop` waits for the finalized file to become non-empty.
pub const FILE_WAIT: Duration = Duration::from_secs(3);
const POLL: Duration = Duration::from_millis(100);
const LOG_TAIL_BYTES: usize = 4096;

/// One engine invocation.
#[derive(Debug, Clone)]
pub struct Engine {
    state: StateFiles,
    ffmpeg: PathBuf,
    backend: Backend,
}

impl Engine {
    /// Engine keeping its state in `state` and capturing with `ffmpeg`.
    pub fn new(state: StateFiles, ffmpeg: impl Into<PathBuf>, backend: Backend) -> Self {
        Self {
            state,
            ffmpeg: ffmpeg.into(),
            backend,
        }
    }

    /// Pid of a live capture. Stale state from a dead one is cleared.
    fn live_pid(&self) -> EngineResult<Option<i32>> {
        match self.state.read_pid() {
            Some(pid) if process::is_alive(pid) => Ok(Some(pid)),
            Some(pid) => {
                info!(pid, "Clearing state of a capture that is gone");
                self.state.clear()?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    #[track_caller]
    fn require_live_pid(&self) -> EngineResult<i32> {
        let location = ErrorLocation::from(Location::caller());
        self.live_pid()?
            .ok_or(EngineError::NotRecording { location })
    }

    /// Launch ffmpeg in the background and record its pid.
    #[instrument(skip(self, out))]
    pub fn start(&self, opts: &StartOpts, out: &mut impl Write) -> EngineResult<()> {
        if let Some(pid) = self.live_pid()? {
            return Err(EngineError::AlreadyRecording {
                pid,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let crop = Crop::from_opts(opts)?;
        let device = match &opts.device {
            Some(device) => device.clone(),
            None => self.detect_device()?,
        };

        let output_dir = opts
            .output_dir
            .clone()
            .unwrap_or_else(ffmpeg::default_output_dir);
        fs::create_dir_all(&output_dir)?;
        let output = output_dir.join(ffmpeg::output_file_name(Local::now()));

        let capture = CaptureSpec {
            backend: self.backend,
            device,
            framerate: opts.framerate,
            preset: opts.preset.clone(),
            crf: opts.crf,
            crop,
            output: output.clone(),
        };

        let log = self.state.open_log("start")?;
        let mut child = self.spawn_capture(&capture, log)?;
        let pid = i32::try_from(child.id()).map_err(|_| EngineError::FfmpegFailed {
            reason: format!("pid {} out of range", child.id()),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.state.write(pid, &output)?;

        thread::sleep(STARTUP_CHECK);
        if let Some(status) = child.try_wait()? {
            warn!(pid, %status, "ffmpeg exited during startup");
            self.state.clear()?;
            let tail = self.state.log_tail(LOG_TAIL_BYTES);
            return Err(ffmpeg::classify_failure(&tail, &self.state.log_file()));
        }

        info!(pid, output = ?output, "Capture started");
        // Details first: a reader may stop at the sentinel.
        writeln!(out, "Pid: {}", pid)?;
        writeln!(out, "Output: {}", output.display())?;
        writeln!(out, "REC_STARTED")?;
        Ok(())
    }

    fn spawn_capture(&self, capture: &CaptureSpec, log: fs::File) -> EngineResult<Child> {
        let mut command = Command::new(&self.ffmpeg);
        command
            .args(capture.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log));

        // Own process group, so a terminal ^C aimed at the caller does not
        // cut the recording short.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        debug!(ffmpeg = ?self.ffmpeg, args = ?capture.args(), "Spawning ffmpeg");
        command.spawn().map_err(|e| EngineError::FfmpegFailed {
            reason: format!("failed to run {:?}: {}", self.ffmpeg, e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn detect_device(&self) -> EngineResult<String> {
        match self.backend {
            Backend::AvFoundation => {
                let devices = ffmpeg::parse_video_devices(&self.list_devices()?);
                ffmpeg::screen_device(&devices)
                    .map(|index| index.to_string())
                    .ok_or_else(|| EngineError::NoScreenDevice {
                        reason: "avfoundation lists no screen".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })
            }
            Backend::X11Grab => std::env::var("DISPLAY")
                .ok()
                .filter(|d| !d.is_empty())
                .ok_or_else(|| EngineError::NoScreenDevice {
                    reason: "DISPLAY is not set".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }),
        }
    }

    /// ffmpeg's device listing (printed on stderr).
    fn list_devices(&self) -> EngineResult<String> {
        let output = Command::new(&self.ffmpeg)
            .args(self.backend.list_devices_args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| EngineError::FfmpegFailed {
                reason: format!("failed to run {:?}: {}", self.ffmpeg, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut listing = String::from_utf8_lossy(&output.stderr).into_owned();
        listing.push_str(&String::from_utf8_lossy(&output.stdout));
        Ok(listing)
    }

    /// Interrupt ffmpeg, wait for it to finalize and report the file.
    #[instrument(skip(self, out))]
    pub fn stop(&self, out: &mut impl Write) -> EngineResult<()> {
        let pid = self.require_live_pid()?;
        let output = self.state.read_output();

        // A paused ffmpeg cannot act on SIGINT.
        process::send(pid, Sig::Cont)?;
        process::send(pid, Sig::Interrupt)?;

        if !wait_until(EXIT_WAIT, || !process::is_alive(pid)) {
            warn!(pid, "ffmpeg still running after interrupt");
        }
        self.state.clear()?;

        let Some(output) = output else {
            return Err(EngineError::FfmpegFailed {
                reason: "output path was not recorded".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if !wait_until(FILE_WAIT, || has_content(&output)) {
            return Err(EngineError::FfmpegFailed {
                reason: format!("{} is missing or empty", output.display()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(pid, output = ?output, "Capture stopped");
        writeln!(out, "REC_STOPPED")?;
        writeln!(out, "Recording saved: {}", output.display())?;
        Ok(())
    }

    /// Freeze the running capture.
    #[instrument(skip(self, out))]
    pub fn pause(&self, out: &mut impl Write) -> EngineResult<()> {
        let pid = self.require_live_pid()?;
        process::send(pid, Sig::Stop)?;
        writeln!(out, "Paused pid {}", pid)?;
        Ok(())
    }

    /// Unfreeze the running capture.
    #[instrument(skip(self, out))]
    pub fn resume(&self, out: &mut impl Write) -> EngineResult<()> {
        let pid = self.require_live_pid()?;
        process::send(pid, Sig::Cont)?;
        writeln!(out, "Resumed pid {}", pid)?;
        Ok(())
    }

    /// `REC_RECORDING` with pid and output, or `REC_IDLE`.
    #[instrument(skip(self, out))]
    pub fn status(&self, out: &mut impl Write) -> EngineResult<()> {
        match self.live_pid()? {
            Some(pid) => {
                writeln!(out, "REC_RECORDING")?;
                writeln!(out, "Pid: {}", pid)?;
                if let Some(output) = self.state.read_output() {
                    writeln!(out, "Output: {}", output.display())?;
                }
            }
            None => writeln!(out, "REC_IDLE")?,
        }
        Ok(())
    }

    /// One line per capture device.
    #[instrument(skip(self, out))]
    pub fn devices(&self, out: &mut impl Write) -> EngineResult<()> {
        match self.backend {
            Backend::AvFoundation => {
                let devices = ffmpeg::parse_video_devices(&self.list_devices()?);
                if devices.is_empty() {
                    return Err(EngineError::NoScreenDevice {
                        reason: "avfoundation lists no video devices".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                for device in devices {
                    writeln!(out, "[{}] {}", device.index, device.name)?;
                }
            }
            Backend::X11Grab => {
                let display = self.detect_device()?;
                writeln!(out, "[{}] X11 display", display)?;
            }
        }
        Ok(())
    }
}

/// Poll `done` until it holds or `limit` passes.
fn wait_until(limit: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    loop {
        if done() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(POLL);
    }
}

fn has_content(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
