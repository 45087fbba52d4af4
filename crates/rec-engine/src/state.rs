//! On-disk engine state.
//!
//! Each engine invocation is a separate process, so the pid of the running
//! ffmpeg and its output path live in small files that `stop`, `pause`,
//! `resume` and `status` read back.

use crate::EngineResult;

use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::{debug, warn};

const PID_FILE: &str = "rec-engine.pid";
const OUTPUT_FILE: &str = "rec-engine.outpath";
const LOG_FILE: &str = "rec-engine.ffmpeg.log";
const STATE_DIR: &str = "rec-engine";

/// Pid, output-path and log files of the engine.
#[derive(Debug, Clone)]
pub struct StateFiles {
    dir: PathBuf,
}

impl StateFiles {
    /// State kept in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// State in the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join(STATE_DIR))
    }

    /// ffmpeg log file.
    pub fn log_file(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    fn pid_file(&self) -> PathBuf {
        self.dir.join(PID_FILE)
    }

    fn output_file(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILE)
    }

    /// Pid of the recorded capture. Unreadable or garbled files count as absent.
    pub fn read_pid(&self) -> Option<i32> {
        let text = fs::read_to_string(self.pid_file()).ok()?;
        match text.trim().parse() {
            Ok(pid) => Some(pid),
            Err(e) => {
                warn!(error = %e, "Ignoring garbled pid file");
                None
            }
        }
    }

    /// Output path of the recorded capture.
    pub fn read_output(&self) -> Option<PathBuf> {
        let text = fs::read_to_string(self.output_file()).ok()?;
        let path = text.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }

    /// Record a started capture.
    #[track_caller]
    pub fn write(&self, pid: i32, output: &Path) -> EngineResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.output_file(), output.to_string_lossy().as_bytes())?;
        fs::write(self.pid_file(), pid.to_string())?;
        debug!(pid, output = ?output, "Engine state written");
        Ok(())
    }

    /// Forget the capture. Missing files are fine.
    #[track_caller]
    pub fn clear(&self) -> EngineResult<()> {
        for path in [self.pid_file(), self.output_file()] {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = ?path, "Engine state removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Open the ffmpeg log for appending, headed by a timestamped marker.
    #[track_caller]
    pub fn open_log(&self, marker: &str) -> EngineResult<File> {
        fs::create_dir_all(&self.dir)?;
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_file())?;
        writeln!(log, "===== {} {} =====", marker, Local::now().to_rfc3339())?;
        Ok(log)
    }

    /// Last `max_bytes` of the log, lossily decoded.
    pub fn log_tail(&self, max_bytes: usize) -> String {
        let bytes = fs::read(self.log_file()).unwrap_or_default();
        let start = bytes.len().saturating_sub(max_bytes);
        String::from_utf8_lossy(&bytes[start..]).into_owned()
    }
}
