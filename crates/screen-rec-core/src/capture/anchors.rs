//! Durable crash-recovery anchors.
//!
//! Two small text files: the capture pid and the expected output path.
//! They are written once at spawn, read at control time, and deleted at
//! clean stop. The output file is written before the pid file, so a pid
//! file on disk always means a complete anchor.

use crate::CoreResult;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, warn};

const PID_FILE: &str = "screen-rec.pid";
const OUTPUT_FILE: &str = "screen-rec.outpath";

/// Contents of the anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRecord {
    /// Pid of the capture process.
    pub pid: i32,
    /// Output file the process was told to write, when known.
    pub output_path: Option<PathBuf>,
}

/// Anchor files in one directory.
#[derive(Debug, Clone)]
pub struct RecoveryAnchors {
    dir: PathBuf,
}

impl RecoveryAnchors {
    /// Anchors stored in `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the pid file.
    pub fn pid_file(&self) -> PathBuf {
        self.dir.join(PID_FILE)
    }

    /// Path of the output-path file.
    pub fn output_file(&self) -> PathBuf {
        self.dir.join(OUTPUT_FILE)
    }

    /// Persist both anchors.
    #[instrument(skip(self))]
    pub fn write(&self, pid: i32, output_path: Option<&Path>) -> CoreResult<()> {
        fs::create_dir_all(&self.dir)?;

        let output = output_path
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        write_atomic(&self.output_file(), &output)?;
        write_atomic(&self.pid_file(), &pid.to_string())?;

        info!(pid, output_path = ?output_path, dir = ?self.dir, "Recovery anchors written");

        Ok(())
    }

    /// Read the anchors. `None` when absent or unreadable.
    pub fn read(&self) -> Option<AnchorRecord> {
        let pid_text = fs::read_to_string(self.pid_file()).ok()?;
        let pid = match pid_text.trim().parse::<i32>() {
            Ok(pid) => pid,
            Err(e) => {
                warn!(error = %e, contents = %pid_text.trim(), "Unparsable pid anchor");
                return None;
            }
        };

        let output_path = fs::read_to_string(self.output_file())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Some(AnchorRecord { pid, output_path })
    }

    /// Whether a pid anchor exists.
    pub fn exists(&self) -> bool {
        self.pid_file().exists()
    }

    /// Remove both anchors. Missing files are not an error.
    #[instrument(skip(self))]
    pub fn clear(&self) -> CoreResult<()> {
        for path in [self.pid_file(), self.output_file()] {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = ?path, "Anchor removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Write to a temporary sibling, sync, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut temp_file = fs::File::create(&temp_path)?;
    temp_file.write_all(contents.as_bytes())?;
    temp_file.sync_all()?;

    fs::rename(&temp_path, path)
}
