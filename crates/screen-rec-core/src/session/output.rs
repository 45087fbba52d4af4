//! Locating the file a stopped capture produced.
//!
//! Process exit and file finalization are not synchronous, so the lookup
//! waits one grace delay before trusting what is (or is not) on disk. The
//! directory scan is a last resort used only when neither the engine's
//! announcement nor the recovery anchor names an existing file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use tracing::{debug, info, instrument, warn};

/// File extension the scan considers a recording.
pub const RECORDING_EXTENSION: &str = "mp4";

/// Resolve the output file of a stopped session.
///
/// Order: `announced` (engine `Recording saved:`), then `anchored` (path
/// written at spawn), then the newest recording in `dir` modified at or
/// after `since`.
#[instrument]
pub async fn locate_output(
    announced: Option<&Path>,
    anchored: Option<&Path>,
    dir: &Path,
    since: SystemTime,
    grace: Duration,
) -> Option<PathBuf> {
    if let Some(path) = announced.filter(|p| is_finalized(p)) {
        debug!(path = ?path, "Output announced by engine");
        return Some(path.to_path_buf());
    }

    tokio::time::sleep(grace).await;

    for path in [announced, anchored].into_iter().flatten() {
        if is_finalized(path) {
            debug!(path = ?path, "Output found after grace delay");
            return Some(path.to_path_buf());
        }
    }

    let scanned = scan_latest_recording(dir, since);
    match &scanned {
        Some(path) => info!(path = ?path, "Output located by directory scan"),
        None => warn!(dir = ?dir, "No output file located"),
    }
    scanned
}

/// Most recently modified recording in `dir` whose mtime is not older than `since`.
pub fn scan_latest_recording(dir: &Path, since: SystemTime) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = ?dir, error = %e, "Cannot scan output directory");
            return None;
        }
    };

    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORDING_EXTENSION))
        })
        .filter_map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            (modified >= since).then_some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

fn is_finalized(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false)
}
