//! Per-directory recording metadata.
//!
//! A single JSON document holding an array of records, rewritten whole
//! on every change (temp file + rename). A missing or unparsable document
//! reads as empty. Concurrent writers are not supported; the controller
//! serializes access.

use crate::{
    CoreError, CoreResult, capture::write_atomic, metadata::RecordingRecord,
    session::CaptureMode,
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Utc;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// File name of the metadata document inside an output directory.
pub const METADATA_FILE: &str = "recordings.json";

/// Result of [`MetadataStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new record was written.
    Inserted,
    /// A record for the path already existed; nothing changed.
    AlreadyPresent,
}

/// Recording records for one output directory.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    file: PathBuf,
}

impl MetadataStore {
    /// Store backed by `dir/recordings.json`.
    pub fn for_directory(dir: impl AsRef<Path>) -> Self {
        Self {
            file: dir.as_ref().join(METADATA_FILE),
        }
    }

    /// Path of the JSON document.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Record a finished recording.
    ///
    /// # Errors
    ///
    /// `OutputFileMissing` if `path` does not exist, `MetadataWriteFailed`
    /// if the document cannot be rewritten.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn add(
        &self,
        path: &Path,
        mode: CaptureMode,
        duration: Option<Duration>,
        title: Option<String>,
    ) -> CoreResult<AddOutcome> {
        if !path.exists() {
            return Err(CoreError::OutputFileMissing {
                path: Some(path.to_path_buf()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut records = self.load();
        if records.iter().any(|r| r.path == path) {
            debug!(path = ?path, "Recording already recorded");
            return Ok(AddOutcome::AlreadyPresent);
        }

        records.push(RecordingRecord {
            path: path.to_path_buf(),
            timestamp: Utc::now(),
            mode,
            duration_secs: duration.map(|d| d.as_secs()),
            title,
        });
        self.save(&records)?;

        info!(path = ?path, %mode, "Recording metadata added");

        Ok(AddOutcome::Inserted)
    }

    /// Records whose file still exists, newest first.
    pub fn list(&self) -> Vec<RecordingRecord> {
        let mut records: Vec<_> = self
            .load()
            .into_iter()
            .filter(|r| r.path.exists())
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Record for `path`, if any.
    pub fn get(&self, path: &Path) -> Option<RecordingRecord> {
        self.load().into_iter().find(|r| r.path == path)
    }

    /// Delete the recording file and its record.
    ///
    /// # Errors
    ///
    /// `OutputFileMissing` if the file is already gone (the inconsistency
    /// is surfaced rather than hidden), `Io` if it cannot be removed,
    /// `MetadataWriteFailed` if the document cannot be rewritten.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete(&self, path: &Path) -> CoreResult<()> {
        if !path.exists() {
            return Err(CoreError::OutputFileMissing {
                path: Some(path.to_path_buf()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        fs::remove_file(path)?;

        let mut records = self.load();
        let before = records.len();
        records.retain(|r| r.path != path);
        if records.len() != before {
            self.save(&records)?;
        }

        info!(path = ?path, "Recording deleted");

        Ok(())
    }

    fn load(&self) -> Vec<RecordingRecord> {
        let contents = match fs::read_to_string(&self.file) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(file = ?self.file, error = %e, "Unreadable metadata, treating as empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(file = ?self.file, error = %e, "Unparsable metadata, treating as empty");
            Vec::new()
        })
    }

    #[track_caller]
    fn save(&self, records: &[RecordingRecord]) -> CoreResult<()> {
        let contents =
            serde_json::to_string_pretty(records).map_err(|e| CoreError::MetadataWriteFailed {
                reason: format!("Failed to serialize metadata: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(|e| CoreError::MetadataWriteFailed {
                reason: format!("Failed to create {:?}: {}", parent, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        write_atomic(&self.file, &contents).map_err(|e| CoreError::MetadataWriteFailed {
            reason: format!("Failed to write {:?}: {}", self.file, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(file = ?self.file, count = records.len(), "Metadata saved (atomic write)");

        Ok(())
    }
}
