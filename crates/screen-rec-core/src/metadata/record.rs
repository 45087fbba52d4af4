use crate::session::CaptureMode;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finished recording. `path` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingRecord {
    /// Recording file.
    pub path: PathBuf,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
    /// Capture mode used.
    pub mode: CaptureMode,
    /// Recorded time in whole seconds, pauses excluded.
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    /// Generated title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
