use screen_rec_core::{
    Calibration, CaptureMode, CellRect, OverlayStatus, RecordingRecord, StatusSnapshot,
};

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

/// Events written to the editor, one JSON object per stdout line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Controller status after a transition or on request.
    State(StatusSnapshot),
    /// Overlay text for the current tick.
    Overlay {
        /// Rendered line, e.g. `● REC 00:01:23`.
        text: String,
        /// Structured status.
        status: OverlayStatus,
    },
    /// Remove the overlay.
    OverlayClear,
    /// Install selection bindings.
    SelectorStarted,
    /// Draw or move the selection outline.
    SelectorOutline {
        /// Selected cells.
        cells: CellRect,
    },
    /// Remove the selection outline.
    SelectorOutlineCleared,
    /// Remove selection bindings.
    SelectorEnded,
    /// Ask the user to confirm discarding the recording.
    ConfirmCancel {
        /// Session that would be discarded.
        session_id: Uuid,
        /// Recorded seconds so far.
        #[serde(skip_serializing_if = "Option::is_none")]
        elapsed_secs: Option<u64>,
        /// Question to show.
        prompt: String,
    },
    /// A recording was stopped and saved.
    Saved {
        /// Recording file, when located.
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        /// Generated title.
        title: String,
        /// Capture mode.
        mode: CaptureMode,
        /// Recorded seconds.
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<u64>,
    },
    /// A recording was discarded.
    Cancelled {
        /// Deleted file, when one was known.
        #[serde(skip_serializing_if = "Option::is_none")]
        deleted: Option<PathBuf>,
    },
    /// Saved recordings, newest first.
    Recordings {
        /// Records whose file exists.
        records: Vec<RecordingRecord>,
    },
    /// Current calibration.
    Calibration {
        /// Human-readable summary.
        description: String,
        /// Raw values.
        calibration: Calibration,
    },
    /// Capture devices listed by the engine.
    Devices {
        /// One entry per engine output line.
        devices: Vec<String>,
    },
    /// Informational message.
    Info {
        /// Text.
        message: String,
    },
    /// Something went wrong but the operation completed.
    Warning {
        /// Text.
        message: String,
    },
    /// A command failed.
    Error {
        /// Text.
        message: String,
    },
}

impl AppEvent {
    /// Informational message.
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    /// Warning message.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    /// Error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
