//! Translation of the capture engine's textual output into typed messages.
//!
//! This is the only place that knows the engine's sentinel tokens.

use crate::CoreError;

use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;

/// Failure reported by the engine through an `ERR_*` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFailure {
    /// `ERR_PERMISSION_DENIED`
    PermissionDenied,
    /// `ERR_ALREADY_RECORDING` (legacy: `REC_ALREADY_RUNNING`)
    AlreadyRecording,
    /// `ERR_NOT_RECORDING` (legacy: `REC_NOT_RUNNING`)
    NotRecording,
    /// `ERR_NO_SCREEN_DEVICE`
    NoScreenDevice,
    /// `ERR_FFMPEG_FAILED` (legacy: `REC_START_ERR`, `REC_STOP_ERR`)
    FfmpegFailed,
}

impl EngineFailure {
    /// Map onto the controller's error taxonomy.
    #[track_caller]
    pub fn into_error(self) -> CoreError {
        let location = ErrorLocation::from(Location::caller());
        match self {
            Self::PermissionDenied => CoreError::PermissionDenied { location },
            Self::AlreadyRecording => CoreError::AlreadyRecording { location },
            Self::NotRecording => CoreError::NotRecording { location },
            Self::NoScreenDevice => CoreError::NoDeviceFound { location },
            Self::FfmpegFailed => CoreError::SpawnFailed {
                reason: "ffmpeg failed".to_string(),
                location,
            },
        }
    }
}

/// A single line of engine output, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    /// `REC_STARTED`
    Started,
    /// `REC_STOPPED`
    Stopped,
    /// `REC_RECORDING` (status reply)
    StatusRecording,
    /// `REC_IDLE` (status reply)
    StatusIdle,
    /// An `ERR_*` sentinel.
    Failure(EngineFailure),
    /// `Recording saved: <path>`
    Saved(PathBuf),
    /// `Output: <path>` announced at start.
    Output(PathBuf),
    /// `Pid: <pid>` of the process doing the capture. Only positive pids;
    /// anything else stays [`EngineMessage::Info`].
    Pid(i32),
    /// Any other stdout line.
    Info(String),
    /// Any stderr line.
    Warning(String),
}

impl EngineMessage {
    /// Classify one stdout line. Blank lines yield `None`.
    pub fn parse_stdout(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let message = match line {
            "REC_STARTED" => Self::Started,
            "REC_STOPPED" => Self::Stopped,
            "REC_RECORDING" => Self::StatusRecording,
            "REC_IDLE" => Self::StatusIdle,
            "ERR_PERMISSION_DENIED" => Self::Failure(EngineFailure::PermissionDenied),
            "ERR_ALREADY_RECORDING" | "REC_ALREADY_RUNNING" => {
                Self::Failure(EngineFailure::AlreadyRecording)
            }
            "ERR_NOT_RECORDING" | "REC_NOT_RUNNING" => Self::Failure(EngineFailure::NotRecording),
            "ERR_NO_SCREEN_DEVICE" => Self::Failure(EngineFailure::NoScreenDevice),
            "ERR_FFMPEG_FAILED" | "REC_START_ERR" | "REC_STOP_ERR" => {
                Self::Failure(EngineFailure::FfmpegFailed)
            }
            _ => {
                if let Some(path) = non_empty_suffix(line, "Recording saved:") {
                    Self::Saved(PathBuf::from(path))
                } else if let Some(path) = non_empty_suffix(line, "Output:") {
                    Self::Output(PathBuf::from(path))
                } else if let Some(pid) =
                    non_empty_suffix(line, "Pid:")
                        .and_then(|p| p.parse::<i32>().ok())
                        .filter(|p| *p > 0)
                {
                    Self::Pid(pid)
                } else {
                    Self::Info(line.to_string())
                }
            }
        };

        Some(message)
    }

    /// Classify one stderr line. Blank lines yield `None`.
    pub fn parse_stderr(line: &str) -> Option<Self> {
        let line = line.trim();
        (!line.is_empty()).then(|| Self::Warning(line.to_string()))
    }

    /// Whether this message settles a pending start.
    pub fn resolves_start(&self) -> bool {
        matches!(self, Self::Started | Self::Failure(_))
    }
}

fn non_empty_suffix<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?.trim();
    (!rest.is_empty()).then_some(rest)
}
