use std::{panic::Location, path::PathBuf, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture engine errors.
///
/// Each variant maps to one stdout sentinel through [`EngineError::sentinel`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// A capture process is already running.
    #[error("A recording is already running (pid {pid}) {location}")]
    AlreadyRecording {
        /// Pid of the running capture.
        pid: i32,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// No capture process is running.
    #[error("No recording is running {location}")]
    NotRecording {
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The OS refused screen capture.
    #[error("Screen capture permission denied; see {log:?} {location}")]
    PermissionDenied {
        /// ffmpeg log with the refusal.
        log: PathBuf,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// No screen capture device is available.
    #[error("No screen capture device: {reason} {location}")]
    NoScreenDevice {
        /// What was missing.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// ffmpeg could not be run or did not produce a recording.
    #[error("ffmpeg failed: {reason} {location}")]
    FfmpegFailed {
        /// Description of the failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Crop arguments were incomplete or degenerate.
    #[error("Invalid crop: {reason} {location}")]
    InvalidCrop {
        /// Description of the problem.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Process signal could not be delivered.
    #[error("Failed to signal pid {pid}: {reason} {location}")]
    SignalFailed {
        /// Target pid.
        pid: i32,
        /// Description of the failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from state files or stdout.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl EngineError {
    /// Stdout sentinel announcing this error to the controller.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::AlreadyRecording { .. } => "ERR_ALREADY_RECORDING",
            Self::NotRecording { .. } => "ERR_NOT_RECORDING",
            Self::PermissionDenied { .. } => "ERR_PERMISSION_DENIED",
            Self::NoScreenDevice { .. } => "ERR_NO_SCREEN_DEVICE",
            Self::FfmpegFailed { .. }
            | Self::InvalidCrop { .. }
            | Self::SignalFailed { .. }
            | Self::Io { .. } => "ERR_FFMPEG_FAILED",
        }
    }
}

// Manual From<std::io::Error> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<std::io::Error> for EngineError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        EngineError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `EngineError`.
pub type Result<T> = StdResult<T, EngineError>;
