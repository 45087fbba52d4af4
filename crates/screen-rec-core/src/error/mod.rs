use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording control-plane errors with source location tracking.
///
/// A cancelled region selection is deliberately absent: it is a normal
/// outcome reported through [`crate::SelectionOutcome::Cancelled`].
#[derive(Error, Debug)]
pub enum CoreError {
    /// A session is already active (or a start is still pending).
    #[error("A recording is already in progress {location}")]
    AlreadyRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No session is active and no recovery anchor points at a live process.
    #[error("No recording in progress {location}")]
    NotRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The capture engine executable could not be found.
    #[error("Capture engine not found: {program:?} {location}")]
    ExecutableNotFound {
        /// Program that was looked up.
        program: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The OS refused screen capture (e.g. missing screen recording permission).
    #[error("Screen capture permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The engine reported no usable screen capture device.
    #[error("No screen capture device found {location}")]
    NoDeviceFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The engine could not be started or exited before confirming startup.
    #[error("Failed to start capture engine: {reason} {location}")]
    SpawnFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No capture rectangle could be resolved for the target.
    #[error("Capture geometry unavailable: {reason} {location}")]
    GeometryUnavailable {
        /// Description of why geometry could not be resolved.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A region selection is already running.
    #[error("A region selection is already active {location}")]
    SelectorBusy {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A pause/resume/stop control could not be delivered to the process.
    #[error("Failed to signal capture process {pid}: {reason} {location}")]
    SignalDeliveryFailed {
        /// Target process id.
        pid: i32,
        /// Description of the delivery failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The metadata document could not be written.
    #[error("Failed to write recording metadata: {reason} {location}")]
    MetadataWriteFailed {
        /// Description of the write failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording file that was expected on disk is not there.
    #[error("Recording file missing: {path:?} {location}")]
    OutputFileMissing {
        /// Path that was expected, when known.
        path: Option<PathBuf>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem or process operations.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for CoreError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        CoreError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
