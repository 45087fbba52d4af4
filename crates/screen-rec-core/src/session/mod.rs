mod controller;
mod output;
mod state;
mod title;

pub use {
    controller::{
        CancelOutcome, CancelPrompt, ControllerSettings, DEFAULT_DELETE_GRACE,
        DEFAULT_FINALIZE_GRACE, RecoveryReport, SessionController, StartOutcome, StartRequest,
        StatusSnapshot, StopContext, StopReport, ToggleOutcome,
    },
    output::{RECORDING_EXTENSION, locate_output, scan_latest_recording},
    state::{CaptureMode, Session, SessionState},
    title::{
        DEFAULT_TITLE_MAX_LEN, TitleHints, gather_vcs_hints, generate_title, most_recent_file,
        sanitize,
    },
};
