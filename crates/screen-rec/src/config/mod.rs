mod calibration_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod engine_config;
mod session_config;

pub(crate) use {
    calibration_config::CalibrationConfig, capture_config::CaptureConfig, config::Config,
    engine_config::EngineConfig, session_config::SessionConfig,
};

use screen_rec_core::ControlStrategy;

use std::path::PathBuf;

pub(crate) const DEFAULT_ENGINE_PROGRAM: &str = "rec-engine";
pub(crate) const DEFAULT_START_TIMEOUT_SECS: u64 = 10;
pub(crate) const DEFAULT_FINALIZE_GRACE_MS: u64 = 1500;
pub(crate) const DEFAULT_DELETE_GRACE_MS: u64 = 500;
pub(crate) const DEFAULT_RECORDINGS_DIR: &str = "screen-recordings";

pub(crate) fn default_engine_program() -> PathBuf {
    PathBuf::from(DEFAULT_ENGINE_PROGRAM)
}

pub(crate) fn default_control() -> ControlStrategy {
    ControlStrategy::Signal
}

pub(crate) fn default_start_timeout_secs() -> u64 {
    DEFAULT_START_TIMEOUT_SECS
}

pub(crate) fn default_cell_width() -> u32 {
    screen_rec_core::DEFAULT_CELL_WIDTH
}

pub(crate) fn default_cell_height() -> u32 {
    screen_rec_core::DEFAULT_CELL_HEIGHT
}

pub(crate) fn default_origin_command() -> Vec<String> {
    if cfg!(target_os = "linux") {
        ["xdotool", "getactivewindow", "getwindowgeometry"]
            .map(String::from)
            .to_vec()
    } else {
        Vec::new()
    }
}

pub(crate) fn default_finalize_grace_ms() -> u64 {
    DEFAULT_FINALIZE_GRACE_MS
}

pub(crate) fn default_delete_grace_ms() -> u64 {
    DEFAULT_DELETE_GRACE_MS
}

pub(crate) fn default_title_max_len() -> usize {
    screen_rec_core::DEFAULT_TITLE_MAX_LEN
}
