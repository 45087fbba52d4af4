use crate::config::{default_control, default_engine_program, default_start_timeout_secs};

use screen_rec_core::ControlStrategy;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Capture engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine executable, looked up on `PATH` when relative.
    #[serde(default = "default_engine_program")]
    pub program: PathBuf,
    /// How pause and resume reach the capture process.
    #[serde(default = "default_control")]
    pub control: ControlStrategy,
    /// Seconds allowed for the engine to confirm a start.
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,
}
