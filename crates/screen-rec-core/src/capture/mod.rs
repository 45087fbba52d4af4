mod anchors;
pub(crate) mod engine;
mod manager;
mod message;
mod signal;

pub(crate) use anchors::write_atomic;

pub use {
    anchors::{AnchorRecord, RecoveryAnchors},
    engine::{CommandEngine, EngineReply, EngineRunner, EngineSubcommand, StartArgs},
    manager::{
        CaptureProcessManager, ControlStrategy, DEFAULT_COMMAND_TIMEOUT, DEFAULT_EXIT_TIMEOUT,
        DEFAULT_START_TIMEOUT, ManagerSettings, ProcessHandle, StopOutcome,
    },
    message::{EngineFailure, EngineMessage},
    signal::{ControlSignal, NixSignaller, ProcessSignaller},
};
