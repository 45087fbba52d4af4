//! Screen-rec Core Library
//!
//! Control plane for an external screen-capture engine: one recording
//! session at a time, window and region geometry, crash recovery through
//! on-disk anchors, and per-directory recording metadata.
//!
//! # Example
//!
//! ```no_run
//! use screen_rec_core::{
//!     CaptureProcessManager, Calibration, CommandEngine, ControllerSettings, CoreResult,
//!     GeometryResolver, ManagerSettings, NixSignaller, NoOriginProbe, NullOverlay,
//!     RecoveryAnchors, SessionController, StartRequest, StopContext, WindowLayout,
//!     ChromeOffsets, LayoutSource, WindowId,
//! };
//!
//! use std::time::Duration;
//!
//! struct NoWindows;
//!
//! impl LayoutSource for NoWindows {
//!     fn window_layout(&self, _window: WindowId) -> Option<WindowLayout> {
//!         None
//!     }
//!
//!     fn chrome(&self) -> ChromeOffsets {
//!         ChromeOffsets::default()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let manager = CaptureProcessManager::new(
//!         CommandEngine::new("rec-engine"),
//!         NixSignaller,
//!         RecoveryAnchors::new("/tmp/screen-rec"),
//!         ManagerSettings::default(),
//!     );
//!     let resolver = GeometryResolver::new(Calibration::default(), NoOriginProbe);
//!     let mut controller = SessionController::new(
//!         manager,
//!         resolver,
//!         NullOverlay,
//!         ControllerSettings::new("/tmp/recordings"),
//!     );
//!
//!     controller.start(StartRequest::Fullscreen, &NoWindows).await?;
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     let report = controller.stop(StopContext::default()).await?;
//!
//!     println!("Saved: {:?}", report.path);
//!     Ok(())
//! }
//! ```

mod capture;
mod error;
mod geometry;
mod metadata;
mod overlay;
mod session;

pub use {
    capture::{
        AnchorRecord, CaptureProcessManager, CommandEngine, ControlSignal, ControlStrategy,
        DEFAULT_COMMAND_TIMEOUT, DEFAULT_EXIT_TIMEOUT, DEFAULT_START_TIMEOUT, EngineFailure,
        EngineMessage, EngineReply, EngineRunner, EngineSubcommand, ManagerSettings, NixSignaller,
        ProcessHandle, ProcessSignaller, RecoveryAnchors, StartArgs, StopOutcome,
    },
    error::{CoreError, Result as CoreResult},
    geometry::{
        Calibration, CellPos, CellRect, ChromeOffsets, CommandOriginProbe, DEFAULT_CELL_HEIGHT,
        DEFAULT_CELL_WIDTH, Direction, GeometryResolver, GridBounds, LayoutSource, NoOriginProbe,
        Origin, OriginProbe, Rect, RegionSelector, ScreenBounds, SelectionOutcome, SelectorEvent,
        SelectorGate, SelectorHost, SelectorKey, SelectorState, WindowId, WindowLayout,
        parse_position,
    },
    metadata::{AddOutcome, METADATA_FILE, MetadataStore, RecordingRecord},
    overlay::{NullOverlay, OVERLAY_TICK, OverlayRenderer, OverlayStatus, format_clock},
    session::{
        CancelOutcome, CancelPrompt, CaptureMode, ControllerSettings, DEFAULT_DELETE_GRACE,
        DEFAULT_FINALIZE_GRACE, DEFAULT_TITLE_MAX_LEN, RECORDING_EXTENSION, RecoveryReport,
        Session, SessionController, SessionState, StartOutcome, StartRequest, StatusSnapshot,
        StopContext, StopReport, TitleHints, ToggleOutcome, gather_vcs_hints, generate_title,
        locate_output, most_recent_file, sanitize, scan_latest_recording,
    },
};

#[cfg(test)]
mod tests;
