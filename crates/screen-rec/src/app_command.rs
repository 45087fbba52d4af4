use screen_rec_core::{
    CaptureMode, CellPos, Origin, ScreenBounds, SelectorKey, WindowId, WindowLayout,
};

use std::path::PathBuf;

use serde::Deserialize;

/// Commands read from the editor, one JSON object per stdin line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AppCommand {
    /// Start a recording.
    Start {
        /// What to capture.
        mode: CaptureMode,
        /// Target window (window mode).
        #[serde(default)]
        window: Option<WindowId>,
        /// Cursor cell keyboard selection grows from (region mode).
        #[serde(default)]
        cursor: Option<CellPos>,
    },
    /// Pause the recording.
    Pause,
    /// Resume the recording.
    Resume,
    /// Stop and save the recording.
    Stop {
        /// Current buffer name, used for the title.
        #[serde(default)]
        buffer: Option<String>,
    },
    /// Ask to discard the recording.
    Cancel,
    /// Answer the discard confirmation.
    ConfirmCancel {
        /// Whether to discard.
        yes: bool,
    },
    /// Report a window's position on the grid.
    Layout {
        /// Window identifier.
        window: WindowId,
        /// Grid placement.
        #[serde(flatten)]
        layout: WindowLayout,
    },
    /// Report grid size and chrome.
    Grid {
        /// Rows on screen.
        rows: u32,
        /// Columns on screen.
        cols: u32,
        /// Rows above the window grid (tab line).
        #[serde(default)]
        top_rows: u32,
        /// Columns left of the window grid.
        #[serde(default)]
        left_cols: u32,
    },
    /// Pointer pressed during region selection.
    PointerDown(CellPos),
    /// Pointer dragged during region selection.
    PointerDrag(CellPos),
    /// Pointer released during region selection.
    PointerUp(CellPos),
    /// Bound key pressed during region selection.
    Key {
        /// Key action.
        key: SelectorKey,
    },
    /// Override calibration values.
    Calibrate(CalibrateRequest),
    /// Describe the current calibration.
    Calibration,
    /// Report controller status.
    Status,
    /// List capture devices known to the engine.
    Devices,
    /// List saved recordings.
    List,
    /// Delete a saved recording.
    Delete {
        /// Recording file.
        path: PathBuf,
    },
    /// Inspect recovery anchors.
    Recover,
    /// Remove recovery anchors unconditionally.
    ForceClear,
    /// Exit the bridge.
    Shutdown,
}

/// Fields of a `calibrate` command. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CalibrateRequest {
    /// Cell width in pixels.
    #[serde(default)]
    pub cell_width: Option<u32>,
    /// Cell height in pixels.
    #[serde(default)]
    pub cell_height: Option<u32>,
    /// Host window origin override.
    #[serde(default)]
    pub origin: Option<Origin>,
    /// Screen size for clamping.
    #[serde(default)]
    pub screen: Option<ScreenBounds>,
    /// Known window size, from which cell size is derived.
    #[serde(default)]
    pub window_pixels: Option<WindowPixels>,
}

/// Editor window size in pixels and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WindowPixels {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Width in columns.
    pub columns: u32,
    /// Height in lines.
    pub lines: u32,
}
