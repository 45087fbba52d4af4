use crate::{
    CoreError, CoreResult,
    geometry::{Calibration, CellRect, Origin, Rect},
};

use std::{future::Future, panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Editor-assigned window identifier.
pub type WindowId = u64;

/// Position and size of an editor window on the grid.
///
/// `row`/`col` locate the outer frame (border included); `rows`/`cols` are
/// the content size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLayout {
    /// Top row of the frame.
    pub row: u32,
    /// Left column of the frame.
    pub col: u32,
    /// Content height in rows.
    pub rows: u32,
    /// Content width in columns.
    pub cols: u32,
    /// Floating/overlay windows cannot be captured by position.
    #[serde(default)]
    pub floating: bool,
    /// Border thickness in cells.
    #[serde(default)]
    pub border: u32,
}

/// Rows and columns of editor chrome preceding the window grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeOffsets {
    /// Tab line / status rows above the window grid.
    #[serde(default)]
    pub top_rows: u32,
    /// Columns left of the window grid.
    #[serde(default)]
    pub left_cols: u32,
}

/// Where window layouts come from (the editor, in practice).
pub trait LayoutSource {
    /// Layout of `window`, or `None` if the editor does not know it.
    fn window_layout(&self, window: WindowId) -> Option<WindowLayout>;

    /// Chrome currently shown around the window grid.
    fn chrome(&self) -> ChromeOffsets;
}

/// Platform query for the host window's screen origin.
pub trait OriginProbe: Send + Sync {
    /// `None` when the platform cannot answer.
    fn query(&self) -> impl Future<Output = Option<Origin>> + Send;
}

/// Probe that never answers; the calibration override is always used.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOriginProbe;

impl OriginProbe for NoOriginProbe {
    async fn query(&self) -> Option<Origin> {
        None
    }
}

/// Runs an external command and parses a `Position: X,Y` line from its
/// output (the format printed by `xdotool getwindowgeometry`).
#[derive(Debug, Clone)]
pub struct CommandOriginProbe {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandOriginProbe {
    /// Probe running `program args...`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl OriginProbe for CommandOriginProbe {
    #[instrument(skip(self), fields(program = ?self.program))]
    async fn query(&self) -> Option<Origin> {
        let output = match tokio::process::Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(out) if out.status.success() => out,
            Ok(out) => {
                warn!(status = ?out.status, "Origin query exited unsuccessfully");
                return None;
            }
            Err(e) => {
                debug!(error = %e, "Origin query unavailable");
                return None;
            }
        };

        parse_position(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse the first `Position: X,Y` line.
pub fn parse_position(text: &str) -> Option<Origin> {
    text.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("Position:")?;
        let coords = rest.split_whitespace().next()?;
        let (x, y) = coords.split_once(',')?;
        Some(Origin {
            x: x.trim().parse().ok()?,
            y: y.trim().parse().ok()?,
        })
    })
}

/// Turns logical window positions into absolute pixel rectangles.
pub struct GeometryResolver<P: OriginProbe> {
    calibration: Calibration,
    probe: P,
}

impl<P: OriginProbe> GeometryResolver<P> {
    /// Resolver using `calibration`, querying `probe` for the host origin.
    pub fn new(calibration: Calibration, probe: P) -> Self {
        Self { calibration, probe }
    }

    /// Current calibration.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Replace the calibration (manual override).
    pub fn set_calibration(&mut self, calibration: Calibration) {
        info!(%calibration, "Calibration updated");
        self.calibration = calibration;
    }

    /// Host window origin: a configured override wins, the platform query
    /// answers otherwise.
    #[instrument(skip(self))]
    pub async fn origin(&self) -> CoreResult<Origin> {
        if let Some(origin) = self.calibration.origin_override {
            debug!(?origin, "Origin from override");
            return Ok(origin);
        }

        self.probe
            .query()
            .await
            .inspect(|origin| debug!(?origin, "Origin from platform query"))
            .ok_or(CoreError::GeometryUnavailable {
                reason: "host window origin unknown; set an origin override".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Resolve the capture rectangle of an editor window.
    ///
    /// # Errors
    ///
    /// `GeometryUnavailable` if the window is unknown, floating, or no
    /// origin can be determined.
    #[instrument(skip(self, layouts))]
    pub async fn resolve_window_rect<L: LayoutSource>(
        &self,
        layouts: &L,
        window: WindowId,
    ) -> CoreResult<Rect> {
        let layout = layouts
            .window_layout(window)
            .ok_or_else(|| CoreError::GeometryUnavailable {
                reason: format!("no layout known for window {}", window),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if layout.floating {
            return Err(CoreError::GeometryUnavailable {
                reason: format!("window {} is floating", window),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let chrome = layouts.chrome();
        let row = layout
            .row
            .checked_add(chrome.top_rows)
            .and_then(|r| r.checked_add(layout.border));
        let col = layout
            .col
            .checked_add(chrome.left_cols)
            .and_then(|c| c.checked_add(layout.border));
        let (Some(row), Some(col)) = (row, col) else {
            return Err(CoreError::GeometryUnavailable {
                reason: format!("window {} position overflows the grid", window),
                location: ErrorLocation::from(Location::caller()),
            });
        };
        let cells = CellRect {
            row,
            col,
            rows: layout.rows,
            cols: layout.cols,
        };

        let origin = self.origin().await?;
        let rect = self.calibration.cells_to_rect(cells, origin)?;

        info!(window, ?rect, "Window geometry resolved");

        Ok(rect)
    }
}
