use crate::{
    CoreError, CoreResult,
    geometry::{CellRect, Rect, ScreenBounds},
};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default cell width in pixels. Roughly a 14px monospace font.
pub const DEFAULT_CELL_WIDTH: u32 = 8;
/// Default cell height in pixels.
pub const DEFAULT_CELL_HEIGHT: u32 = 18;

/// Top-left corner of the host window in absolute screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Horizontal screen offset.
    pub x: i32,
    /// Vertical screen offset.
    pub y: i32,
}

/// Cell-to-pixel calibration.
///
/// Font metrics are not reliably queryable, so every value here is a
/// best-effort approximation the user may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calibration {
    /// Width of one grid cell in pixels.
    pub cell_width: u32,
    /// Height of one grid cell in pixels.
    pub cell_height: u32,
    /// Host window origin used when the platform query is unavailable.
    pub origin_override: Option<Origin>,
    /// Screen size for clamping. No clamping when `None`.
    pub screen: Option<ScreenBounds>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            origin_override: None,
            screen: None,
        }
    }
}

impl Calibration {
    /// Derive cell size from a known window size in pixels and its grid size.
    ///
    /// Returns `None` if any input is zero or the division yields a zero-sized cell.
    pub fn from_window_pixels(
        pixel_width: u32,
        pixel_height: u32,
        columns: u32,
        lines: u32,
    ) -> Option<Self> {
        if columns == 0 || lines == 0 {
            return None;
        }
        let cell_width = pixel_width / columns;
        let cell_height = pixel_height / lines;
        if cell_width == 0 || cell_height == 0 {
            return None;
        }
        Some(Self {
            cell_width,
            cell_height,
            ..Self::default()
        })
    }

    /// Convert a cell rectangle to absolute pixels relative to `origin`.
    #[track_caller]
    pub fn cells_to_rect(&self, cells: CellRect, origin: Origin) -> CoreResult<Rect> {
        let unavailable = |reason: String| CoreError::GeometryUnavailable {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let x = i64::from(origin.x) + i64::from(cells.col) * i64::from(self.cell_width);
        let y = i64::from(origin.y) + i64::from(cells.row) * i64::from(self.cell_height);
        let width = i64::from(cells.cols) * i64::from(self.cell_width);
        let height = i64::from(cells.rows) * i64::from(self.cell_height);

        let rect = match (
            i32::try_from(x),
            i32::try_from(y),
            u32::try_from(width),
            u32::try_from(height),
        ) {
            (Ok(x), Ok(y), Ok(w), Ok(h)) => Rect::new(x, y, w, h),
            _ => None,
        }
        .ok_or_else(|| unavailable(format!("degenerate rectangle for {:?}", cells)))?;

        let rect = match self.screen {
            Some(screen) => rect
                .clamp_to(screen)
                .ok_or_else(|| unavailable(format!("{:?} lies outside the screen", rect)))?,
            None => rect
                .clip_to_origin()
                .ok_or_else(|| unavailable(format!("{:?} lies outside the screen", rect)))?,
        };

        debug!(?cells, ?origin, ?rect, "Cells converted to pixels");

        Ok(rect)
    }
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell {}x{} px", self.cell_width, self.cell_height)?;
        match self.origin_override {
            Some(o) => write!(f, ", origin override ({}, {})", o.x, o.y)?,
            None => write!(f, ", origin from platform query")?,
        }
        match self.screen {
            Some(s) => write!(f, ", screen {}x{}", s.width, s.height),
            None => write!(f, ", screen unbounded"),
        }
    }
}
