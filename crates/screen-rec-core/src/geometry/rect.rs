use serde::{Deserialize, Serialize};

/// Absolute-pixel capture rectangle handed to the capture engine.
///
/// Constructed through [`Rect::new`] or [`Rect::clamp_to`], both of which
/// refuse degenerate sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge in screen pixels.
    pub x: i32,
    /// Top edge in screen pixels.
    pub y: i32,
    /// Width in pixels (at least 1).
    pub width: u32,
    /// Height in pixels (at least 1).
    pub height: u32,
}

impl Rect {
    /// Returns `None` when either dimension is zero.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Intersect with the screen. `None` if nothing of the rectangle is on-screen.
    pub fn clamp_to(&self, screen: ScreenBounds) -> Option<Self> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(screen.width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(screen.height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self {
            x: i32::try_from(left).ok()?,
            y: i32::try_from(top).ok()?,
            width: u32::try_from(right - left).ok()?,
            height: u32::try_from(bottom - top).ok()?,
        })
    }

    /// Cut off the parts left of or above the screen's top-left corner.
    ///
    /// Used when the screen size is unknown. `None` if nothing is left.
    pub fn clip_to_origin(&self) -> Option<Self> {
        self.clamp_to(ScreenBounds {
            width: u32::MAX,
            height: u32::MAX,
        })
    }
}

/// Screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenBounds {
    /// Screen width in pixels.
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
}

/// A cell position on the editor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPos {
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub col: u32,
}

/// A rectangle on the editor grid, measured in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    /// Top row.
    pub row: u32,
    /// Left column.
    pub col: u32,
    /// Height in rows.
    pub rows: u32,
    /// Width in columns.
    pub cols: u32,
}

impl CellRect {
    /// Rectangle covering both corners inclusively, in any drag direction.
    pub fn spanning(a: CellPos, b: CellPos) -> Self {
        let row = a.row.min(b.row);
        let col = a.col.min(b.col);
        Self {
            row,
            col,
            rows: a.row.max(b.row) - row + 1,
            cols: a.col.max(b.col) - col + 1,
        }
    }

    /// Single-cell rectangle at `pos`.
    pub fn at(pos: CellPos) -> Self {
        Self {
            row: pos.row,
            col: pos.col,
            rows: 1,
            cols: 1,
        }
    }

    /// Last row covered (inclusive).
    pub fn bottom(&self) -> u32 {
        self.row + self.rows.saturating_sub(1)
    }

    /// Last column covered (inclusive).
    pub fn right(&self) -> u32 {
        self.col + self.cols.saturating_sub(1)
    }
}

/// Size of the editor grid in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    /// Number of rows on screen.
    pub rows: u32,
    /// Number of columns on screen.
    pub cols: u32,
}

impl GridBounds {
    /// Clamp a position onto the grid.
    pub fn clamp(&self, pos: CellPos) -> CellPos {
        CellPos {
            row: pos.row.min(self.rows.saturating_sub(1)),
            col: pos.col.min(self.cols.saturating_sub(1)),
        }
    }
}
