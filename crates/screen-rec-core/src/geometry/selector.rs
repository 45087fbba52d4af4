//! Interactive capture-region selection.
//!
//! The selector is a small cooperative state machine fed one input event at
//! a time. It borrows the editor's input through a [`SelectorHost`] for the
//! duration of a run and is guaranteed to hand it back: the transient
//! bindings and the outline overlay are torn down when the run confirms,
//! cancels, or is simply dropped.

use crate::{
    CoreError, CoreResult,
    geometry::{Calibration, CellPos, CellRect, GridBounds, Origin, Rect},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Edge or travel direction for keyboard adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
    /// Toward the last column.
    Right,
}

/// Keys bound while a selection is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "direction")]
pub enum SelectorKey {
    /// Push the given edge outward by one cell.
    Grow(Direction),
    /// Pull the given edge inward by one cell.
    Shrink(Direction),
    /// Translate the whole rectangle by one cell.
    Move(Direction),
    /// Accept the current rectangle.
    Confirm,
    /// Abort the selection.
    Cancel,
}

/// One input event delivered to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    /// Pointer pressed at a screen cell.
    PointerDown(CellPos),
    /// Pointer moved with the button held.
    PointerDrag(CellPos),
    /// Pointer released.
    PointerUp(CellPos),
    /// A bound key was pressed.
    Key(SelectorKey),
}

/// Selection progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// Waiting for the first pointer press or key.
    Idle,
    /// First corner placed.
    Anchored {
        /// Fixed corner.
        anchor: CellPos,
    },
    /// Opposite corner following the pointer.
    Dragging {
        /// Fixed corner.
        anchor: CellPos,
        /// Moving corner.
        cursor: CellPos,
    },
    /// Rectangle being nudged with the keyboard.
    Adjusting {
        /// Current rectangle.
        cells: CellRect,
    },
    /// Selection accepted.
    Confirmed {
        /// Final rectangle.
        cells: CellRect,
    },
    /// Selection aborted.
    Cancelled,
}

impl SelectorState {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Cancelled)
    }

    fn current_cells(&self) -> Option<CellRect> {
        match *self {
            Self::Idle | Self::Cancelled => None,
            Self::Anchored { anchor } => Some(CellRect::at(anchor)),
            Self::Dragging { anchor, cursor } => Some(CellRect::spanning(anchor, cursor)),
            Self::Adjusting { cells } | Self::Confirmed { cells } => Some(cells),
        }
    }
}

/// Result of a finished selection. Cancelling is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The user accepted a rectangle.
    Confirmed(Rect),
    /// The user aborted; there is no rectangle.
    Cancelled,
}

/// Editor-side surface the selector drives while it runs.
pub trait SelectorHost: Send {
    /// Install the transient pointer and key bindings.
    fn install_bindings(&mut self);
    /// Draw (or redraw) the live outline.
    fn draw_outline(&mut self, cells: CellRect);
    /// Destroy the outline overlay.
    fn remove_outline(&mut self);
    /// Remove every transient binding.
    fn remove_bindings(&mut self);
}

/// Shared flag ensuring at most one selector runs at a time.
#[derive(Debug, Clone, Default)]
pub struct SelectorGate {
    active: Arc<AtomicBool>,
}

impl SelectorGate {
    /// Whether a selection currently holds the gate.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// RAII guard that guarantees the host is restored when dropped.
///
/// Owns the host so all overlay and binding calls go through it; on drop
/// the outline and bindings are removed and the gate released.
struct SelectionGuard<H: SelectorHost> {
    host: H,
    active: Arc<AtomicBool>,
}

impl<H: SelectorHost> Drop for SelectionGuard<H> {
    fn drop(&mut self) {
        self.host.remove_outline();
        self.host.remove_bindings();
        self.active.store(false, Ordering::Release);
        debug!("Selector torn down");
    }
}

/// One interactive selection run.
pub struct RegionSelector<H: SelectorHost> {
    guard: SelectionGuard<H>,
    state: SelectorState,
    grid: GridBounds,
    start: CellPos,
    calibration: Calibration,
    origin: Origin,
}

impl<H: SelectorHost> RegionSelector<H> {
    /// Take over input and begin a selection.
    ///
    /// `start` is the cell keyboard adjustments grow from when no pointer
    /// press has happened yet.
    ///
    /// # Errors
    ///
    /// `SelectorBusy` if another selection holds `gate`.
    #[track_caller]
    #[instrument(skip(gate, host))]
    pub fn begin(
        gate: &SelectorGate,
        mut host: H,
        grid: GridBounds,
        start: CellPos,
        calibration: Calibration,
        origin: Origin,
    ) -> CoreResult<Self> {
        gate.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CoreError::SelectorBusy {
                location: ErrorLocation::from(Location::caller()),
            })?;

        host.install_bindings();
        info!("Region selection started");

        Ok(Self {
            guard: SelectionGuard {
                host,
                active: Arc::clone(&gate.active),
            },
            state: SelectorState::Idle,
            grid,
            start: grid.clamp(start),
            calibration,
            origin,
        })
    }

    /// Current state.
    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Feed one event. Returns the outcome once the selection is finished.
    ///
    /// # Errors
    ///
    /// `GeometryUnavailable` if the confirmed cells cannot be mapped to an
    /// on-screen pixel rectangle.
    pub fn handle(&mut self, event: SelectorEvent) -> CoreResult<Option<SelectionOutcome>> {
        if self.state.is_terminal() {
            return self.outcome();
        }

        self.state = self.transition(event);

        if !self.state.is_terminal() {
            if let Some(cells) = self.state.current_cells() {
                self.guard.host.draw_outline(cells);
            }
        }

        self.outcome()
    }

    /// Consume events until the selection finishes. A closed channel
    /// counts as cancellation. Teardown completes before this returns.
    #[instrument(skip(self, events))]
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<SelectorEvent>,
    ) -> CoreResult<SelectionOutcome> {
        while let Some(event) = events.recv().await {
            if let Some(outcome) = self.handle(event)? {
                info!(?outcome, "Region selection finished");
                return Ok(outcome);
            }
        }

        warn!("Selector input closed before confirmation");
        Ok(SelectionOutcome::Cancelled)
    }

    fn outcome(&self) -> CoreResult<Option<SelectionOutcome>> {
        match self.state {
            SelectorState::Confirmed { cells } => Ok(Some(SelectionOutcome::Confirmed(
                self.calibration.cells_to_rect(cells, self.origin)?,
            ))),
            SelectorState::Cancelled => Ok(Some(SelectionOutcome::Cancelled)),
            _ => Ok(None),
        }
    }

    fn transition(&self, event: SelectorEvent) -> SelectorState {
        use SelectorState::*;

        match (self.state, event) {
            (_, SelectorEvent::Key(SelectorKey::Cancel)) => Cancelled,

            (_, SelectorEvent::PointerDown(p)) => Anchored {
                anchor: self.grid.clamp(p),
            },

            (Anchored { anchor } | Dragging { anchor, .. }, SelectorEvent::PointerDrag(p)) => {
                Dragging {
                    anchor,
                    cursor: self.grid.clamp(p),
                }
            }
            (Adjusting { cells }, SelectorEvent::PointerDrag(p)) => Dragging {
                anchor: CellPos {
                    row: cells.row,
                    col: cells.col,
                },
                cursor: self.grid.clamp(p),
            },

            (Anchored { anchor }, SelectorEvent::PointerUp(p))
            | (Dragging { anchor, .. }, SelectorEvent::PointerUp(p)) => Confirmed {
                cells: CellRect::spanning(anchor, self.grid.clamp(p)),
            },

            (state, SelectorEvent::Key(SelectorKey::Confirm)) => match state.current_cells() {
                Some(cells) => Confirmed { cells },
                None => {
                    debug!("Confirm ignored: nothing selected yet");
                    state
                }
            },

            (state, SelectorEvent::Key(key)) => {
                let cells = state
                    .current_cells()
                    .unwrap_or_else(|| CellRect::at(self.start));
                Adjusting {
                    cells: self.adjust(cells, key),
                }
            }

            (state, ignored) => {
                debug!(?state, ?ignored, "Selector event ignored");
                state
            }
        }
    }

    fn adjust(&self, cells: CellRect, key: SelectorKey) -> CellRect {
        let max_row = self.grid.rows.saturating_sub(1);
        let max_col = self.grid.cols.saturating_sub(1);
        let mut c = cells;

        match key {
            SelectorKey::Grow(Direction::Up) if c.row > 0 => {
                c.row -= 1;
                c.rows += 1;
            }
            SelectorKey::Grow(Direction::Down) if c.bottom() < max_row => c.rows += 1,
            SelectorKey::Grow(Direction::Left) if c.col > 0 => {
                c.col -= 1;
                c.cols += 1;
            }
            SelectorKey::Grow(Direction::Right) if c.right() < max_col => c.cols += 1,

            SelectorKey::Shrink(Direction::Up) if c.rows > 1 => {
                c.row += 1;
                c.rows -= 1;
            }
            SelectorKey::Shrink(Direction::Down) if c.rows > 1 => c.rows -= 1,
            SelectorKey::Shrink(Direction::Left) if c.cols > 1 => {
                c.col += 1;
                c.cols -= 1;
            }
            SelectorKey::Shrink(Direction::Right) if c.cols > 1 => c.cols -= 1,

            SelectorKey::Move(Direction::Up) if c.row > 0 => c.row -= 1,
            SelectorKey::Move(Direction::Down) if c.bottom() < max_row => c.row += 1,
            SelectorKey::Move(Direction::Left) if c.col > 0 => c.col -= 1,
            SelectorKey::Move(Direction::Right) if c.right() < max_col => c.col += 1,

            _ => debug!(?key, "Adjustment clamped at grid edge"),
        }

        c
    }
}
