use crate::{
    Calibration, CellPos, CellRect, CoreError, Direction, GridBounds, Origin, Rect,
    RegionSelector, SelectionOutcome, SelectorEvent, SelectorGate, SelectorKey, SelectorState,
    tests::support::FakeHost,
};

use tokio::sync::mpsc;

const GRID: GridBounds = GridBounds { rows: 40, cols: 120 };
const ORIGIN: Origin = Origin { x: 0, y: 0 };

fn begin(gate: &SelectorGate, host: &FakeHost) -> RegionSelector<FakeHost> {
    match RegionSelector::begin(
        gate,
        host.clone(),
        GRID,
        CellPos { row: 5, col: 5 },
        Calibration::default(),
        ORIGIN,
    ) {
        Ok(selector) => selector,
        Err(e) => unreachable!("selector did not start: {}", e),
    }
}

/// WHAT: Drag from (5,5) to (10,15) selects 6 rows by 11 columns
/// WHY: Both corners are inclusive
#[test]
#[allow(clippy::unwrap_used)]
fn given_drag_when_released_then_inclusive_rectangle_confirmed() {
    // Given
    let gate = SelectorGate::default();
    let host = FakeHost::default();
    let mut selector = begin(&gate, &host);

    // When
    selector
        .handle(SelectorEvent::PointerDown(CellPos { row: 5, col: 5 }))
        .unwrap();
    selector
        .handle(SelectorEvent::PointerDrag(CellPos { row: 8, col: 12 }))
        .unwrap();
    selector
        .handle(SelectorEvent::PointerDrag(CellPos { row: 10, col: 15 }))
        .unwrap();
    let outcome = selector
        .handle(SelectorEvent::PointerUp(CellPos { row: 10, col: 15 }))
        .unwrap();

    // Then: 11 x 6 cells of 8x18 px
    assert_eq!(
        selector.state(),
        SelectorState::Confirmed {
            cells: CellRect {
                row: 5,
                col: 5,
                rows: 6,
                cols: 11
            }
        }
    );
    assert_eq!(
        outcome,
        Some(SelectionOutcome::Confirmed(
            Rect::new(40, 90, 88, 108).unwrap()
        ))
    );
    assert_eq!(host.log().draws, 3);
}

/// WHAT: Cancel yields no rectangle and tears everything down
/// WHY: Cancelling is a normal outcome, and input must be handed back
#[test]
#[allow(clippy::unwrap_used)]
fn given_drag_in_progress_when_cancelled_then_no_rectangle_and_teardown() {
    // Given
    let gate = SelectorGate::default();
    let host = FakeHost::default();
    let mut selector = begin(&gate, &host);
    selector
        .handle(SelectorEvent::PointerDown(CellPos { row: 1, col: 1 }))
        .unwrap();

    // When
    let outcome = selector
        .handle(SelectorEvent::Key(SelectorKey::Cancel))
        .unwrap();
    drop(selector);

    // Then
    assert_eq!(outcome, Some(SelectionOutcome::Cancelled));
    let log = host.log();
    assert!(log.bindings_installed);
    assert!(log.bindings_removed);
    assert!(log.outline_removed);
    assert_eq!(log.outline, None);
    assert!(!gate.is_active());
}

/// WHAT: Keyboard adjustments grow, move and shrink by one cell, clamped
/// WHY: Pointer-free selection
#[test]
#[allow(clippy::unwrap_used)]
fn given_keyboard_adjustments_when_confirming_then_adjusted_rectangle() {
    // Given
    let gate = SelectorGate::default();
    let mut selector = begin(&gate, &FakeHost::default());

    // When: grow right twice, grow down, move up, shrink left edge, confirm
    for key in [
        SelectorKey::Grow(Direction::Right),
        SelectorKey::Grow(Direction::Right),
        SelectorKey::Grow(Direction::Down),
        SelectorKey::Move(Direction::Up),
        SelectorKey::Shrink(Direction::Left),
    ] {
        selector.handle(SelectorEvent::Key(key)).unwrap();
    }
    selector
        .handle(SelectorEvent::Key(SelectorKey::Confirm))
        .unwrap();

    // Then: started 1x1 at (5,5)
    assert_eq!(
        selector.state(),
        SelectorState::Confirmed {
            cells: CellRect {
                row: 4,
                col: 6,
                rows: 2,
                cols: 2
            }
        }
    );
}

/// WHAT: Adjustments stop at the grid edge
/// WHY: The selection never leaves the screen
#[test]
#[allow(clippy::unwrap_used)]
fn given_rectangle_at_edge_when_moving_past_it_then_unchanged() {
    let gate = SelectorGate::default();
    let mut selector = begin(&gate, &FakeHost::default());
    selector
        .handle(SelectorEvent::PointerDown(CellPos { row: 0, col: 0 }))
        .unwrap();
    selector
        .handle(SelectorEvent::PointerDrag(CellPos { row: 500, col: 500 }))
        .unwrap();

    assert_eq!(
        selector.state(),
        SelectorState::Dragging {
            anchor: CellPos { row: 0, col: 0 },
            cursor: CellPos { row: 39, col: 119 }
        }
    );
}

/// WHAT: Confirm with nothing selected is ignored
/// WHY: Confirm needs a rectangle
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_selector_when_confirming_then_still_idle() {
    let gate = SelectorGate::default();
    let mut selector = begin(&gate, &FakeHost::default());

    let outcome = selector
        .handle(SelectorEvent::Key(SelectorKey::Confirm))
        .unwrap();

    assert_eq!(outcome, None);
    assert_eq!(selector.state(), SelectorState::Idle);
}

/// WHAT: Only one selection runs at a time
/// WHY: Two selectors would fight over the same bindings
#[test]
fn given_active_selection_when_beginning_another_then_selector_busy() {
    // Given
    let gate = SelectorGate::default();
    let first = begin(&gate, &FakeHost::default());

    // When
    let second = RegionSelector::begin(
        &gate,
        FakeHost::default(),
        GRID,
        CellPos { row: 0, col: 0 },
        Calibration::default(),
        ORIGIN,
    );

    // Then: busy until the first is dropped
    assert!(matches!(second, Err(CoreError::SelectorBusy { .. })));
    drop(first);
    assert!(!gate.is_active());
}

/// WHAT: A closed event channel counts as cancellation
/// WHY: The host going away must release the selector
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_closed_channel_when_running_then_cancelled_and_torn_down() {
    // Given
    let gate = SelectorGate::default();
    let host = FakeHost::default();
    let selector = begin(&gate, &host);
    let (tx, rx) = mpsc::channel(4);
    tx.send(SelectorEvent::PointerDown(CellPos { row: 2, col: 2 }))
        .await
        .unwrap();
    drop(tx);

    // When
    let outcome = selector.run(rx).await.unwrap();

    // Then
    assert_eq!(outcome, SelectionOutcome::Cancelled);
    assert!(host.log().bindings_removed);
    assert!(!gate.is_active());
}
