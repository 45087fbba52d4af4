use crate::{Calibration, CellPos, CellRect, CoreError, Origin, Rect, ScreenBounds};

/// WHAT: Cell size is derived from a known window pixel size
/// WHY: Font metrics cannot be queried directly
#[test]
fn given_window_pixels_when_calibrating_then_cell_size_derived() {
    let calibration = Calibration::from_window_pixels(1600, 900, 200, 50);

    assert_eq!(
        calibration.map(|c| (c.cell_width, c.cell_height)),
        Some((8, 18))
    );
    assert_eq!(Calibration::from_window_pixels(1600, 900, 0, 50), None);
    assert_eq!(Calibration::from_window_pixels(10, 10, 200, 50), None);
}

/// WHAT: Rectangles entirely off-screen are refused
/// WHY: Never hand the engine a degenerate crop
#[test]
fn given_offscreen_cells_when_converting_then_geometry_unavailable() {
    let calibration = Calibration {
        screen: Some(ScreenBounds {
            width: 800,
            height: 600,
        }),
        ..Calibration::default()
    };
    let cells = CellRect::at(CellPos { row: 0, col: 0 });

    let result = calibration.cells_to_rect(cells, Origin { x: 900, y: 0 });

    assert!(matches!(result, Err(CoreError::GeometryUnavailable { .. })));
}

/// WHAT: Without screen bounds a negative origin is still clipped at zero
/// WHY: The engine rejects crops with negative offsets
#[test]
#[allow(clippy::unwrap_used)]
fn given_negative_origin_and_no_screen_when_converting_then_clipped_at_zero() {
    // Given: 10x20 cells, window origin left of and above the screen
    let calibration = Calibration {
        cell_width: 10,
        cell_height: 20,
        screen: None,
        ..Calibration::default()
    };
    let cells = CellRect {
        row: 0,
        col: 0,
        rows: 5,
        cols: 30,
    };

    // When
    let rect = calibration
        .cells_to_rect(cells, Origin { x: -100, y: -20 })
        .unwrap();
    let hidden = calibration.cells_to_rect(
        CellRect::at(CellPos { row: 0, col: 0 }),
        Origin { x: -100, y: 0 },
    );

    // Then
    assert_eq!(Some(rect), Rect::new(0, 0, 200, 80));
    assert!(matches!(hidden, Err(CoreError::GeometryUnavailable { .. })));
}

/// WHAT: Negative origins are clipped to the screen edge
/// WHY: Windows partly off the left edge still capture their visible part
#[test]
#[allow(clippy::unwrap_used)]
fn given_negative_origin_when_clamping_then_visible_part_kept() {
    let rect = Rect::new(-10, -5, 50, 20).unwrap();

    let clamped = rect.clamp_to(ScreenBounds {
        width: 100,
        height: 100,
    });

    assert_eq!(clamped, Rect::new(0, 0, 40, 15));
    assert_eq!(Rect::new(0, 0, 0, 5), None);
}

/// WHAT: Calibration describes itself
/// WHY: Shown to the user by the `calibration` query
#[test]
fn given_calibration_when_describing_then_readable() {
    let calibration = Calibration {
        origin_override: Some(Origin { x: 3, y: 4 }),
        ..Calibration::default()
    };

    assert_eq!(
        calibration.to_string(),
        "cell 8x18 px, origin override (3, 4), screen unbounded"
    );
}
