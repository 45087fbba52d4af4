use crate::{
    Calibration, ChromeOffsets, CoreError, GeometryResolver, NoOriginProbe, Origin, Rect,
    ScreenBounds, WindowLayout, parse_position,
    tests::support::{FakeLayouts, FixedOrigin},
};

fn layouts_with(window: u64, layout: WindowLayout) -> FakeLayouts {
    let mut layouts = FakeLayouts::default();
    layouts.windows.insert(window, layout);
    layouts
}

fn window(row: u32, col: u32, rows: u32, cols: u32) -> WindowLayout {
    WindowLayout {
        row,
        col,
        rows,
        cols,
        floating: false,
        border: 0,
    }
}

/// WHAT: Grid position and cell size map to absolute pixels
/// WHY: Reference example for window capture geometry
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_window_at_row2_col10_when_resolving_then_expected_rect() {
    // Given: 8x18 px cells, origin (100, 50), no chrome
    let resolver = GeometryResolver::new(
        Calibration::default(),
        FixedOrigin(Some(Origin { x: 100, y: 50 })),
    );
    let layouts = layouts_with(1, window(2, 10, 8, 24));

    // When
    let rect = resolver.resolve_window_rect(&layouts, 1).await.unwrap();

    // Then
    assert_eq!(rect, Rect::new(180, 86, 192, 144).unwrap());
}

/// WHAT: Chrome rows/columns and borders shift the content area
/// WHY: Tab lines and borders are not part of the window content
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_chrome_and_border_when_resolving_then_offset_applied() {
    // Given: one tab-line row, two sign columns, one-cell border
    let resolver = GeometryResolver::new(
        Calibration {
            origin_override: Some(Origin { x: 0, y: 0 }),
            ..Calibration::default()
        },
        NoOriginProbe,
    );
    let mut layouts = layouts_with(
        3,
        WindowLayout {
            border: 1,
            ..window(0, 0, 10, 10)
        },
    );
    layouts.chrome = ChromeOffsets {
        top_rows: 1,
        left_cols: 2,
    };

    // When
    let rect = resolver.resolve_window_rect(&layouts, 3).await.unwrap();

    // Then: row 2, col 3
    assert_eq!(rect, Rect::new(24, 36, 80, 180).unwrap());
}

/// WHAT: Rectangles are clamped to the screen
/// WHY: The engine rejects crops outside the capture surface
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_screen_bounds_when_window_overflows_then_clamped() {
    let resolver = GeometryResolver::new(
        Calibration {
            origin_override: Some(Origin { x: 1800, y: 0 }),
            screen: Some(ScreenBounds {
                width: 1920,
                height: 1080,
            }),
            ..Calibration::default()
        },
        NoOriginProbe,
    );
    let layouts = layouts_with(1, window(0, 0, 10, 40));

    let rect = resolver.resolve_window_rect(&layouts, 1).await.unwrap();

    assert_eq!(rect, Rect::new(1800, 0, 120, 180).unwrap());
}

/// WHAT: Unknown windows, floating windows and a missing origin are unavailable
/// WHY: Geometry failures must be typed, never guessed
#[tokio::test]
async fn given_unresolvable_targets_when_resolving_then_geometry_unavailable() {
    // Given: no origin from probe or override
    let resolver = GeometryResolver::new(Calibration::default(), NoOriginProbe);
    let floating = layouts_with(
        2,
        WindowLayout {
            floating: true,
            ..window(0, 0, 5, 5)
        },
    );
    let normal = layouts_with(4, window(0, 0, 5, 5));

    // When/Then
    assert!(matches!(
        resolver.resolve_window_rect(&floating, 99).await,
        Err(CoreError::GeometryUnavailable { .. })
    ));
    assert!(matches!(
        resolver.resolve_window_rect(&floating, 2).await,
        Err(CoreError::GeometryUnavailable { .. })
    ));
    assert!(matches!(
        resolver.resolve_window_rect(&normal, 4).await,
        Err(CoreError::GeometryUnavailable { .. })
    ));
}

/// WHAT: A configured override wins over the platform answer
/// WHY: Users set the override when the query reports the wrong window
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_query_and_override_when_querying_origin_then_override_used() {
    // Given: both sources answer
    let resolver = GeometryResolver::new(
        Calibration {
            origin_override: Some(Origin { x: 1, y: 1 }),
            ..Calibration::default()
        },
        FixedOrigin(Some(Origin { x: 640, y: 25 })),
    );

    // When
    let origin = resolver.origin().await.unwrap();

    // Then
    assert_eq!(origin, Origin { x: 1, y: 1 });
}

/// WHAT: Without an override the platform answer is used
/// WHY: Most setups never configure an origin
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_query_only_when_querying_origin_then_query_used() {
    // Given
    let resolver = GeometryResolver::new(
        Calibration::default(),
        FixedOrigin(Some(Origin { x: 640, y: 25 })),
    );

    // When
    let origin = resolver.origin().await.unwrap();

    // Then
    assert_eq!(origin, Origin { x: 640, y: 25 });
}

/// WHAT: Grid positions near the integer limit fail instead of wrapping
/// WHY: A wrapped row would crop a different part of the screen
#[tokio::test]
async fn given_row_near_limit_when_resolving_then_geometry_unavailable() {
    // Given: adding the tab-line row overflows
    let resolver = GeometryResolver::new(
        Calibration::default(),
        FixedOrigin(Some(Origin { x: 0, y: 0 })),
    );
    let mut layouts = layouts_with(
        5,
        WindowLayout {
            border: 1,
            ..window(u32::MAX, 0, 1, 1)
        },
    );
    layouts.chrome = ChromeOffsets {
        top_rows: 1,
        left_cols: 0,
    };

    // When
    let result = resolver.resolve_window_rect(&layouts, 5).await;

    // Then
    assert!(matches!(
        result,
        Err(CoreError::GeometryUnavailable { reason, .. }) if reason.contains("overflows")
    ));
}

/// WHAT: xdotool-style output is parsed
/// WHY: Default origin query on X11
#[test]
fn given_window_geometry_output_when_parsing_then_position_extracted() {
    let text = "Window 65011722\n  Position: 412,88 (screen: 0)\n  Geometry: 1280x720\n";

    assert_eq!(parse_position(text), Some(Origin { x: 412, y: 88 }));
    assert_eq!(parse_position("Geometry: 1x1"), None);
}
