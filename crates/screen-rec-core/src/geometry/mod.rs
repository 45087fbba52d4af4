mod calibration;
mod rect;
mod resolver;
mod selector;

pub use {
    calibration::{Calibration, DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, Origin},
    rect::{CellPos, CellRect, GridBounds, Rect, ScreenBounds},
    resolver::{
        ChromeOffsets, CommandOriginProbe, GeometryResolver, LayoutSource, NoOriginProbe,
        OriginProbe, WindowId, WindowLayout, parse_position,
    },
    selector::{
        Direction, RegionSelector, SelectionOutcome, SelectorEvent, SelectorGate, SelectorHost,
        SelectorKey, SelectorState,
    },
};
