use crate::AppEvent;

use screen_rec_core::{CellRect, SelectorHost};

use tokio::sync::mpsc;
use tracing::debug;

/// Selector surface backed by editor events.
///
/// Pointer and key input arrives as `pointer_*` and `key` commands; this
/// side only tells the editor what to bind and draw.
pub struct EventSelectorHost {
    events: mpsc::UnboundedSender<AppEvent>,
}

impl EventSelectorHost {
    /// Host emitting on `events`.
    pub fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }

    fn emit(&self, event: AppEvent) {
        if self.events.send(event).is_err() {
            debug!("Event writer gone, selector update dropped");
        }
    }
}

impl SelectorHost for EventSelectorHost {
    fn install_bindings(&mut self) {
        self.emit(AppEvent::SelectorStarted);
    }

    fn draw_outline(&mut self, cells: CellRect) {
        self.emit(AppEvent::SelectorOutline { cells });
    }

    fn remove_outline(&mut self) {
        self.emit(AppEvent::SelectorOutlineCleared);
    }

    fn remove_bindings(&mut self) {
        self.emit(AppEvent::SelectorEnded);
    }
}
