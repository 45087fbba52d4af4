use crate::AppEvent;

use screen_rec_core::{OverlayRenderer, OverlayStatus};

use tokio::sync::mpsc;
use tracing::debug;

/// Overlay that asks the editor to paint the status line.
///
/// `clear` is only forwarded while something is shown, so repeated clears
/// from an idle controller stay off the wire.
pub struct EventOverlay {
    events: mpsc::UnboundedSender<AppEvent>,
    visible: bool,
}

impl EventOverlay {
    /// Overlay emitting on `events`.
    pub fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            events,
            visible: false,
        }
    }

    fn emit(&self, event: AppEvent) {
        if self.events.send(event).is_err() {
            debug!("Event writer gone, overlay update dropped");
        }
    }
}

impl OverlayRenderer for EventOverlay {
    fn render(&mut self, status: &OverlayStatus) {
        self.visible = true;
        self.emit(AppEvent::Overlay {
            text: status.to_string(),
            status: *status,
        });
    }

    fn clear(&mut self) {
        if self.visible {
            self.visible = false;
            self.emit(AppEvent::OverlayClear);
        }
    }
}
