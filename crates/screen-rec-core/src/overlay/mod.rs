//! Live recording status surface.

use crate::session::{CaptureMode, SessionState};

use std::{fmt, time::Duration};

use serde::Serialize;

/// Interval between overlay refreshes while a session is active.
pub const OVERLAY_TICK: Duration = Duration::from_secs(1);

/// What the overlay shows on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlayStatus {
    /// `Recording` or `Paused`.
    pub state: SessionState,
    /// Capture mode of the session.
    pub mode: CaptureMode,
    /// Recorded time, pauses excluded. `None` for adopted sessions.
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Option<Duration>,
}

impl fmt::Display for OverlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.state {
            SessionState::Paused => "⏸ PAUSED",
            _ => "● REC",
        };
        match self.elapsed {
            Some(elapsed) => write!(f, "{} {}", label, format_clock(elapsed)),
            None => write!(f, "{} --:--:--", label),
        }
    }
}

/// `HH:MM:SS`, hours not wrapped.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn serialize_secs<S: serde::Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_some(&d.as_secs()),
        None => serializer.serialize_none(),
    }
}

/// Surface the controller paints status onto.
///
/// Implementations must not block; the controller calls them from the
/// event loop.
pub trait OverlayRenderer: Send {
    /// Show or refresh the status.
    fn render(&mut self, status: &OverlayStatus);
    /// Remove the status surface.
    fn clear(&mut self);
}

/// Renderer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOverlay;

impl OverlayRenderer for NullOverlay {
    fn render(&mut self, _status: &OverlayStatus) {}

    fn clear(&mut self) {}
}
