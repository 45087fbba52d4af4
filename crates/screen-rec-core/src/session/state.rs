use crate::{capture::ProcessHandle, geometry::Rect};

use std::{fmt, path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

/// Lifecycle state of the recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session.
    Idle,
    /// Capture running.
    Recording,
    /// Capture frozen.
    Paused,
    /// Stop or cancel in progress.
    Stopping,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Stopping => "stopping",
        };
        f.write_str(s)
    }
}

/// What part of the screen is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Entire screen.
    Fullscreen,
    /// One editor window.
    Window,
    /// A user-drawn region.
    Region,
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fullscreen => "fullscreen",
            Self::Window => "window",
            Self::Region => "region",
        };
        f.write_str(s)
    }
}

/// The single active recording attempt.
///
/// Owned by the controller; the process itself is owned by the capture
/// manager and only referenced here through its handle.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: Uuid,
    pub(crate) state: SessionState,
    pub(crate) mode: CaptureMode,
    pub(crate) geometry: Option<Rect>,
    /// `None` for sessions adopted from recovery anchors.
    pub(crate) started_at: Option<Instant>,
    pub(crate) started_wall: DateTime<Utc>,
    pub(crate) paused_at: Option<Instant>,
    pub(crate) paused_accumulated: Duration,
    pub(crate) handle: ProcessHandle,
    pub(crate) output_path: Option<PathBuf>,
}

impl Session {
    pub(crate) fn started(
        mode: CaptureMode,
        geometry: Option<Rect>,
        handle: ProcessHandle,
        now: Instant,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Recording,
            mode,
            geometry,
            started_at: Some(now),
            started_wall: Utc::now(),
            paused_at: None,
            paused_accumulated: Duration::ZERO,
            output_path: handle.output_path.clone(),
            handle,
        }
    }

    /// A session rebuilt around an orphaned process. Its start time and
    /// geometry are unknown; the mode is recorded as fullscreen.
    pub(crate) fn adopted(handle: ProcessHandle, state: SessionState, now: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            mode: CaptureMode::Fullscreen,
            geometry: None,
            started_at: None,
            started_wall: Utc::now(),
            paused_at: (state == SessionState::Paused).then_some(now),
            paused_accumulated: Duration::ZERO,
            output_path: handle.output_path.clone(),
            handle,
        }
    }

    /// Session id for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Capture mode.
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Capture rectangle (Window and Region modes).
    pub fn geometry(&self) -> Option<Rect> {
        self.geometry
    }

    /// Expected output file, when known.
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output_path.as_ref()
    }

    /// Capture process reference.
    pub fn handle(&self) -> &ProcessHandle {
        &self.handle
    }

    /// Whether the session was adopted from recovery anchors.
    pub fn is_recovered(&self) -> bool {
        self.handle.recovered
    }

    /// Total paused time, including an ongoing pause.
    pub fn paused_total(&self, now: Instant) -> Duration {
        let ongoing = self
            .paused_at
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default();
        self.paused_accumulated + ongoing
    }

    /// Recorded (unpaused) time so far. `None` when the start is unknown.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        let started = self.started_at?;
        Some(
            now.saturating_duration_since(started)
                .saturating_sub(self.paused_total(now)),
        )
    }

    /// Enter `Paused`. No-op unless `Recording`.
    pub(crate) fn mark_paused(&mut self, now: Instant) {
        if self.state == SessionState::Recording {
            self.state = SessionState::Paused;
            self.paused_at = Some(now);
        }
    }

    /// Leave `Paused`, folding the pause into the accumulated total.
    pub(crate) fn mark_resumed(&mut self, now: Instant) {
        if self.state == SessionState::Paused {
            if let Some(at) = self.paused_at.take() {
                self.paused_accumulated += now.saturating_duration_since(at);
            }
            self.state = SessionState::Recording;
        }
    }
}
