use crate::{
    CoreError, CoreResult,
    capture::{CaptureProcessManager, EngineRunner, ProcessHandle, ProcessSignaller, StartArgs},
    geometry::{
        Calibration, CellPos, GeometryResolver, GridBounds, LayoutSource, OriginProbe, Rect,
        RegionSelector, SelectionOutcome, SelectorGate, SelectorHost, WindowId,
    },
    metadata::MetadataStore,
    overlay::{OverlayRenderer, OverlayStatus},
    session::{
        CaptureMode, Session, SessionState, TitleHints, gather_vcs_hints, generate_title,
        DEFAULT_TITLE_MAX_LEN, locate_output,
    },
};

use std::{
    fs,
    panic::Location,
    path::PathBuf,
    time::{Duration, SystemTime},
};

use chrono::Local;
use error_location::ErrorLocation;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Default wait before trusting what is on disk after a stop.
pub const DEFAULT_FINALIZE_GRACE: Duration = Duration::from_millis(1500);
/// Default wait before deleting a cancelled recording.
pub const DEFAULT_DELETE_GRACE: Duration = Duration::from_millis(500);

/// Filesystem mtime granularity allowance for the output directory scan.
const SCAN_SLACK: Duration = Duration::from_secs(2);

/// Tunables for a [`SessionController`].
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Directory recordings are written to and scanned in.
    pub output_dir: PathBuf,
    /// Wait before locating the output of a stopped session.
    pub finalize_grace: Duration,
    /// Wait before deleting the output of a cancelled session.
    pub delete_grace: Duration,
    /// Maximum title length in characters.
    pub title_max_len: usize,
    /// Working directory for VCS title hints. `None` skips them.
    pub workdir: Option<PathBuf>,
}

impl ControllerSettings {
    /// Defaults for recordings in `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            finalize_grace: DEFAULT_FINALIZE_GRACE,
            delete_grace: DEFAULT_DELETE_GRACE,
            title_max_len: DEFAULT_TITLE_MAX_LEN,
            workdir: None,
        }
    }
}

/// What to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRequest {
    /// Entire screen.
    Fullscreen,
    /// An editor window, resolved through the layout source.
    Window(WindowId),
    /// An already chosen pixel rectangle.
    Region(Rect),
}

/// Result of a start attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The capture is running.
    Started {
        /// New session id.
        session_id: Uuid,
        /// Capture mode.
        mode: CaptureMode,
        /// Capture rectangle (Window and Region modes).
        geometry: Option<Rect>,
        /// Output file announced by the engine.
        output_path: Option<PathBuf>,
    },
    /// The user cancelled the region selection; nothing was started.
    SelectionCancelled,
}

/// Result of pause or resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The process was signalled and the state changed.
    Applied,
    /// Already in the requested state; nothing was sent.
    Unchanged,
}

/// Caller-supplied context for title generation.
#[derive(Debug, Clone, Default)]
pub struct StopContext {
    /// Editor's current buffer name.
    pub buffer_name: Option<String>,
}

/// What a finished stop produced.
///
/// The session is over (the controller is Idle) even when `warnings` is
/// non-empty.
#[derive(Debug)]
pub struct StopReport {
    /// Id of the finished session.
    pub session_id: Uuid,
    /// Capture mode of the finished session.
    pub mode: CaptureMode,
    /// Located output file.
    pub path: Option<PathBuf>,
    /// Recorded time, pauses excluded. `None` for adopted sessions.
    pub duration: Option<Duration>,
    /// Generated title.
    pub title: String,
    /// Infrastructure failures met along the way.
    pub warnings: Vec<CoreError>,
}

/// Shown to the user before a cancel is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelPrompt {
    /// Session that would be discarded.
    pub session_id: Uuid,
    /// Recorded time so far.
    pub elapsed: Option<Duration>,
}

/// Result of answering the cancel confirmation.
#[derive(Debug)]
pub enum CancelOutcome {
    /// Answered "no" (or nothing was asked); the recording continues.
    Kept,
    /// The recording was stopped and its file removed.
    Discarded {
        /// Id of the discarded session.
        session_id: Uuid,
        /// File that was deleted, when one was known.
        deleted: Option<PathBuf>,
        /// Infrastructure failures met along the way.
        warnings: Vec<CoreError>,
    },
}

/// Findings of [`SessionController::recover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryReport {
    /// No leftover anchors.
    Clean,
    /// A capture process from an earlier run is still alive. Pause, resume
    /// and stop act on it.
    Orphan {
        /// Pid of the orphaned process.
        pid: i32,
        /// Its output file, when anchored.
        output_path: Option<PathBuf>,
    },
    /// Anchors pointed at a dead process and were removed.
    StaleCleared {
        /// Pid the anchors named.
        pid: i32,
    },
}

/// Point-in-time view of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Session state (`Idle` without a session).
    pub state: SessionState,
    /// Session id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Capture mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<CaptureMode>,
    /// Capture rectangle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Rect>,
    /// Recorded seconds, pauses excluded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_secs: Option<u64>,
    /// Paused seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused_secs: Option<u64>,
    /// Expected output file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Live process left by an earlier run, when Idle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphan_pid: Option<i32>,
    /// A start is waiting on region selection.
    pub start_pending: bool,
    /// A cancel is waiting for confirmation.
    pub cancel_pending: bool,
}

/// Owns the single recording session and drives every transition.
///
/// All methods take `&mut self`; the host serializes commands through one
/// task so a transition is never interleaved with another.
pub struct SessionController<E, S, P, O>
where
    E: EngineRunner,
    S: ProcessSignaller,
    P: OriginProbe,
    O: OverlayRenderer,
{
    manager: CaptureProcessManager<E, S>,
    resolver: GeometryResolver<P>,
    overlay: O,
    store: MetadataStore,
    gate: SelectorGate,
    settings: ControllerSettings,
    session: Option<Session>,
    start_pending: bool,
    cancel_pending: bool,
}

impl<E, S, P, O> SessionController<E, S, P, O>
where
    E: EngineRunner,
    S: ProcessSignaller,
    P: OriginProbe,
    O: OverlayRenderer,
{
    /// Idle controller. Metadata lives in `settings.output_dir`.
    pub fn new(
        manager: CaptureProcessManager<E, S>,
        resolver: GeometryResolver<P>,
        overlay: O,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            manager,
            resolver,
            overlay,
            store: MetadataStore::for_directory(&settings.output_dir),
            gate: SelectorGate::default(),
            settings,
            session: None,
            start_pending: false,
            cancel_pending: false,
        }
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current state (`Idle` without a session).
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(Session::state)
            .unwrap_or(SessionState::Idle)
    }

    /// Metadata store for the output directory.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Calibration shared by window resolution and region selection.
    pub fn calibration(&self) -> &Calibration {
        self.resolver.calibration()
    }

    /// Replace the calibration.
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.resolver.set_calibration(calibration);
    }

    /// Gate guarding region selection.
    pub fn selector_gate(&self) -> &SelectorGate {
        &self.gate
    }

    /// Capture process manager, for engine queries outside a session.
    pub fn manager(&self) -> &CaptureProcessManager<E, S> {
        &self.manager
    }

    #[track_caller]
    fn ensure_idle(&self) -> CoreResult<()> {
        if self.session.is_some() || self.start_pending {
            return Err(CoreError::AlreadyRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Start recording.
    ///
    /// Window geometry is resolved before anything is spawned. A region
    /// request must already carry its rectangle; interactive selection goes
    /// through [`Self::begin_region_selection`].
    ///
    /// # Errors
    ///
    /// `AlreadyRecording` if a session exists or a start is pending (the
    /// session is left untouched), `GeometryUnavailable`, or whatever the
    /// capture manager reports. The controller stays Idle on error.
    #[instrument(skip(self, layouts))]
    pub async fn start<L: LayoutSource + Sync>(
        &mut self,
        request: StartRequest,
        layouts: &L,
    ) -> CoreResult<StartOutcome> {
        self.ensure_idle()?;
        self.refuse_live_orphan()?;

        let (mode, geometry) = match request {
            StartRequest::Fullscreen => (CaptureMode::Fullscreen, None),
            StartRequest::Window(window) => (
                CaptureMode::Window,
                Some(self.resolver.resolve_window_rect(layouts, window).await?),
            ),
            StartRequest::Region(rect) => (CaptureMode::Region, Some(rect)),
        };

        self.launch(mode, geometry).await
    }

    /// Hand input over to an interactive region selector.
    ///
    /// The controller counts as busy until [`Self::finish_region_start`]
    /// is called with the selector's result.
    ///
    /// # Errors
    ///
    /// `AlreadyRecording`, `SelectorBusy`, or `GeometryUnavailable` when the
    /// host origin is unknown.
    #[instrument(skip(self, host))]
    pub async fn begin_region_selection<H: SelectorHost>(
        &mut self,
        host: H,
        grid: GridBounds,
        start: CellPos,
    ) -> CoreResult<RegionSelector<H>> {
        self.ensure_idle()?;
        self.refuse_live_orphan()?;

        let origin = self.resolver.origin().await?;
        let selector = RegionSelector::begin(
            &self.gate,
            host,
            grid,
            start,
            *self.resolver.calibration(),
            origin,
        )?;

        self.start_pending = true;
        Ok(selector)
    }

    /// Complete a start begun with [`Self::begin_region_selection`].
    ///
    /// # Errors
    ///
    /// The selector's own error, or anything [`Self::start`] can return
    /// after the rectangle is known.
    #[instrument(skip(self))]
    pub async fn finish_region_start(
        &mut self,
        selection: CoreResult<SelectionOutcome>,
    ) -> CoreResult<StartOutcome> {
        if !self.start_pending {
            warn!("Region selection finished without a pending start");
        }
        self.start_pending = false;

        match selection? {
            SelectionOutcome::Cancelled => {
                info!("Region selection cancelled, staying idle");
                Ok(StartOutcome::SelectionCancelled)
            }
            SelectionOutcome::Confirmed(rect) => {
                self.ensure_idle()?;
                self.launch(CaptureMode::Region, Some(rect)).await
            }
        }
    }

    async fn launch(&mut self, mode: CaptureMode, geometry: Option<Rect>) -> CoreResult<StartOutcome> {
        let args = StartArgs {
            output_dir: Some(self.settings.output_dir.clone()),
            crop: geometry,
        };

        self.start_pending = true;
        let spawned = self.manager.spawn(&args).await;
        self.start_pending = false;
        let handle = spawned?;

        let session = Session::started(mode, geometry, handle, Instant::now());
        let outcome = StartOutcome::Started {
            session_id: session.id(),
            mode,
            geometry,
            output_path: session.output_path().cloned(),
        };

        info!(
            session_id = %session.id(),
            %mode,
            ?geometry,
            pid = session.handle().pid,
            "Recording started"
        );

        self.session = Some(session);
        self.cancel_pending = false;
        self.tick();

        Ok(outcome)
    }

    /// Anchors naming a live process mean a recording this controller does
    /// not know about is running.
    #[track_caller]
    fn refuse_live_orphan(&self) -> CoreResult<()> {
        if let Some(handle) = self.manager.recover() {
            if self.manager.is_alive(handle.pid) {
                warn!(pid = handle.pid, "Refusing to start over a live orphaned capture");
                return Err(CoreError::AlreadyRecording {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            warn!(pid = handle.pid, "Clearing stale recovery anchors");
            self.manager.force_clear()?;
        }
        Ok(())
    }

    /// Rebuild a session around an orphaned process, if the anchors name a
    /// live one.
    #[track_caller]
    fn adopt_orphan(&mut self, assumed: SessionState) -> CoreResult<&mut Session> {
        let handle = self.live_orphan()?.ok_or_else(|| CoreError::NotRecording {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let session = Session::adopted(handle, assumed, Instant::now());
        warn!(
            session_id = %session.id(),
            pid = session.handle().pid,
            state = %assumed,
            "Adopted orphaned capture process"
        );

        Ok(self.session.insert(session))
    }

    fn live_orphan(&self) -> CoreResult<Option<ProcessHandle>> {
        let Some(handle) = self.manager.recover() else {
            return Ok(None);
        };
        if self.manager.is_alive(handle.pid) {
            return Ok(Some(handle));
        }
        debug!(pid = handle.pid, "Anchored process is gone, clearing anchors");
        self.manager.force_clear()?;
        Ok(None)
    }

    /// Pause the recording.
    ///
    /// # Errors
    ///
    /// `NotRecording` without a session or live orphan,
    /// `SignalDeliveryFailed` (state unchanged).
    #[instrument(skip(self))]
    pub async fn pause(&mut self) -> CoreResult<ToggleOutcome> {
        if self.session.is_none() {
            self.adopt_orphan(SessionState::Recording)?;
        }
        let Some(session) = self.session.as_mut() else {
            return Err(CoreError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        match session.state {
            SessionState::Paused => {
                warn!(session_id = %session.id, "Pause requested while already paused");
                return Ok(ToggleOutcome::Unchanged);
            }
            SessionState::Stopping | SessionState::Idle => {
                return Err(CoreError::NotRecording {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            SessionState::Recording => {}
        }

        self.manager.pause(&session.handle).await?;
        session.mark_paused(Instant::now());

        info!(session_id = %session.id, "Recording paused");

        self.tick();
        Ok(ToggleOutcome::Applied)
    }

    /// Resume a paused recording.
    ///
    /// # Errors
    ///
    /// `NotRecording` without a session or live orphan,
    /// `SignalDeliveryFailed` (state unchanged).
    #[instrument(skip(self))]
    pub async fn resume(&mut self) -> CoreResult<ToggleOutcome> {
        if self.session.is_none() {
            self.adopt_orphan(SessionState::Paused)?;
        }
        let Some(session) = self.session.as_mut() else {
            return Err(CoreError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        match session.state {
            SessionState::Recording => {
                warn!(session_id = %session.id, "Resume requested while already recording");
                return Ok(ToggleOutcome::Unchanged);
            }
            SessionState::Stopping | SessionState::Idle => {
                return Err(CoreError::NotRecording {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            SessionState::Paused => {}
        }

        self.manager.resume(&session.handle).await?;
        session.mark_resumed(Instant::now());

        info!(session_id = %session.id, "Recording resumed");

        self.tick();
        Ok(ToggleOutcome::Applied)
    }

    /// Stop the recording and persist its record.
    ///
    /// A paused session is resumed first. Once the session has been taken
    /// the controller always ends Idle; infrastructure failures are
    /// returned in [`StopReport::warnings`].
    ///
    /// # Errors
    ///
    /// `NotRecording` without a session or live orphan.
    #[instrument(skip(self))]
    pub async fn stop(&mut self, context: StopContext) -> CoreResult<StopReport> {
        let mut session = self.take_for_shutdown()?;
        let mut warnings = Vec::new();

        let duration = session.elapsed(Instant::now());
        let saved_path = self.shut_down(&mut session, &mut warnings).await;

        let since = SystemTime::from(session.started_wall)
            .checked_sub(SCAN_SLACK)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let path = locate_output(
            saved_path.as_deref(),
            session.output_path.as_deref(),
            &self.settings.output_dir,
            since,
            self.settings.finalize_grace,
        )
        .await;

        let title = self.title(context).await;

        match &path {
            Some(path) => {
                if let Err(e) = self.store.add(path, session.mode, duration, Some(title.clone())) {
                    warn!(error = %e, "Recording metadata not saved");
                    warnings.push(e);
                }
            }
            None => warnings.push(CoreError::OutputFileMissing {
                path: session.output_path.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }

        info!(
            session_id = %session.id,
            path = ?path,
            ?duration,
            %title,
            warnings = warnings.len(),
            "Recording stopped"
        );

        Ok(StopReport {
            session_id: session.id,
            mode: session.mode,
            path,
            duration,
            title,
            warnings,
        })
    }

    /// Ask for confirmation before discarding the recording.
    ///
    /// # Errors
    ///
    /// `NotRecording` without a session or live orphan.
    #[instrument(skip(self))]
    pub fn request_cancel(&mut self) -> CoreResult<CancelPrompt> {
        if self.session.is_none() {
            self.adopt_orphan(SessionState::Recording)?;
        }
        let Some(session) = self.session.as_ref() else {
            return Err(CoreError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.cancel_pending = true;
        debug!(session_id = %session.id, "Cancel awaiting confirmation");

        Ok(CancelPrompt {
            session_id: session.id,
            elapsed: session.elapsed(Instant::now()),
        })
    }

    /// Answer the cancel confirmation. On "yes" the capture is stopped
    /// without a record and its file deleted after the delete grace delay.
    ///
    /// # Errors
    ///
    /// `NotRecording` without a session.
    #[instrument(skip(self))]
    pub async fn confirm_cancel(&mut self, yes: bool) -> CoreResult<CancelOutcome> {
        if self.session.is_none() {
            self.cancel_pending = false;
            return Err(CoreError::NotRecording {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !self.cancel_pending {
            warn!("Cancel confirmation without a pending request");
            return Ok(CancelOutcome::Kept);
        }

        if !yes {
            self.cancel_pending = false;
            info!("Cancel declined, recording continues");
            return Ok(CancelOutcome::Kept);
        }

        let mut session = self.take_for_shutdown()?;
        let mut warnings = Vec::new();

        let saved_path = self.shut_down(&mut session, &mut warnings).await;

        tokio::time::sleep(self.settings.delete_grace).await;

        let mut deleted = None;
        for path in [saved_path, session.output_path.clone()].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    deleted = Some(path);
                    break;
                }
                Err(e) => {
                    error!(path = ?path, error = %e, "Failed to delete cancelled recording");
                    warnings.push(e.into());
                }
            }
        }

        info!(session_id = %session.id, deleted = ?deleted, "Recording cancelled");

        Ok(CancelOutcome::Discarded {
            session_id: session.id,
            deleted,
            warnings,
        })
    }

    #[track_caller]
    fn take_for_shutdown(&mut self) -> CoreResult<Session> {
        if self.session.is_none() {
            self.adopt_orphan(SessionState::Recording)?;
        }
        self.cancel_pending = false;
        self.session.take().ok_or_else(|| CoreError::NotRecording {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Resume if paused, then terminate. Returns the engine-announced path.
    async fn shut_down(
        &mut self,
        session: &mut Session,
        warnings: &mut Vec<CoreError>,
    ) -> Option<PathBuf> {
        if session.state == SessionState::Paused {
            match self.manager.resume(&session.handle).await {
                Ok(()) => session.mark_resumed(Instant::now()),
                Err(e) => {
                    warn!(error = %e, "Could not resume before stopping");
                    warnings.push(e);
                }
            }
        }

        session.state = SessionState::Stopping;
        self.overlay.clear();

        match self.manager.terminate(&session.handle).await {
            Ok(outcome) => outcome.saved_path,
            Err(e) => {
                error!(
                    session_id = %session.id,
                    pid = session.handle.pid,
                    error = %e,
                    "Capture process did not stop cleanly; anchors kept for retry"
                );
                warnings.push(e);
                None
            }
        }
    }

    async fn title(&self, context: StopContext) -> String {
        let mut hints = match &self.settings.workdir {
            Some(dir) => gather_vcs_hints(dir).await,
            None => TitleHints::default(),
        };
        hints.buffer_name = context.buffer_name;

        generate_title(&hints, Local::now(), self.settings.title_max_len)
    }

    /// Inspect recovery anchors left by an earlier run.
    ///
    /// Stale anchors are removed; a live orphan is reported and left for
    /// pause, resume or stop to adopt.
    ///
    /// # Errors
    ///
    /// `Io` if stale anchors cannot be removed.
    #[instrument(skip(self))]
    pub fn recover(&mut self) -> CoreResult<RecoveryReport> {
        let Some(handle) = self.manager.recover() else {
            debug!("No recovery anchors");
            return Ok(RecoveryReport::Clean);
        };

        if self.manager.is_alive(handle.pid) {
            warn!(pid = handle.pid, output_path = ?handle.output_path, "Orphaned capture process found");
            return Ok(RecoveryReport::Orphan {
                pid: handle.pid,
                output_path: handle.output_path,
            });
        }

        self.manager.force_clear()?;
        info!(pid = handle.pid, "Stale recovery anchors cleared");
        Ok(RecoveryReport::StaleCleared { pid: handle.pid })
    }

    /// Delete the recovery anchors unconditionally. An in-memory session
    /// adopted from them is forgotten as well.
    ///
    /// # Errors
    ///
    /// `Io` if the anchors cannot be removed.
    #[instrument(skip(self))]
    pub fn force_clear(&mut self) -> CoreResult<()> {
        self.manager.force_clear()?;

        if self.session.as_ref().is_some_and(Session::is_recovered) {
            warn!("Forgetting adopted session");
            self.session = None;
            self.cancel_pending = false;
            self.overlay.clear();
        }
        Ok(())
    }

    /// Snapshot for status queries.
    pub fn status(&self) -> StatusSnapshot {
        let now = Instant::now();

        let orphan_pid = match &self.session {
            Some(_) => None,
            None => self
                .manager
                .recover()
                .filter(|h| self.manager.is_alive(h.pid))
                .map(|h| h.pid),
        };

        StatusSnapshot {
            state: self.state(),
            session_id: self.session.as_ref().map(Session::id),
            mode: self.session.as_ref().map(Session::mode),
            geometry: self.session.as_ref().and_then(Session::geometry),
            elapsed_secs: self
                .session
                .as_ref()
                .and_then(|s| s.elapsed(now))
                .map(|d| d.as_secs()),
            paused_secs: self.session.as_ref().map(|s| s.paused_total(now).as_secs()),
            output_path: self.session.as_ref().and_then(|s| s.output_path().cloned()),
            orphan_pid,
            start_pending: self.start_pending,
            cancel_pending: self.cancel_pending,
        }
    }

    /// Whether the overlay timer should be running.
    pub fn needs_tick(&self) -> bool {
        matches!(
            self.state(),
            SessionState::Recording | SessionState::Paused
        )
    }

    /// Refresh the overlay. Clears it when no session is active.
    pub fn tick(&mut self) {
        let now = Instant::now();
        match &self.session {
            Some(session)
                if matches!(session.state, SessionState::Recording | SessionState::Paused) =>
            {
                self.overlay.render(&OverlayStatus {
                    state: session.state,
                    mode: session.mode,
                    elapsed: session.elapsed(now),
                });
            }
            _ => self.overlay.clear(),
        }
    }
}
