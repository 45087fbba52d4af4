use crate::{
    AppCommand, AppEvent, AppResult, CalibrateRequest, EventOverlay, EventSelectorHost,
    HostOriginProbe, LayoutRegistry, config::Config,
};

use screen_rec_core::{
    Calibration, CancelOutcome, CaptureMode, CellPos, ChromeOffsets, CommandEngine, CoreResult,
    GridBounds, NixSignaller, OVERLAY_TICK, RecoveryReport, SelectionOutcome, SelectorEvent,
    SelectorKey, SessionController, StartOutcome, StartRequest, StopContext, ToggleOutcome,
    WindowId, format_clock,
};

use std::path::PathBuf;

use tokio::{sync::mpsc, time::MissedTickBehavior};
use tracing::{error, info, instrument, warn};

/// Controller as wired into the bridge.
pub type BridgeController =
    SessionController<CommandEngine, NixSignaller, HostOriginProbe, EventOverlay>;

/// Main application state.
///
/// Owns the controller; every command is handled to completion before the
/// next one is read, so controller transitions never interleave. A running
/// region selection lives in its own task and reports back through
/// `selection_rx`.
pub struct App {
    pub(crate) controller: BridgeController,
    pub(crate) layouts: LayoutRegistry,
    pub(crate) config: Config,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) events: mpsc::UnboundedSender<AppEvent>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) selector_tx: Option<mpsc::Sender<SelectorEvent>>,
    pub(crate) selection_tx: mpsc::Sender<CoreResult<SelectionOutcome>>,
    pub(crate) selection_rx: mpsc::Receiver<CoreResult<SelectionOutcome>>,
}

impl App {
    /// Application around `controller`. Calibration changes are saved to
    /// `config_path` when one is given.
    pub(crate) fn new(
        controller: BridgeController,
        config: Config,
        config_path: Option<PathBuf>,
        events: mpsc::UnboundedSender<AppEvent>,
        command_rx: mpsc::Receiver<AppCommand>,
    ) -> Self {
        let (selection_tx, selection_rx) = mpsc::channel(1);

        Self {
            controller,
            layouts: LayoutRegistry::default(),
            config,
            config_path,
            events,
            command_rx,
            selector_tx: None,
            selection_tx,
            selection_rx,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Screen-rec bridge starting");

        if let Err(e) = self.recover() {
            error!(error = ?e, "Recovery check failed");
            self.emit(AppEvent::error(e.to_string()));
        }

        let mut ticker = tokio::time::interval(OVERLAY_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        info!("Command channel closed, shutting down");
                        break;
                    };
                    if cmd == AppCommand::Shutdown {
                        info!("Shutdown requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(cmd).await {
                        error!(error = ?e, "Command failed");
                        self.emit(AppEvent::error(e.to_string()));
                    }
                }

                Some(selection) = self.selection_rx.recv() => {
                    self.finish_selection(selection).await;
                }

                _ = ticker.tick(), if self.controller.needs_tick() => {
                    self.controller.tick();
                }
            }
        }

        // Dropping the sender ends a running selection as cancelled.
        self.selector_tx = None;

        if let Some(session) = self.controller.session() {
            warn!(
                session_id = %session.id(),
                "Exiting with an active recording; it keeps running and can be recovered"
            );
        }

        info!("Screen-rec bridge shut down successfully");
        Ok(())
    }

    /// Dispatch one command.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::Start {
                mode,
                window,
                cursor,
            } => self.start(mode, window, cursor).await?,
            AppCommand::Pause => {
                if self.controller.pause().await? == ToggleOutcome::Unchanged {
                    self.emit(AppEvent::warning("Recording is already paused"));
                }
                self.emit_state();
            }
            AppCommand::Resume => {
                if self.controller.resume().await? == ToggleOutcome::Unchanged {
                    self.emit(AppEvent::warning("Recording is not paused"));
                }
                self.emit_state();
            }
            AppCommand::Stop { buffer } => self.stop(buffer).await?,
            AppCommand::Cancel => self.request_cancel().await?,
            AppCommand::ConfirmCancel { yes } => self.confirm_cancel(yes).await?,
            AppCommand::Layout { window, layout } => self.layouts.set_layout(window, layout),
            AppCommand::Grid {
                rows,
                cols,
                top_rows,
                left_cols,
            } => self.layouts.set_grid(
                GridBounds { rows, cols },
                ChromeOffsets {
                    top_rows,
                    left_cols,
                },
            ),
            AppCommand::PointerDown(pos) => {
                self.forward_selector(SelectorEvent::PointerDown(pos)).await
            }
            AppCommand::PointerDrag(pos) => {
                self.forward_selector(SelectorEvent::PointerDrag(pos)).await
            }
            AppCommand::PointerUp(pos) => {
                self.forward_selector(SelectorEvent::PointerUp(pos)).await
            }
            AppCommand::Key { key } => self.forward_selector(SelectorEvent::Key(key)).await,
            AppCommand::Calibrate(request) => self.calibrate(request)?,
            AppCommand::Calibration => self.emit_calibration(),
            AppCommand::Status => self.emit_state(),
            AppCommand::Devices => {
                let devices = self.controller.manager().devices().await?;
                self.emit(AppEvent::Devices { devices });
            }
            AppCommand::List => self.emit_recordings(),
            AppCommand::Delete { path } => {
                self.controller.store().delete(&path)?;
                self.emit(AppEvent::info(format!("Deleted {}", path.display())));
                self.emit_recordings();
            }
            AppCommand::Recover => self.recover()?,
            AppCommand::ForceClear => {
                self.controller.force_clear()?;
                self.emit(AppEvent::info("Recovery anchors cleared"));
                self.emit_state();
            }
            AppCommand::Shutdown => {}
        }

        Ok(())
    }

    async fn start(
        &mut self,
        mode: CaptureMode,
        window: Option<WindowId>,
        cursor: Option<CellPos>,
    ) -> AppResult<()> {
        let request = match mode {
            CaptureMode::Fullscreen => StartRequest::Fullscreen,
            CaptureMode::Window => match window {
                Some(window) => StartRequest::Window(window),
                None => {
                    self.emit(AppEvent::error("Window capture needs a window id"));
                    return Ok(());
                }
            },
            CaptureMode::Region => return self.begin_selection(cursor).await,
        };

        let outcome = self.controller.start(request, &self.layouts).await?;
        self.report_start(outcome);
        Ok(())
    }

    async fn begin_selection(&mut self, cursor: Option<CellPos>) -> AppResult<()> {
        let Some(grid) = self.layouts.grid() else {
            self.emit(AppEvent::error(
                "Grid size unknown; send a grid command before selecting a region",
            ));
            return Ok(());
        };

        let start = cursor.unwrap_or(CellPos {
            row: grid.rows / 2,
            col: grid.cols / 2,
        });

        let selector = self
            .controller
            .begin_region_selection(EventSelectorHost::new(self.events.clone()), grid, start)
            .await?;

        let (selector_tx, selector_rx) = mpsc::channel(32);
        self.selector_tx = Some(selector_tx);

        let done_tx = self.selection_tx.clone();
        tokio::spawn(async move {
            let outcome = selector.run(selector_rx).await;
            if done_tx.send(outcome).await.is_err() {
                warn!("Application loop gone before selection finished");
            }
        });

        self.emit_state();
        Ok(())
    }

    async fn forward_selector(&mut self, event: SelectorEvent) {
        let Some(tx) = &self.selector_tx else {
            self.emit(AppEvent::warning("No region selection in progress"));
            return;
        };

        if tx.send(event).await.is_err() {
            warn!(?event, "Selector already finished, input dropped");
            self.selector_tx = None;
        }
    }

    #[instrument(skip(self))]
    pub(crate) async fn finish_selection(&mut self, selection: CoreResult<SelectionOutcome>) {
        self.selector_tx = None;

        match self.controller.finish_region_start(selection).await {
            Ok(outcome) => self.report_start(outcome),
            Err(e) => {
                error!(error = ?e, "Region start failed");
                self.emit(AppEvent::error(e.to_string()));
                self.emit_state();
            }
        }
    }

    fn report_start(&self, outcome: StartOutcome) {
        match outcome {
            StartOutcome::Started { mode, .. } => {
                self.emit(AppEvent::info(format!("Recording started ({})", mode)));
            }
            StartOutcome::SelectionCancelled => {
                self.emit(AppEvent::info("Region selection cancelled"));
            }
        }
        self.emit_state();
    }

    async fn stop(&mut self, buffer: Option<String>) -> AppResult<()> {
        let report = self
            .controller
            .stop(StopContext {
                buffer_name: buffer,
            })
            .await?;

        for warning in &report.warnings {
            self.emit(AppEvent::warning(warning.to_string()));
        }

        self.emit(AppEvent::Saved {
            path: report.path,
            title: report.title,
            mode: report.mode,
            duration_secs: report.duration.map(|d| d.as_secs()),
        });
        self.emit_state();
        Ok(())
    }

    async fn request_cancel(&mut self) -> AppResult<()> {
        if self.selector_tx.is_some() {
            self.forward_selector(SelectorEvent::Key(SelectorKey::Cancel))
                .await;
            return Ok(());
        }

        let prompt = self.controller.request_cancel()?;
        let recorded = prompt
            .elapsed
            .map(|d| format!(" ({} recorded)", format_clock(d)))
            .unwrap_or_default();

        self.emit(AppEvent::ConfirmCancel {
            session_id: prompt.session_id,
            elapsed_secs: prompt.elapsed.map(|d| d.as_secs()),
            prompt: format!("Discard the current recording{}? The file will be deleted.", recorded),
        });
        Ok(())
    }

    async fn confirm_cancel(&mut self, yes: bool) -> AppResult<()> {
        match self.controller.confirm_cancel(yes).await? {
            CancelOutcome::Kept => self.emit(AppEvent::info("Recording continues")),
            CancelOutcome::Discarded {
                deleted, warnings, ..
            } => {
                for warning in &warnings {
                    self.emit(AppEvent::warning(warning.to_string()));
                }
                self.emit(AppEvent::Cancelled { deleted });
            }
        }
        self.emit_state();
        Ok(())
    }

    #[instrument(skip(self))]
    fn calibrate(&mut self, request: CalibrateRequest) -> AppResult<()> {
        let mut calibration = *self.controller.calibration();

        if let Some(px) = request.window_pixels {
            let Some(derived) = Calibration::from_window_pixels(
                px.width, px.height, px.columns, px.lines,
            ) else {
                self.emit(AppEvent::error(
                    "Window size too small to derive a cell size",
                ));
                return Ok(());
            };
            calibration.cell_width = derived.cell_width;
            calibration.cell_height = derived.cell_height;
        }

        if request.cell_width == Some(0) || request.cell_height == Some(0) {
            self.emit(AppEvent::error("Cell size must be at least one pixel"));
            return Ok(());
        }
        if let Some(width) = request.cell_width {
            calibration.cell_width = width;
        }
        if let Some(height) = request.cell_height {
            calibration.cell_height = height;
        }
        if let Some(origin) = request.origin {
            calibration.origin_override = Some(origin);
        }
        if let Some(screen) = request.screen {
            calibration.screen = Some(screen);
        }

        self.controller.set_calibration(calibration);
        self.config.calibration.apply(&calibration);

        if let Some(path) = &self.config_path {
            self.config.save_to(path)?;
        }

        self.emit_calibration();
        Ok(())
    }

    fn recover(&mut self) -> AppResult<()> {
        match self.controller.recover()? {
            RecoveryReport::Clean => {}
            RecoveryReport::Orphan { pid, output_path } => {
                let target = output_path
                    .map(|p| format!(" writing {}", p.display()))
                    .unwrap_or_default();
                self.emit(AppEvent::warning(format!(
                    "A recording from an earlier run is still active (pid {}){}; stop, pause or resume act on it",
                    pid, target
                )));
            }
            RecoveryReport::StaleCleared { pid } => {
                self.emit(AppEvent::info(format!(
                    "Cleared leftover state of a finished recording (pid {})",
                    pid
                )));
            }
        }

        self.emit_state();
        Ok(())
    }

    fn emit_state(&self) {
        self.emit(AppEvent::State(self.controller.status()));
    }

    fn emit_calibration(&self) {
        let calibration = *self.controller.calibration();
        self.emit(AppEvent::Calibration {
            description: calibration.to_string(),
            calibration,
        });
    }

    fn emit_recordings(&self) {
        self.emit(AppEvent::Recordings {
            records: self.controller.store().list(),
        });
    }

    fn emit(&self, event: AppEvent) {
        if self.events.send(event).is_err() {
            warn!("Event writer gone, event dropped");
        }
    }
}
