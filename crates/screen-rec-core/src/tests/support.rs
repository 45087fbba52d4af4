//! In-memory stand-ins for the engine, the OS and the editor.

use crate::{
    CaptureProcessManager, CellRect, ChromeOffsets, ControlSignal, ControllerSettings, CoreError,
    CoreResult, EngineMessage, EngineReply, EngineRunner, EngineSubcommand, GeometryResolver,
    LayoutSource, ManagerSettings, Origin, OriginProbe, OverlayRenderer, OverlayStatus,
    ProcessSignaller, RecoveryAnchors, SelectorHost, SessionController, StartArgs, WindowId,
    WindowLayout, Calibration,
};

use std::{
    collections::{HashMap, HashSet},
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use error_location::ErrorLocation;
use tempfile::TempDir;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scripted engine replies.
#[derive(Debug, Default)]
pub(crate) struct EngineScript {
    pub start: Vec<EngineMessage>,
    pub engine_pid: Option<u32>,
    pub start_fails: bool,
    pub stop: Vec<EngineMessage>,
    pub other: Vec<EngineMessage>,
    /// File the engine "finalizes" when asked to stop.
    pub write_on_stop: Option<PathBuf>,
    pub calls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeEngine {
    script: Arc<Mutex<EngineScript>>,
}

impl FakeEngine {
    /// Engine that starts capture `pid` writing `output`, and finalizes it on stop.
    pub(crate) fn recording(pid: i32, output: &Path) -> Self {
        let engine = Self::default();
        {
            let mut script = engine.script();
            script.start = vec![
                EngineMessage::Started,
                EngineMessage::Pid(pid),
                EngineMessage::Output(output.to_path_buf()),
            ];
            script.stop = vec![
                EngineMessage::Stopped,
                EngineMessage::Saved(output.to_path_buf()),
            ];
            script.write_on_stop = Some(output.to_path_buf());
        }
        engine
    }

    pub(crate) fn script(&self) -> MutexGuard<'_, EngineScript> {
        lock(&self.script)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.script().calls.clone()
    }
}

impl EngineRunner for FakeEngine {
    async fn start(&self, args: &StartArgs, _timeout: Duration) -> CoreResult<EngineReply> {
        let mut script = self.script();
        script.calls.push(args.to_args().join(" "));

        if script.start_fails {
            return Err(CoreError::SpawnFailed {
                reason: "scripted failure".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(EngineReply {
            messages: script.start.clone(),
            engine_pid: script.engine_pid,
        })
    }

    async fn run(&self, subcommand: EngineSubcommand, _timeout: Duration) -> CoreResult<EngineReply> {
        let mut script = self.script();
        script.calls.push(subcommand.as_str().to_string());

        let messages = match subcommand {
            EngineSubcommand::Stop => {
                if let Some(path) = &script.write_on_stop {
                    fs::write(path, b"\x00\x00\x00\x18ftypmp42")?;
                }
                script.stop.clone()
            }
            _ => script.other.clone(),
        };

        Ok(EngineReply {
            messages,
            engine_pid: None,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct SignalState {
    pub alive: HashSet<i32>,
    pub sent: Vec<(i32, ControlSignal)>,
    pub fails: bool,
    pub ignores_interrupt: bool,
}

/// Process table with a handful of pretend pids.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeSignaller {
    state: Arc<Mutex<SignalState>>,
}

impl FakeSignaller {
    pub(crate) fn with_alive(pid: i32) -> Self {
        let signaller = Self::default();
        signaller.state().alive.insert(pid);
        signaller
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, SignalState> {
        lock(&self.state)
    }

    pub(crate) fn sent(&self) -> Vec<(i32, ControlSignal)> {
        self.state().sent.clone()
    }
}

impl ProcessSignaller for FakeSignaller {
    fn signal(&self, pid: i32, signal: ControlSignal) -> CoreResult<()> {
        let mut state = self.state();
        if state.fails || !state.alive.contains(&pid) {
            return Err(CoreError::SignalDeliveryFailed {
                pid,
                reason: "scripted failure".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        state.sent.push((pid, signal));
        if signal == ControlSignal::Interrupt && !state.ignores_interrupt {
            state.alive.remove(&pid);
        }
        Ok(())
    }

    fn is_alive(&self, pid: i32) -> bool {
        self.state().alive.contains(&pid)
    }
}

/// Origin probe with a fixed answer.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FixedOrigin(pub Option<Origin>);

impl OriginProbe for FixedOrigin {
    async fn query(&self) -> Option<Origin> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OverlayCall {
    Render(String),
    Clear,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeOverlay {
    calls: Arc<Mutex<Vec<OverlayCall>>>,
}

impl FakeOverlay {
    pub(crate) fn calls(&self) -> Vec<OverlayCall> {
        lock(&self.calls).clone()
    }

    pub(crate) fn last(&self) -> Option<OverlayCall> {
        lock(&self.calls).last().cloned()
    }
}

impl OverlayRenderer for FakeOverlay {
    fn render(&mut self, status: &OverlayStatus) {
        lock(&self.calls).push(OverlayCall::Render(status.to_string()));
    }

    fn clear(&mut self) {
        lock(&self.calls).push(OverlayCall::Clear);
    }
}

#[derive(Debug, Default)]
pub(crate) struct HostLog {
    pub bindings_installed: bool,
    pub outline: Option<CellRect>,
    pub draws: usize,
    pub outline_removed: bool,
    pub bindings_removed: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeHost {
    log: Arc<Mutex<HostLog>>,
}

impl FakeHost {
    pub(crate) fn log(&self) -> MutexGuard<'_, HostLog> {
        lock(&self.log)
    }
}

impl SelectorHost for FakeHost {
    fn install_bindings(&mut self) {
        self.log().bindings_installed = true;
    }

    fn draw_outline(&mut self, cells: CellRect) {
        let mut log = self.log();
        log.outline = Some(cells);
        log.draws += 1;
    }

    fn remove_outline(&mut self) {
        let mut log = self.log();
        log.outline = None;
        log.outline_removed = true;
    }

    fn remove_bindings(&mut self) {
        self.log().bindings_removed = true;
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeLayouts {
    pub windows: HashMap<WindowId, WindowLayout>,
    pub chrome: ChromeOffsets,
}

impl LayoutSource for FakeLayouts {
    fn window_layout(&self, window: WindowId) -> Option<WindowLayout> {
        self.windows.get(&window).copied()
    }

    fn chrome(&self) -> ChromeOffsets {
        self.chrome
    }
}

pub(crate) type TestController =
    SessionController<FakeEngine, FakeSignaller, FixedOrigin, FakeOverlay>;

/// A controller wired to fakes, plus handles to inspect them.
pub(crate) struct Harness {
    pub controller: TestController,
    pub engine: FakeEngine,
    pub signaller: FakeSignaller,
    pub overlay: FakeOverlay,
    pub output: PathBuf,
    pub dir: TempDir,
}

pub(crate) const CAPTURE_PID: i32 = 4242;

impl Harness {
    #[allow(clippy::unwrap_used)]
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("rec_20250101_120000.mp4");
        let engine = FakeEngine::recording(CAPTURE_PID, &output);
        let signaller = FakeSignaller::with_alive(CAPTURE_PID);
        let overlay = FakeOverlay::default();

        let controller = Self::build(dir.path(), &engine, &signaller, &overlay);

        Self {
            controller,
            engine,
            signaller,
            overlay,
            output,
            dir,
        }
    }

    /// A second controller over the same directory, as after a host restart.
    pub(crate) fn restarted(&self) -> TestController {
        Self::build(self.dir.path(), &self.engine, &self.signaller, &self.overlay)
    }

    fn build(
        dir: &Path,
        engine: &FakeEngine,
        signaller: &FakeSignaller,
        overlay: &FakeOverlay,
    ) -> TestController {
        let manager = CaptureProcessManager::new(
            engine.clone(),
            signaller.clone(),
            RecoveryAnchors::new(dir.join("state")),
            ManagerSettings::default(),
        );
        let calibration = Calibration {
            origin_override: Some(Origin { x: 100, y: 50 }),
            ..Calibration::default()
        };
        let resolver = GeometryResolver::new(calibration, FixedOrigin(None));

        SessionController::new(
            manager,
            resolver,
            overlay.clone(),
            ControllerSettings::new(dir),
        )
    }

    pub(crate) fn anchors(&self) -> RecoveryAnchors {
        RecoveryAnchors::new(self.dir.path().join("state"))
    }
}
