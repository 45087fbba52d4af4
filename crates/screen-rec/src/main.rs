//! Screen-rec: editor bridge for screen recording.
//!
//! Speaks line-delimited JSON on stdin/stdout. Logs go to a file in the
//! data directory because stdout carries the protocol.

mod app;
mod app_command;
mod app_event;
mod command_reader;
mod config;
mod error;
mod event_overlay;
mod event_writer;
mod layout_registry;
mod origin_probe;
mod selector_host;

pub(crate) use {
    app::App,
    app_command::{AppCommand, CalibrateRequest},
    app_event::AppEvent,
    command_reader::CommandReader,
    error::{AppError, Result as AppResult},
    event_overlay::EventOverlay,
    event_writer::write_events,
    layout_registry::LayoutRegistry,
    origin_probe::HostOriginProbe,
    selector_host::EventSelectorHost,
};

use crate::config::Config;

use screen_rec_core::{
    CaptureProcessManager, CommandEngine, GeometryResolver, NixSignaller, RecoveryAnchors,
    SessionController,
};

use std::{path::Path, time::Duration};

use tokio::{
    io::BufReader,
    sync::{mpsc, watch},
};
use tracing::{error, info, warn};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{Builder, Rotation},
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "screen_rec=debug,screen_rec_core=debug";
const LOG_FILE: &str = "screen-rec.log";

/// Application entry point.
fn main() {
    let data_dir = Config::data_dir();
    let _log_guard = init_logging(data_dir.as_deref().ok());

    let data_dir = match data_dir {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to locate data directory: {:?}", e);
            std::process::exit(1);
        }
    };

    let (config, config_path) = match Config::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async move {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let manager = CaptureProcessManager::new(
            CommandEngine::new(config.engine.program.clone()),
            NixSignaller,
            RecoveryAnchors::new(data_dir.join("state")),
            config.manager_settings(),
        );
        let resolver = GeometryResolver::new(
            config.calibration.to_calibration(),
            HostOriginProbe::from_command(&config.calibration.origin_command),
        );
        let controller = SessionController::new(
            manager,
            resolver,
            EventOverlay::new(event_tx.clone()),
            config.controller_settings(std::env::current_dir().ok()),
        );

        let reader = CommandReader::new(command_tx, event_tx.clone());
        let app = App::new(controller, config, Some(config_path), event_tx, command_rx);
        let writer = tokio::spawn(write_events(tokio::io::stdout(), event_rx));

        tokio::join!(
            async {
                if let Err(e) = reader
                    .run(BufReader::new(tokio::io::stdin()), shutdown_rx)
                    .await
                {
                    error!(error = ?e, "Command reader error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
                let _ = shutdown_tx.send(true);
            }
        );

        // Last event sender; the writer drains and exits once it is gone.
        drop(reader);

        match writer.await {
            Ok(Ok(())) => info!("Event writer stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Event writer error"),
            Err(e) => error!(error = ?e, "Event writer task panicked"),
        }
    });

    // The stdin reader may still sit in a blocking read.
    rt.shutdown_timeout(Duration::from_secs(1));
}

/// Install the subscriber. Logs go to `log_dir` when it is usable and to
/// stderr otherwise.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let appender = log_dir.map(|dir| {
        Builder::new()
            .rotation(Rotation::NEVER)
            .filename_prefix(LOG_FILE)
            .build(dir.join("logs"))
    });

    match appender {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        Some(Err(e)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            warn!(error = %e, "Log file unavailable, logging to stderr");
            None
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
