//! Rec-engine: headless screen capture on top of ffmpeg.
//!
//! Each subcommand is a short-lived process. Results go to stdout as
//! sentinel lines for the controller; diagnostics go to stderr.

mod cli;
mod commands;
mod error;
mod ffmpeg;
mod process;
mod state;
#[cfg(test)]
mod tests;

pub(crate) use {
    cli::StartOpts,
    error::{EngineError, Result as EngineResult},
    state::StateFiles,
};

use crate::{
    cli::{Cli, Command},
    commands::Engine,
    ffmpeg::Backend,
};

use std::io::{self, Write};

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

// Stderr lines reach the controller as warnings, so only warnings go there.
const DEFAULT_LOG_FILTER: &str = "rec_engine=warn";

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let state = cli
        .state_dir
        .map(StateFiles::new)
        .unwrap_or_else(StateFiles::in_temp_dir);
    let engine = Engine::new(state, cli.ffmpeg, Backend::native());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = run(&engine, &cli.command, &mut out) {
        error!("{}", e);
        let _ = writeln!(out, "{}", e.sentinel());
        let _ = writeln!(out, "{}", e);
        let _ = out.flush();
        std::process::exit(1);
    }

    let _ = out.flush();
}

fn run(engine: &Engine, command: &Command, out: &mut impl Write) -> EngineResult<()> {
    debug!(?command, "Running engine command");
    match command {
        Command::Start(opts) => engine.start(opts, out),
        Command::Stop => engine.stop(out),
        Command::Pause => engine.pause(out),
        Command::Resume => engine.resume(out),
        Command::Status => engine.status(out),
        Command::Devices => engine.devices(out),
    }?;
    out.flush()?;
    Ok(())
}
