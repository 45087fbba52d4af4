//! Editor command input.
//!
//! Reads one JSON command per line and forwards it to the application loop.
//! Malformed lines are answered with an `error` event and skipped; end of
//! input is treated as a shutdown request.

use crate::{AppCommand, AppError, AppEvent, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::{mpsc, watch},
};
use tracing::{debug, info, instrument, warn};

/// Parse one protocol line. Blank lines yield `None`.
#[track_caller]
pub fn parse_command(line: &str) -> AppResult<Option<AppCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| AppError::ProtocolError {
            reason: format!("Invalid command {:?}: {}", line, e),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Forwards parsed commands from a line-oriented reader.
pub struct CommandReader {
    command_tx: mpsc::Sender<AppCommand>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl CommandReader {
    /// Reader feeding `command_tx`, reporting parse errors on `events`.
    pub fn new(
        command_tx: mpsc::Sender<AppCommand>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self { command_tx, events }
    }

    /// Read until end of input or shutdown.
    ///
    /// # Errors
    ///
    /// `IoError` if reading fails, `ChannelSendFailed` if the application
    /// loop is gone.
    #[instrument(skip(self, input, shutdown_rx))]
    pub async fn run<R: AsyncBufRead + Unpin>(
        &self,
        input: R,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> AppResult<()> {
        let mut lines = input.lines();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Command reader shutting down");
                    return Ok(());
                }
                line = lines.next_line() => {
                    match line? {
                        Some(line) => self.handle_line(&line).await?,
                        None => {
                            info!("Command input closed, requesting shutdown");
                            return self.forward(AppCommand::Shutdown).await;
                        }
                    }
                }
            }
        }
    }

    async fn handle_line(&self, line: &str) -> AppResult<()> {
        match parse_command(line) {
            Ok(Some(command)) => {
                debug!(?command, "Command received");
                self.forward(command).await
            }
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Rejected command line");
                if self.events.send(AppEvent::error(e.to_string())).is_err() {
                    debug!("Event writer gone, parse error not reported");
                }
                Ok(())
            }
        }
    }

    async fn forward(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Application loop closed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
