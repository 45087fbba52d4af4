use crate::{AppError, AppEvent, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};
use tracing::{debug, instrument};

/// Encode one event as a protocol line, newline excluded.
#[track_caller]
pub fn encode_event(event: &AppEvent) -> AppResult<String> {
    serde_json::to_string(event).map_err(|e| AppError::ProtocolError {
        reason: format!("Failed to encode event: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Write events as JSON lines until every sender is dropped.
///
/// Each line is flushed on its own so the editor sees it immediately.
///
/// # Errors
///
/// `IoError` if the output is closed.
#[instrument(skip_all)]
pub async fn write_events<W: AsyncWrite + Unpin>(
    mut output: W,
    mut events: mpsc::UnboundedReceiver<AppEvent>,
) -> AppResult<()> {
    while let Some(event) = events.recv().await {
        let mut line = encode_event(&event)?;
        line.push('\n');

        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
    }

    debug!("Event channel closed, writer finished");
    Ok(())
}
