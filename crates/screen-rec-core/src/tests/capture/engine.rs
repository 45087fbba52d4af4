use crate::{CommandEngine, EngineMessage, EngineRunner, StartArgs};

use std::{
    fs::{self, File},
    io::Write,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    time::Duration,
};

use tempfile::TempDir;

#[allow(clippy::unwrap_used)]
fn write_engine(path: &Path, body: &str) {
    {
        let mut file = File::create(path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// WHAT: Pid and output lines printed after the start sentinel are kept
/// WHY: Anchors and signals need the capture pid, not the engine's own
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_details_after_started_when_starting_then_pid_and_output_collected() {
    // Given: An engine announcing details after the sentinel, then exiting
    let dir = TempDir::new().unwrap();
    let program = dir.path().join("engine");
    write_engine(
        &program,
        "echo REC_STARTED\necho 'Pid: 424242'\necho 'Output: /tmp/x.mp4'\n",
    );
    let engine = CommandEngine::new(&program);

    // When
    let reply = engine
        .start(&StartArgs::default(), Duration::from_secs(5))
        .await
        .unwrap();

    // Then
    assert!(reply.contains(&EngineMessage::Started));
    assert!(reply.contains(&EngineMessage::Pid(424242)));
    assert!(reply.contains(&EngineMessage::Output(PathBuf::from("/tmp/x.mp4"))));
    assert!(reply.has_start_details());
}

/// WHAT: An engine that stays alive after the sentinel does not hold up start
/// WHY: Long-running engines keep their stdout open
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_silent_engine_after_started_when_starting_then_returns_promptly() {
    // Given
    let dir = TempDir::new().unwrap();
    let program = dir.path().join("engine");
    write_engine(&program, "echo REC_STARTED\nexec sleep 5\n");
    let engine = CommandEngine::new(&program);

    // When
    let started = tokio::time::Instant::now();
    let reply = engine
        .start(&StartArgs::default(), Duration::from_secs(5))
        .await
        .unwrap();

    // Then
    assert_eq!(reply.messages, vec![EngineMessage::Started]);
    assert!(started.elapsed() < Duration::from_secs(3));
}
