use crate::{locate_output, scan_latest_recording};

use std::{
    fs,
    time::{Duration, SystemTime},
};

use tempfile::TempDir;

/// WHAT: An announced, finalized file is returned without scanning
/// WHY: The engine announcement is the primary channel
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_announced_file_when_locating_then_announced_path_returned() {
    // Given: Announced file plus a newer unrelated recording
    let dir = TempDir::new().unwrap();
    let announced = dir.path().join("a.mp4");
    fs::write(&announced, b"data").unwrap();
    fs::write(dir.path().join("b.mp4"), b"data").unwrap();

    // When
    let found = locate_output(
        Some(&announced),
        None,
        dir.path(),
        SystemTime::UNIX_EPOCH,
        Duration::from_secs(1),
    )
    .await;

    // Then
    assert_eq!(found, Some(announced));
}

/// WHAT: Empty announced file falls through to the anchored path
/// WHY: A zero-byte file is not finalized
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_empty_announced_file_when_locating_then_anchored_path_used() {
    // Given
    let dir = TempDir::new().unwrap();
    let announced = dir.path().join("empty.mp4");
    let anchored = dir.path().join("anchored.mp4");
    fs::write(&announced, b"").unwrap();
    fs::write(&anchored, b"data").unwrap();

    // When
    let found = locate_output(
        Some(&announced),
        Some(&anchored),
        dir.path(),
        SystemTime::UNIX_EPOCH,
        Duration::from_millis(10),
    )
    .await;

    // Then
    assert_eq!(found, Some(anchored));
}

/// WHAT: Scan ignores other extensions and files older than the session
/// WHY: Narrows the ambiguity of the directory fallback
#[test]
#[allow(clippy::unwrap_used)]
fn given_mixed_directory_when_scanning_then_only_new_recordings_considered() {
    // Given: A recording and a text file
    let dir = TempDir::new().unwrap();
    let recording = dir.path().join("rec.mp4");
    fs::write(&recording, b"data").unwrap();
    fs::write(dir.path().join("notes.txt"), b"data").unwrap();

    // When/Then: Found with an old bound, not with a future bound
    assert_eq!(
        scan_latest_recording(dir.path(), SystemTime::UNIX_EPOCH),
        Some(recording)
    );
    let future = SystemTime::now() + Duration::from_secs(3600);
    assert_eq!(scan_latest_recording(dir.path(), future), None);
}
