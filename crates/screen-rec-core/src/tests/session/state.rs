use crate::{CaptureMode, ProcessHandle, Session, SessionState};

use std::time::Duration;

use tokio::time::Instant;

fn handle() -> ProcessHandle {
    ProcessHandle {
        pid: 1,
        output_path: None,
        recovered: false,
    }
}

/// WHAT: Pause only takes effect from Recording
/// WHY: A second pause must not restart the pause clock
#[tokio::test(start_paused = true)]
async fn given_paused_session_when_marking_paused_again_then_pause_start_kept() {
    // Given: Session paused after 2s
    let start = Instant::now();
    let mut session = Session::started(CaptureMode::Fullscreen, None, handle(), start);
    tokio::time::advance(Duration::from_secs(2)).await;
    session.mark_paused(Instant::now());

    // When: Marked paused again 3s later, then resumed 1s after that
    tokio::time::advance(Duration::from_secs(3)).await;
    session.mark_paused(Instant::now());
    tokio::time::advance(Duration::from_secs(1)).await;
    session.mark_resumed(Instant::now());

    // Then: The whole 4s pause counts once
    assert_eq!(session.state(), SessionState::Recording);
    assert_eq!(session.paused_total(Instant::now()), Duration::from_secs(4));
    assert_eq!(session.elapsed(Instant::now()), Some(Duration::from_secs(2)));
}

/// WHAT: Paused accumulation never grows while Recording
/// WHY: Only real pauses are subtracted from the duration
#[tokio::test(start_paused = true)]
async fn given_recording_session_when_time_passes_then_paused_total_constant() {
    // Given: A session with one finished 5s pause
    let mut session = Session::started(CaptureMode::Region, None, handle(), Instant::now());
    session.mark_paused(Instant::now());
    tokio::time::advance(Duration::from_secs(5)).await;
    session.mark_resumed(Instant::now());

    // When: Recording continues
    tokio::time::advance(Duration::from_secs(30)).await;

    // Then: Still 5s paused, 30s recorded
    assert_eq!(session.paused_total(Instant::now()), Duration::from_secs(5));
    assert_eq!(session.elapsed(Instant::now()), Some(Duration::from_secs(30)));
}

/// WHAT: Resume from Recording is ignored
/// WHY: Only the Paused -> Recording edge exists
#[test]
fn given_recording_session_when_marking_resumed_then_unchanged() {
    // Given: Recording session
    let now = Instant::now();
    let mut session = Session::started(CaptureMode::Window, None, handle(), now);

    // When: Marked resumed
    session.mark_resumed(now);

    // Then: Nothing changed
    assert_eq!(session.state(), SessionState::Recording);
    assert_eq!(session.paused_total(now), Duration::ZERO);
}

/// WHAT: Adopted sessions have no known duration
/// WHY: The original start time died with the previous host
#[test]
fn given_adopted_session_when_asking_elapsed_then_none() {
    // Given: Session adopted as paused
    let session = Session::adopted(
        ProcessHandle {
            recovered: true,
            ..handle()
        },
        SessionState::Paused,
        Instant::now(),
    );

    // When/Then: Unknown elapsed, recovered flag set
    assert_eq!(session.elapsed(Instant::now()), None);
    assert!(session.is_recovered());
    assert_eq!(session.state(), SessionState::Paused);
}
