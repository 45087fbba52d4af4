use crate::{TitleHints, generate_title, most_recent_file, sanitize};

use std::{
    fs::{self, File},
    time::{Duration, SystemTime},
};

use chrono::{Local, TimeZone};
use tempfile::TempDir;

fn now() -> chrono::DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
        .single()
        .unwrap_or_else(Local::now)
}

/// WHAT: A feature branch wins over everything else
/// WHY: Branch names describe the work being recorded
#[test]
fn given_feature_branch_when_generating_title_then_branch_used() {
    // Given: Branch, diff and buffer hints
    let hints = TitleHints {
        branch: Some("fix/overlay-flicker".to_string()),
        changed_file: Some("src/a.rs".to_string()),
        buffer_name: Some("main.rs".to_string()),
    };

    // When/Then
    assert_eq!(generate_title(&hints, now(), 60), "fix/overlay-flicker");
}

/// WHAT: Trunk branches are skipped in favour of the changed file
/// WHY: "main" says nothing about the recording
#[test]
fn given_trunk_branch_when_generating_title_then_changed_file_used() {
    // Given: main branch and a changed file
    let hints = TitleHints {
        branch: Some("main".to_string()),
        changed_file: Some("src/geometry/selector.rs".to_string()),
        buffer_name: Some("notes.md".to_string()),
    };

    // When/Then
    assert_eq!(generate_title(&hints, now(), 60), "selector.rs");
}

/// WHAT: The changed file touched last is picked, whatever its line count
/// WHY: The file being edited right now names the recording best
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_changed_files_when_ranking_then_most_recently_modified_wins() {
    // Given: lib.rs modified an hour ago, sub/selector.rs just now
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("lib.rs"), "many\nchanged\nlines\n").unwrap();
    fs::write(dir.path().join("sub/selector.rs"), "x").unwrap();
    let hour_ago = SystemTime::now() - Duration::from_secs(3600);
    File::options()
        .write(true)
        .open(dir.path().join("lib.rs"))
        .unwrap()
        .set_modified(hour_ago)
        .unwrap();
    File::options()
        .write(true)
        .open(dir.path().join("sub/selector.rs"))
        .unwrap()
        .set_modified(hour_ago + Duration::from_secs(1800))
        .unwrap();

    // When
    let newest = most_recent_file(dir.path(), "lib.rs\ngone.rs\nsub/selector.rs\n").await;
    let only_deleted = most_recent_file(dir.path(), "gone.rs\nalso-gone.rs").await;
    let nothing = most_recent_file(dir.path(), "").await;

    // Then
    assert_eq!(newest.as_deref(), Some("sub/selector.rs"));
    assert_eq!(only_deleted.as_deref(), Some("gone.rs"));
    assert_eq!(nothing, None);
}

/// WHAT: Buffer stem is used when VCS gives nothing
/// WHY: Third candidate in priority order
#[test]
fn given_only_buffer_when_generating_title_then_buffer_stem_used() {
    let hints = TitleHints {
        buffer_name: Some("/home/u/project/controller.rs".to_string()),
        ..TitleHints::default()
    };

    assert_eq!(generate_title(&hints, now(), 60), "controller");
}

/// WHAT: Timestamp fallback
/// WHY: A title is always produced
#[test]
fn given_no_hints_when_generating_title_then_timestamp_used() {
    assert_eq!(
        generate_title(&TitleHints::default(), now(), 60),
        "Recording 2025-03-14 09:26:53"
    );
}

/// WHAT: Control characters and runs of whitespace are cleaned, length bounded
/// WHY: Titles end up in JSON and in editor UI
#[test]
fn given_messy_candidate_when_sanitizing_then_clean_and_truncated() {
    assert_eq!(
        sanitize("  feat/\tnew\n\n  thing\u{7}  ", 60).as_deref(),
        Some("feat/ new thing")
    );
    assert_eq!(sanitize("abcdefghij", 4).as_deref(), Some("abcd"));
    assert_eq!(sanitize(" \t\n", 10), None);
}
