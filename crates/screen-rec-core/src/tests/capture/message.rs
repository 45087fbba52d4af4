use crate::{CoreError, EngineFailure, EngineMessage};

use std::path::PathBuf;

/// WHAT: Every sentinel maps to its typed message
/// WHY: Sentinel parsing is the only place raw tokens are understood
#[test]
fn given_sentinels_when_parsing_stdout_then_typed_messages() {
    let cases = [
        ("REC_STARTED", EngineMessage::Started),
        ("REC_STOPPED", EngineMessage::Stopped),
        ("REC_RECORDING", EngineMessage::StatusRecording),
        ("REC_IDLE", EngineMessage::StatusIdle),
        (
            "ERR_PERMISSION_DENIED",
            EngineMessage::Failure(EngineFailure::PermissionDenied),
        ),
        (
            "ERR_ALREADY_RECORDING",
            EngineMessage::Failure(EngineFailure::AlreadyRecording),
        ),
        (
            "ERR_NOT_RECORDING",
            EngineMessage::Failure(EngineFailure::NotRecording),
        ),
        (
            "ERR_NO_SCREEN_DEVICE",
            EngineMessage::Failure(EngineFailure::NoScreenDevice),
        ),
        (
            "ERR_FFMPEG_FAILED",
            EngineMessage::Failure(EngineFailure::FfmpegFailed),
        ),
    ];

    for (line, expected) in cases {
        assert_eq!(EngineMessage::parse_stdout(line), Some(expected), "{}", line);
    }
}

/// WHAT: Legacy tokens are accepted as aliases
/// WHY: Older engine builds still print them
#[test]
fn given_legacy_tokens_when_parsing_then_aliases_resolved() {
    assert_eq!(
        EngineMessage::parse_stdout("REC_ALREADY_RUNNING"),
        Some(EngineMessage::Failure(EngineFailure::AlreadyRecording))
    );
    assert_eq!(
        EngineMessage::parse_stdout("REC_NOT_RUNNING"),
        Some(EngineMessage::Failure(EngineFailure::NotRecording))
    );
    assert_eq!(
        EngineMessage::parse_stdout("REC_STOP_ERR"),
        Some(EngineMessage::Failure(EngineFailure::FfmpegFailed))
    );
}

/// WHAT: Announcements carry their payload; everything else is info
/// WHY: Output path and pid feed the recovery anchors
#[test]
fn given_announcement_lines_when_parsing_then_payload_extracted() {
    assert_eq!(
        EngineMessage::parse_stdout("Recording saved: /tmp/rec 1.mp4"),
        Some(EngineMessage::Saved(PathBuf::from("/tmp/rec 1.mp4")))
    );
    assert_eq!(
        EngineMessage::parse_stdout("  Output: /v/out.mp4 "),
        Some(EngineMessage::Output(PathBuf::from("/v/out.mp4")))
    );
    assert_eq!(
        EngineMessage::parse_stdout("Pid: 812"),
        Some(EngineMessage::Pid(812))
    );
    assert_eq!(
        EngineMessage::parse_stdout("Pid: nope"),
        Some(EngineMessage::Info("Pid: nope".to_string()))
    );
    assert_eq!(EngineMessage::parse_stdout("   "), None);
    assert_eq!(
        EngineMessage::parse_stderr("frame=  30 fps"),
        Some(EngineMessage::Warning("frame=  30 fps".to_string()))
    );
}

/// WHAT: Failures map onto the error taxonomy
/// WHY: Callers match on CoreError, never on tokens
#[test]
fn given_engine_failures_when_converting_then_matching_core_errors() {
    assert!(matches!(
        EngineFailure::PermissionDenied.into_error(),
        CoreError::PermissionDenied { .. }
    ));
    assert!(matches!(
        EngineFailure::NoScreenDevice.into_error(),
        CoreError::NoDeviceFound { .. }
    ));
    assert!(matches!(
        EngineFailure::FfmpegFailed.into_error(),
        CoreError::SpawnFailed { .. }
    ));
    assert!(EngineMessage::Started.resolves_start());
    assert!(!EngineMessage::Info("x".to_string()).resolves_start());
}

/// WHAT: Zero and negative pids are not taken as the capture pid
/// WHY: Signalling them would hit whole process groups
#[test]
fn given_non_positive_pid_lines_when_parsing_then_info() {
    for line in ["Pid: 0", "Pid: -1"] {
        assert_eq!(
            EngineMessage::parse_stdout(line),
            Some(EngineMessage::Info(line.to_string())),
            "{}",
            line
        );
    }
    assert_eq!(EngineMessage::parse_stdout("Pid: 17"), Some(EngineMessage::Pid(17)));
}
