//! Recording title generation.
//!
//! Candidates in priority order: VCS branch (trunk-like names skipped),
//! most recently modified file among uncommitted changes, current buffer
//! name, timestamp.

use std::{path::Path, time::SystemTime};

use chrono::{DateTime, Local};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Default maximum title length in characters.
pub const DEFAULT_TITLE_MAX_LEN: usize = 60;

const TRUNK_BRANCHES: &[&str] = &["main", "master", "trunk", "develop", "HEAD"];

/// Raw inputs for [`generate_title`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleHints {
    /// Current branch name.
    pub branch: Option<String>,
    /// Most recently modified file with uncommitted changes.
    pub changed_file: Option<String>,
    /// Name of the editor's current buffer.
    pub buffer_name: Option<String>,
}

/// Pick the first usable candidate, falling back to a timestamp.
pub fn generate_title(hints: &TitleHints, now: DateTime<Local>, max_len: usize) -> String {
    let branch = hints
        .branch
        .as_deref()
        .filter(|b| !TRUNK_BRANCHES.contains(&b.trim()));
    let changed = hints.changed_file.as_deref().and_then(file_name);
    let buffer = hints.buffer_name.as_deref().and_then(buffer_stem);

    branch
        .and_then(|b| sanitize(b, max_len))
        .or_else(|| changed.and_then(|c| sanitize(&c, max_len)))
        .or_else(|| buffer.and_then(|b| sanitize(&b, max_len)))
        .unwrap_or_else(|| format!("Recording {}", now.format("%Y-%m-%d %H:%M:%S")))
}

/// Strip control characters, collapse whitespace, truncate to `max_len`
/// characters. `None` if nothing printable remains.
pub fn sanitize(candidate: &str, max_len: usize) -> Option<String> {
    let cleaned: String = candidate
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return None;
    }

    Some(collapsed.chars().take(max_len).collect::<String>().trim_end().to_string())
}

/// Path from `names` (one per line, relative to `workdir`) whose file was
/// modified last. Files that no longer exist are skipped. When no
/// modification time is readable the first listed path is returned.
pub async fn most_recent_file(workdir: &Path, names: &str) -> Option<String> {
    let paths: Vec<&str> = names.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let mut newest: Option<(SystemTime, &str)> = None;
    for path in &paths {
        let Ok(modified) = tokio::fs::metadata(workdir.join(path))
            .await
            .and_then(|m| m.modified())
        else {
            continue;
        };
        if newest.is_none_or(|(time, _)| modified > time) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .or_else(|| paths.first().copied())
        .map(str::to_string)
}

fn file_name(path: &str) -> Option<String> {
    Path::new(path.trim())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

fn buffer_stem(buffer: &str) -> Option<String> {
    Path::new(buffer.trim())
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}

/// Collect branch and most recently modified changed file from git in
/// `workdir`. Missing git or a non-repository directory simply leaves the
/// hints empty.
#[instrument]
pub async fn gather_vcs_hints(workdir: &Path) -> TitleHints {
    let branch = git(workdir, &["rev-parse", "--abbrev-ref", "HEAD"]).await;
    let changed_file = match git(workdir, &["diff", "--name-only", "--relative", "HEAD"]).await {
        Some(names) => most_recent_file(workdir, &names).await,
        None => None,
    };

    debug!(?branch, ?changed_file, "VCS title hints gathered");

    TitleHints {
        branch,
        changed_file,
        buffer_name: None,
    }
}

async fn git(workdir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .kill_on_drop(true)
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
