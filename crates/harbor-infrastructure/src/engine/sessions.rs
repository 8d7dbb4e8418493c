//! Session listing from engine transcripts.

use super::discovery::transcript_files;
use super::transcript::TranscriptSummary;
use chrono::{DateTime, Utc};
use harbor_core::error::{HarborError, Result};
use harbor_core::project::Project;
use harbor_core::session::{Session, truncate_preview};
use std::fs;
use std::path::Path;

/// Builds one confirmed session per transcript in `dir`, most recent first.
///
/// Transcripts that cannot be opened are logged and skipped.
pub fn scan_sessions(dir: &Path, project: &Project, preview_chars: usize) -> Result<Vec<Session>> {
    let files = transcript_files(dir).map_err(|e| {
        HarborError::adapter(
            "sessions",
            format!("Failed to read {}: {}", dir.display(), e),
        )
    })?;

    let mut sessions = Vec::with_capacity(files.len());
    for file in files {
        let Some(id) = file.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let summary = match TranscriptSummary::read(&file) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("[Discovery] Skipping transcript {}: {}", file.display(), e);
                continue;
            }
        };

        let created_at = summary
            .first_timestamp
            .or_else(|| modified_at(&file))
            .unwrap_or_else(Utc::now);
        let mut session = Session::confirmed(id, project.id.clone(), project.path.clone(), created_at);
        session.last_activity = summary.last_timestamp;
        if let Some(text) = summary.first_user_message {
            session = session.with_preview(truncate_preview(&text, preview_chars));
        }
        sessions.push(session);
    }

    sessions.sort_by(|a, b| {
        let a_time = a.last_activity.unwrap_or(a.created_at);
        let b_time = b.last_activity.unwrap_or(b.created_at);
        b_time.cmp(&a_time).then_with(|| a.id.cmp(&b.id))
    });
    Ok(sessions)
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use harbor_core::session::SessionStatus;
    use tempfile::TempDir;

    fn line(kind: &str, ts: &str, text: &str) -> String {
        format!(
            r#"{{"type":"{}","timestamp":"{}","message":{{"content":"{}"}}}}"#,
            kind, ts, text
        )
    }

    #[test]
    fn test_sessions_sorted_by_last_activity() {
        let temp = TempDir::new().unwrap();
        let project = Project::discovered("-work-api", "/work/api", None);

        fs::write(
            temp.path().join("old.jsonl"),
            [
                line("user", "2026-01-01T09:00:00Z", "Old question"),
                line("assistant", "2026-01-01T09:05:00Z", "answer"),
            ]
            .join("\n"),
        )
        .unwrap();
        fs::write(
            temp.path().join("new.jsonl"),
            [
                line("user", "2026-01-02T09:00:00Z", "Newer question with a long tail"),
                line("assistant", "2026-01-03T09:00:00Z", "answer"),
            ]
            .join("\n"),
        )
        .unwrap();

        let sessions = scan_sessions(temp.path(), &project, 14).unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        let newest = &sessions[0];
        assert_eq!(newest.status, SessionStatus::Confirmed);
        assert_eq!(newest.project_id, "-work-api");
        assert_eq!(
            newest.first_message_preview.as_deref(),
            Some(truncate_preview("Newer question with a long tail", 14).as_str())
        );
        assert_eq!(
            newest.last_activity,
            Some("2026-01-03T09:00:00Z".parse::<DateTime<Utc>>().unwrap())
        );
    }

    #[test]
    fn test_empty_transcript_still_listed() {
        let temp = TempDir::new().unwrap();
        let project = Project::discovered("p", "/p", None);
        fs::write(temp.path().join("blank.jsonl"), "").unwrap();

        let sessions = scan_sessions(temp.path(), &project, 80).unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].first_message_preview.is_none());
        assert!(sessions[0].last_activity.is_none());
    }
}
