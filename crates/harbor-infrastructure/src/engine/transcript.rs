//! Summaries of the engine's `*.jsonl` session transcripts.
//!
//! Each line of a transcript is one JSON record. Only a handful of fields
//! matter here:
//!
//! ```json
//! {"type":"user","cwd":"/work/api","timestamp":"2026-01-04T10:00:00.000Z",
//!  "message":{"role":"user","content":"Fix the login bug"}}
//! ```
//!
//! `message.content` is either a string or an array of content blocks.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct TranscriptLine {
    #[serde(rename = "type")]
    kind: Option<String>,
    cwd: Option<PathBuf>,
    timestamp: Option<String>,
    message: Option<MessageBody>,
    #[serde(rename = "isMeta", default)]
    is_meta: bool,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    content: Option<Value>,
}

/// What a transcript file tells about its session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TranscriptSummary {
    pub cwd: Option<PathBuf>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub first_user_message: Option<String>,
    pub skipped_lines: usize,
}

impl TranscriptSummary {
    /// Reads a whole transcript. Malformed lines, including ones that are not
    /// valid UTF-8, are counted and skipped.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut summary = Self::default();

        for line in reader.split(b'\n') {
            let line = line?;
            if line.trim_ascii().is_empty() {
                continue;
            }
            match serde_json::from_slice::<TranscriptLine>(&line) {
                Ok(record) => summary.absorb(record),
                Err(_) => summary.skipped_lines += 1,
            }
        }

        if summary.skipped_lines > 0 {
            tracing::debug!(
                "[Discovery] Skipped {} malformed lines in {}",
                summary.skipped_lines,
                path.display()
            );
        }
        Ok(summary)
    }

    /// Reads lines only until a working directory is found.
    pub fn read_cwd(path: &Path) -> std::io::Result<Option<PathBuf>> {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.split(b'\n') {
            let line = line?;
            if let Ok(TranscriptLine { cwd: Some(cwd), .. }) = serde_json::from_slice(&line) {
                return Ok(Some(cwd));
            }
        }
        Ok(None)
    }

    fn absorb(&mut self, record: TranscriptLine) {
        if self.cwd.is_none() {
            self.cwd = record.cwd;
        }

        if let Some(ts) = record.timestamp.as_deref().and_then(parse_timestamp) {
            if self.first_timestamp.is_none_or(|first| ts < first) {
                self.first_timestamp = Some(ts);
            }
            if self.last_timestamp.is_none_or(|last| ts > last) {
                self.last_timestamp = Some(ts);
            }
        }

        if self.first_user_message.is_none() && record.kind.as_deref() == Some("user") && !record.is_meta {
            self.first_user_message = record
                .message
                .and_then(|m| m.content)
                .as_ref()
                .and_then(content_text);
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Extracts the typed text of a user message.
///
/// Tool results and other non-text blocks yield `None`.
fn content_text(content: &Value) -> Option<String> {
    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn transcript(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_summary_of_mixed_transcript() {
        let file = transcript(&[
            r#"{"type":"summary","summary":"Login work"}"#,
            r#"{"type":"user","cwd":"/work/api","timestamp":"2026-01-04T10:00:00Z","isMeta":true,"message":{"content":"<command>"}}"#,
            r#"{"type":"user","cwd":"/work/api","timestamp":"2026-01-04T10:00:05Z","message":{"role":"user","content":"Fix the login bug"}}"#,
            "not json at all",
            r#"{"type":"assistant","timestamp":"2026-01-04T10:02:00Z","message":{"content":[{"type":"text","text":"Done"}]}}"#,
        ]);

        let summary = TranscriptSummary::read(file.path()).unwrap();
        assert_eq!(summary.cwd, Some(PathBuf::from("/work/api")));
        assert_eq!(summary.first_user_message.as_deref(), Some("Fix the login bug"));
        assert_eq!(
            summary.first_timestamp,
            Some(parse_timestamp("2026-01-04T10:00:00Z").unwrap())
        );
        assert_eq!(
            summary.last_timestamp,
            Some(parse_timestamp("2026-01-04T10:02:00Z").unwrap())
        );
        assert_eq!(summary.skipped_lines, 1);
    }

    #[test]
    fn test_block_content_and_tool_results() {
        let file = transcript(&[
            r#"{"type":"user","message":{"content":[{"type":"tool_result","content":"ok"}]}}"#,
            r#"{"type":"user","message":{"content":[{"type":"text","text":"Add"},{"type":"text","text":"tests"}]}}"#,
        ]);

        let summary = TranscriptSummary::read(file.path()).unwrap();
        assert_eq!(summary.first_user_message.as_deref(), Some("Add tests"));
        assert!(summary.first_timestamp.is_none());
    }

    #[test]
    fn test_read_cwd_stops_at_first_match() {
        let file = transcript(&[
            "{broken",
            r#"{"type":"system"}"#,
            r#"{"type":"user","cwd":"/first"}"#,
            r#"{"type":"user","cwd":"/second"}"#,
        ]);
        assert_eq!(
            TranscriptSummary::read_cwd(file.path()).unwrap(),
            Some(PathBuf::from("/first"))
        );
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"type":"user","cwd":"/work/api","message":{"content":"First"}}"#)
            .unwrap();
        file.write_all(b"\n\xff\xfe{\"type\":\"user\"}\n").unwrap();
        file.write_all(br#"{"type":"assistant","timestamp":"2026-01-04T10:02:00Z"}"#)
            .unwrap();
        file.write_all(b"\n").unwrap();

        let summary = TranscriptSummary::read(file.path()).unwrap();
        assert_eq!(summary.skipped_lines, 1);
        assert_eq!(summary.first_user_message.as_deref(), Some("First"));
        assert_eq!(
            summary.last_timestamp,
            Some(parse_timestamp("2026-01-04T10:02:00Z").unwrap())
        );
    }

    #[test]
    fn test_read_cwd_skips_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xfe\n").unwrap();
        file.write_all(br#"{"type":"user","cwd":"/after"}"#).unwrap();
        file.write_all(b"\n").unwrap();
        assert_eq!(
            TranscriptSummary::read_cwd(file.path()).unwrap(),
            Some(PathBuf::from("/after"))
        );
    }
}
