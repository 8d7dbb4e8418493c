//! Session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::project::Project;

/// Prefix carried by every locally generated placeholder session id.
///
/// Engine ids are bare UUIDs or opaque tokens; none start with this prefix, so
/// a placeholder can never be mistaken for a real session.
pub const PLACEHOLDER_PREFIX: &str = "new-session-";

/// Returns true if `id` was generated locally as a placeholder.
pub fn is_placeholder_id(id: &str) -> bool {
    id.starts_with(PLACEHOLDER_PREFIX)
}

/// Generates a fresh placeholder session id.
pub fn new_placeholder_id() -> String {
    format!("{}{}", PLACEHOLDER_PREFIX, Uuid::new_v4().simple())
}

/// Lifecycle state of a session.
///
/// ```text
/// Placeholder ──dispatch──▶ Reconciling ──engine id──▶ Confirmed
///      └────────────────engine id────────────────────────┘
/// ```
///
/// Sessions loaded from history are `Confirmed` from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Created locally, nothing sent to the engine yet
    Placeholder,
    /// First message dispatched, waiting for the engine-assigned id
    Reconciling,
    /// Carries a real engine id that never changes again
    Confirmed,
}

impl SessionStatus {
    /// Whether the session still awaits its engine id.
    pub fn is_provisional(self) -> bool {
        matches!(self, Self::Placeholder | Self::Reconciling)
    }
}

/// One conversation thread scoped to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Engine id, or a placeholder id while provisional
    pub id: String,
    /// Owning project's id
    pub project_id: String,
    /// Owning project's path, carried for operations that only need the path
    pub project_path: PathBuf,
    /// Creation time (placeholder creation time for provisional sessions)
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    /// Short text shown in the session list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_message_preview: Option<String>,
    /// Time of the latest recorded activity, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a placeholder session for `project`, timestamped now.
    pub fn placeholder(project: &Project) -> Self {
        Self {
            id: new_placeholder_id(),
            project_id: project.id.clone(),
            project_path: project.path.clone(),
            created_at: Utc::now(),
            status: SessionStatus::Placeholder,
            first_message_preview: None,
            last_activity: None,
        }
    }

    /// Creates a confirmed session as reported by the engine.
    pub fn confirmed(
        id: impl Into<String>,
        project_id: impl Into<String>,
        project_path: impl Into<PathBuf>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            project_path: project_path.into(),
            created_at,
            status: SessionStatus::Confirmed,
            first_message_preview: None,
            last_activity: None,
        }
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.first_message_preview = Some(preview.into());
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.status.is_provisional()
    }

    /// Records that the first message went out to the engine.
    ///
    /// Only a `Placeholder` moves; other states are left untouched and the
    /// method returns false.
    pub fn mark_dispatched(&mut self, preview: Option<String>) -> bool {
        if self.status != SessionStatus::Placeholder {
            return false;
        }
        self.status = SessionStatus::Reconciling;
        if self.first_message_preview.is_none() {
            self.first_message_preview = preview;
        }
        true
    }

    /// Swaps the provisional id for the engine-assigned one.
    ///
    /// Returns false (and changes nothing) if the session is already confirmed.
    /// `created_at` keeps the placeholder creation time.
    pub fn confirm(&mut self, real_id: impl Into<String>) -> bool {
        if !self.status.is_provisional() {
            return false;
        }
        self.id = real_id.into();
        self.status = SessionStatus::Confirmed;
        true
    }
}

/// Cuts `text` to at most `max_chars` characters on a char boundary,
/// collapsing internal whitespace and appending an ellipsis when shortened.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
