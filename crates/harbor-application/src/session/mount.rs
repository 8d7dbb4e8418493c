//! Contract between the orchestrator and the conversation view.
//!
//! The view is mounted under a [`RenderKey`] and reads the selected session
//! through a shared [`SessionHandle`]. Reconciliation rewrites the session
//! behind the handle in place; the key is built from project identity and a
//! "mounted as new session" flag, so swapping the id never remounts the view.

use harbor_core::session::Session;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

/// Shared reference to the selected session.
pub type SessionHandle = Arc<RwLock<Session>>;

/// Identity under which the conversation view is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderKey {
    pub project_id: String,
    /// True when the view was opened through "new session"
    pub fresh: bool,
}

impl RenderKey {
    pub fn new(project_id: impl Into<String>, fresh: bool) -> Self {
        Self {
            project_id: project_id.into(),
            fresh,
        }
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.fresh { "new" } else { "existing" };
        write!(f, "{}:{}", self.project_id, kind)
    }
}

/// Notifications the conversation view sends back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The first user message of a placeholder was sent to the engine.
    MessageDispatched {
        placeholder_id: String,
        preview: String,
    },
    /// The engine answered with the session's real id.
    SessionCreated {
        placeholder_id: String,
        real_id: String,
    },
}

/// Callback handed to the view together with a placeholder mount.
///
/// `session_created` consumes the notifier, so a view can report the real id
/// at most once per placeholder.
#[derive(Debug)]
pub struct ViewNotifier {
    placeholder_id: String,
    sender: mpsc::UnboundedSender<ViewEvent>,
}

impl ViewNotifier {
    pub(crate) fn new(placeholder_id: String, sender: mpsc::UnboundedSender<ViewEvent>) -> Self {
        Self {
            placeholder_id,
            sender,
        }
    }

    pub fn placeholder_id(&self) -> &str {
        &self.placeholder_id
    }

    /// Reports that the first message went out.
    pub fn message_dispatched(&self, preview: impl Into<String>) {
        let event = ViewEvent::MessageDispatched {
            placeholder_id: self.placeholder_id.clone(),
            preview: preview.into(),
        };
        if self.sender.send(event).is_err() {
            tracing::debug!("[View] Orchestrator gone, dropping dispatch notice");
        }
    }

    /// Reports the engine-assigned id.
    pub fn session_created(self, real_id: impl Into<String>) {
        let event = ViewEvent::SessionCreated {
            placeholder_id: self.placeholder_id,
            real_id: real_id.into(),
        };
        if self.sender.send(event).is_err() {
            tracing::debug!("[View] Orchestrator gone, dropping session-created notice");
        }
    }
}

/// Everything the conversation view receives when it is (re)rendered.
#[derive(Debug)]
pub struct ConversationMount {
    pub key: RenderKey,
    pub session: SessionHandle,
    pub project_path: PathBuf,
    /// Present only on the mount returned by "new session"
    pub notifier: Option<ViewNotifier>,
}

/// Result of a reconciliation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The placeholder now carries the real id.
    Reconciled {
        placeholder_id: String,
        session_id: String,
    },
    /// No matching placeholder was selected; nothing changed.
    Stale,
}

impl ReconcileOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_key_display() {
        assert_eq!(RenderKey::new("P1", true).to_string(), "P1:new");
        assert_eq!(RenderKey::new("P1", false).to_string(), "P1:existing");
    }

    #[test]
    fn test_notifier_sends_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = ViewNotifier::new("new-session-1".into(), tx);
        notifier.message_dispatched("hi");
        notifier.session_created("R1");

        assert_eq!(
            rx.try_recv().unwrap(),
            ViewEvent::MessageDispatched {
                placeholder_id: "new-session-1".into(),
                preview: "hi".into()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewEvent::SessionCreated {
                placeholder_id: "new-session-1".into(),
                real_id: "R1".into()
            }
        );
    }
}
