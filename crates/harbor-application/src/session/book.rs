//! Per-project session lists.
//!
//! Each project's list holds the confirmed sessions loaded from history and,
//! at the head, at most one provisional session.

use harbor_core::session::Session;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SessionBook {
    by_project: HashMap<String, Vec<Session>>,
}

impl SessionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions of a project, provisional first.
    pub fn sessions(&self, project_id: &str) -> &[Session] {
        self.by_project
            .get(project_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find(&self, project_id: &str, session_id: &str) -> Option<&Session> {
        self.sessions(project_id).iter().find(|s| s.id == session_id)
    }

    /// The provisional session of a project, if any.
    pub fn placeholder(&self, project_id: &str) -> Option<&Session> {
        self.sessions(project_id).iter().find(|s| s.is_placeholder())
    }

    pub fn placeholder_count(&self, project_id: &str) -> usize {
        self.sessions(project_id)
            .iter()
            .filter(|s| s.is_placeholder())
            .count()
    }

    /// Replaces the confirmed sessions of a project with freshly loaded ones.
    ///
    /// An existing provisional session stays at the head. Duplicate ids in
    /// `loaded` keep their first occurrence.
    pub fn replace_confirmed(&mut self, project_id: &str, loaded: Vec<Session>) {
        let placeholder = self.placeholder(project_id).cloned();

        let mut sessions = Vec::with_capacity(loaded.len() + 1);
        sessions.extend(placeholder);
        for session in loaded {
            if session.is_placeholder() || sessions.iter().any(|s: &Session| s.id == session.id) {
                continue;
            }
            sessions.push(session);
        }
        self.by_project.insert(project_id.to_string(), sessions);
    }

    /// Inserts a provisional session at the head, replacing any previous one.
    ///
    /// Returns the replaced placeholder.
    pub fn put_placeholder(&mut self, session: Session) -> Option<Session> {
        let sessions = self.by_project.entry(session.project_id.clone()).or_default();
        let replaced = sessions
            .iter()
            .position(|s| s.is_placeholder())
            .map(|index| sessions.remove(index));
        sessions.insert(0, session);
        replaced
    }

    /// Mutates the provisional session with the given id in place.
    pub fn update_placeholder<F>(&mut self, project_id: &str, placeholder_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Session),
    {
        match self
            .by_project
            .get_mut(project_id)
            .and_then(|list| list.iter_mut().find(|s| s.id == placeholder_id && s.is_placeholder()))
        {
            Some(session) => {
                f(session);
                true
            }
            None => false,
        }
    }

    /// Swaps a provisional entry for its confirmed successor.
    ///
    /// The placeholder is removed, any entry already carrying the confirmed id
    /// is dropped, and the confirmed session goes to the head.
    pub fn promote(&mut self, project_id: &str, placeholder_id: &str, confirmed: Session) {
        let sessions = self.by_project.entry(project_id.to_string()).or_default();
        sessions.retain(|s| s.id != placeholder_id && s.id != confirmed.id);
        sessions.insert(0, confirmed);
    }

    pub fn forget_project(&mut self, project_id: &str) {
        self.by_project.remove(project_id);
    }
}
