use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Where a project entry in the merged list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectOrigin {
    /// Explicitly added by the user and tracked in the local registry.
    UserRegistered,
    /// Enumerated from the backing engine's conversation history.
    Discovered,
}

/// One filesystem directory the user can converse about.
///
/// Registered and discovered entries are never unified, even when they point
/// at the same path: the two id spaces are generated independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Stable external identifier, unique within the merged list
    pub id: String,
    /// Absolute filesystem path of the project root
    pub path: PathBuf,
    /// Which source produced this entry
    pub origin: ProjectOrigin,
    /// Registry primary key; only present for `UserRegistered` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<i64>,
    /// Advisory number of sessions, for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_count: Option<usize>,
    /// Optional display name chosen by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Project {
    /// Builds a user-registered project whose id is derived from its path.
    pub fn registered(internal_id: i64, path: impl Into<PathBuf>, name: Option<String>) -> Self {
        let path = path.into();
        Self {
            id: project_id_for_path(&path),
            path,
            origin: ProjectOrigin::UserRegistered,
            internal_id: Some(internal_id),
            session_count: None,
            name,
        }
    }

    /// Builds a discovered project with an engine-provided id.
    pub fn discovered(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        session_count: Option<usize>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            origin: ProjectOrigin::Discovered,
            internal_id: None,
            session_count,
            name: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.origin == ProjectOrigin::UserRegistered
    }

    /// Returns the user-chosen name, or the last path component.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Case-insensitive substring match against path, id and display name.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.path
            .to_string_lossy()
            .to_lowercase()
            .contains(needle)
            || self.id.to_lowercase().contains(needle)
            || self
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

/// Generates a deterministic project id from a filesystem path.
///
/// A UUID v5 over the path string, so the same directory always maps to the
/// same id across restarts and reinstalls.
pub fn project_id_for_path(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    Uuid::new_v5(&Uuid::NAMESPACE_OID, path_str.as_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_id_is_path_derived() {
        let a = Project::registered(1, "/work/a", None);
        let b = Project::registered(7, "/work/a", Some("renamed".into()));
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, Project::registered(1, "/work/b", None).id);
        assert_eq!(a.internal_id, Some(1));
        assert!(a.is_registered());
    }

    #[test]
    fn test_discovered_has_no_internal_id() {
        let p = Project::discovered("-work-a", "/work/a", Some(3));
        assert_eq!(p.origin, ProjectOrigin::Discovered);
        assert!(p.internal_id.is_none());
        assert_eq!(p.session_count, Some(3));
    }

    #[test]
    fn test_display_name_falls_back_to_last_component() {
        assert_eq!(Project::registered(1, "/work/app", None).display_name(), "app");
        assert_eq!(
            Project::registered(1, "/work/app", Some("My App".into())).display_name(),
            "My App"
        );
        assert_eq!(
            Project::registered(1, "/work/app", Some("  ".into())).display_name(),
            "app"
        );
    }

    #[test]
    fn test_matches_path_id_and_name() {
        let p = Project::discovered("Engine-ID", "/Users/Me/Repo", None);
        assert!(p.matches("repo"));
        assert!(p.matches("engine-id"));
        assert!(!p.matches("other"));

        let named = Project::registered(1, "/x/y", Some("Billing".into()));
        assert!(named.matches("bill"));
    }
}
