//! Read-only adapters over the engine's session history.

pub mod discovery;
pub mod sessions;
pub mod transcript;

use async_trait::async_trait;
use harbor_core::config::{DEFAULT_PREVIEW_CHARS, HarborConfig};
use harbor_core::error::{HarborError, Result};
use harbor_core::project::{Project, ProjectDiscovery};
use harbor_core::session::{Session, SessionSource};
use std::path::{Path, PathBuf};

use crate::paths::HarborPaths;

/// Engine history rooted at `<engine_home>/projects`.
///
/// Serves both as the project discovery adapter and as the session source.
#[derive(Debug, Clone)]
pub struct EngineHistory {
    projects_dir: PathBuf,
    preview_chars: usize,
}

impl EngineHistory {
    pub fn new(engine_home: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: engine_home.into().join("projects"),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    pub fn from_config(config: &HarborConfig) -> Result<Self> {
        let home = HarborPaths::engine_home(config)?;
        Ok(Self::new(home).with_preview_chars(config.preview_chars))
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars.max(1);
        self
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Directory holding a project's transcripts, if the engine has one.
    ///
    /// Discovered projects are named after their directory; registered ones
    /// are looked up through the engine's path encoding.
    pub fn project_dir(&self, project: &Project) -> Option<PathBuf> {
        let dir = if project.is_registered() {
            self.projects_dir.join(discovery::encode_path(&project.path))
        } else {
            self.projects_dir.join(&project.id)
        };
        dir.is_dir().then_some(dir)
    }
}

async fn run_blocking<R, F>(f: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| HarborError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl ProjectDiscovery for EngineHistory {
    async fn list_discovered_projects(&self) -> Result<Vec<Project>> {
        let dir = self.projects_dir.clone();
        run_blocking(move || discovery::scan_projects(&dir)).await
    }
}

#[async_trait]
impl SessionSource for EngineHistory {
    async fn list_sessions(&self, project: &Project) -> Result<Vec<Session>> {
        let Some(dir) = self.project_dir(project) else {
            tracing::debug!("[Discovery] No history for project {}", project.id);
            return Ok(Vec::new());
        };
        let project = project.clone();
        let preview_chars = self.preview_chars;
        run_blocking(move || sessions::scan_sessions(&dir, &project, preview_chars)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sessions_for_registered_and_discovered_projects() {
        let temp = TempDir::new().unwrap();
        let history = EngineHistory::new(temp.path());
        let dir = history.projects_dir().join("-work-api");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("abc.jsonl"), "{\"type\":\"user\",\"cwd\":\"/work/api\"}\n").unwrap();

        let discovered = history.list_discovered_projects().await.unwrap();
        assert_eq!(discovered.len(), 1);
        let sessions = history.list_sessions(&discovered[0]).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "abc");
        assert_eq!(sessions[0].project_id, "-work-api");

        let registered = Project::registered(1, "/work/api", None);
        let sessions = history.list_sessions(&registered).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].project_id, registered.id);
    }

    #[tokio::test]
    async fn test_project_without_history_has_no_sessions() {
        let temp = TempDir::new().unwrap();
        let history = EngineHistory::new(temp.path());
        let project = Project::registered(1, "/nowhere", None);
        assert!(history.list_sessions(&project).await.unwrap().is_empty());
    }
}
