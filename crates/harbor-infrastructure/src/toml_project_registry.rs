//! TOML-backed project registry.
//!
//! Stores user-registered projects in `projects.toml`:
//!
//! ```toml
//! next_id = 3
//!
//! [[projects]]
//! internal_id = 1
//! external_id = "6f1c..."
//! path = "/home/me/work/api"
//! name = "API"
//! is_active = true
//! created_at = "2026-01-04T10:00:00Z"
//! updated_at = "2026-01-04T10:00:00Z"
//! ```

use crate::paths::HarborPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use harbor_core::error::{HarborError, Result};
use harbor_core::project::{Project, ProjectRegistry, project_id_for_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectsFile {
    /// Next internal id to hand out. Ids are never reused.
    next_id: i64,
    #[serde(default)]
    projects: Vec<ProjectRecord>,
}

impl Default for ProjectsFile {
    fn default() -> Self {
        Self {
            next_id: 1,
            projects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectRecord {
    internal_id: i64,
    external_id: String,
    path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    fn to_project(&self) -> Project {
        let mut project = Project::registered(self.internal_id, &self.path, self.name.clone());
        project.id = self.external_id.clone();
        project
    }
}

/// Project registry persisted in a single TOML file.
///
/// Records are soft-deleted. Registering a path whose record was removed
/// earlier reactivates that record, so the project keeps its internal id.
#[derive(Clone)]
pub struct TomlProjectRegistry {
    file: Arc<AtomicTomlFile<ProjectsFile>>,
}

impl TomlProjectRegistry {
    pub fn new(paths: &HarborPaths) -> Self {
        Self::with_file(paths.projects_file())
    }

    pub fn with_file(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    /// Runs blocking file I/O off the async runtime.
    async fn blocking<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicTomlFile<ProjectsFile>) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(file.as_ref()))
            .await
            .map_err(|e| HarborError::internal(format!("Failed to join task: {}", e)))?
    }
}

fn validate_directory(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| HarborError::inaccessible(path, e.to_string()))?;
    if !metadata.is_dir() {
        return Err(HarborError::inaccessible(path, "not a directory"));
    }
    Ok(())
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[async_trait]
impl ProjectRegistry for TomlProjectRegistry {
    async fn list_registered_projects(&self) -> Result<Vec<Project>> {
        self.blocking(|file| {
            let data = file.load_or_default()?;
            let mut records: Vec<_> = data.projects.iter().filter(|r| r.is_active).collect();
            records.sort_by_key(|r| r.internal_id);
            Ok(records.into_iter().map(ProjectRecord::to_project).collect())
        })
        .await
    }

    async fn create_registered_project(
        &self,
        path: &Path,
        name: Option<String>,
    ) -> Result<Project> {
        validate_directory(path)?;

        let path = path.to_path_buf();
        let name = normalize_name(name);
        let project = self
            .blocking(move |file| {
                file.update(ProjectsFile::default(), |data| {
                    let now = Utc::now();
                    if let Some(record) = data.projects.iter_mut().find(|r| r.path == path) {
                        if record.is_active {
                            return Err(HarborError::DuplicatePath(path.clone()));
                        }
                        tracing::info!(
                            "[Registry] Reactivating project #{} at {}",
                            record.internal_id,
                            path.display()
                        );
                        record.is_active = true;
                        if name.is_some() {
                            record.name = name;
                        }
                        record.updated_at = now;
                        return Ok(record.to_project());
                    }

                    let record = ProjectRecord {
                        internal_id: data.next_id,
                        external_id: project_id_for_path(&path),
                        path: path.clone(),
                        name,
                        is_active: true,
                        created_at: now,
                        updated_at: now,
                    };
                    data.next_id += 1;
                    let project = record.to_project();
                    data.projects.push(record);
                    Ok(project)
                })
            })
            .await?;

        tracing::info!(
            "[Registry] Registered project #{:?} at {}",
            project.internal_id,
            project.path.display()
        );
        Ok(project)
    }

    async fn remove_registered_project(&self, internal_id: i64) -> Result<()> {
        self.blocking(move |file| {
            file.update(ProjectsFile::default(), |data| {
                let record = data
                    .projects
                    .iter_mut()
                    .find(|r| r.internal_id == internal_id && r.is_active)
                    .ok_or_else(|| HarborError::not_found("project", internal_id.to_string()))?;
                record.is_active = false;
                record.updated_at = Utc::now();
                Ok(())
            })
        })
        .await?;

        tracing::info!("[Registry] Soft-deleted project #{}", internal_id);
        Ok(())
    }

    async fn rename_registered_project(
        &self,
        internal_id: i64,
        name: Option<String>,
    ) -> Result<Project> {
        let name = normalize_name(name);
        self.blocking(move |file| {
            file.update(ProjectsFile::default(), |data| {
                let record = data
                    .projects
                    .iter_mut()
                    .find(|r| r.internal_id == internal_id && r.is_active)
                    .ok_or_else(|| HarborError::not_found("project", internal_id.to_string()))?;
                record.name = name;
                record.updated_at = Utc::now();
                Ok(record.to_project())
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        registry: TomlProjectRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let registry = TomlProjectRegistry::with_file(temp.path().join("projects.toml"));
            Self { temp, registry }
        }

        fn dir(&self, name: &str) -> PathBuf {
            let dir = self.temp.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            dir
        }
    }

    #[tokio::test]
    async fn test_create_and_list_in_creation_order() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        let b = fx.dir("b");

        let first = fx.registry.create_registered_project(&a, None).await.unwrap();
        let second = fx
            .registry
            .create_registered_project(&b, Some("  Bee ".into()))
            .await
            .unwrap();

        assert_eq!(first.internal_id, Some(1));
        assert_eq!(second.internal_id, Some(2));
        assert_eq!(second.name.as_deref(), Some("Bee"));
        assert_eq!(first.id, project_id_for_path(&a));

        let listed = fx.registry.list_registered_projects().await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn test_duplicate_path_is_rejected() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        fx.registry.create_registered_project(&a, None).await.unwrap();

        let err = fx
            .registry
            .create_registered_project(&a, None)
            .await
            .unwrap_err();
        assert!(err.is_duplicate_path());
        assert_eq!(fx.registry.list_registered_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_inaccessible_paths_are_rejected() {
        let fx = Fixture::new();
        let missing = fx.temp.path().join("missing");
        let file = fx.temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        for path in [missing, file] {
            let err = fx
                .registry
                .create_registered_project(&path, None)
                .await
                .unwrap_err();
            assert!(err.is_inaccessible_path(), "{:?}", err);
        }
        assert!(fx.registry.list_registered_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_then_readd_reactivates_record() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        let b = fx.dir("b");
        let project = fx.registry.create_registered_project(&a, None).await.unwrap();
        fx.registry.create_registered_project(&b, None).await.unwrap();

        fx.registry.remove_registered_project(1).await.unwrap();
        assert_eq!(fx.registry.list_registered_projects().await.unwrap().len(), 1);

        let again = fx.registry.create_registered_project(&a, None).await.unwrap();
        assert_eq!(again.internal_id, Some(1));
        assert_eq!(again.id, project.id);

        // Ids keep increasing after reactivation.
        let c = fx.dir("c");
        let third = fx.registry.create_registered_project(&c, None).await.unwrap();
        assert_eq!(third.internal_id, Some(3));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_not_found() {
        let fx = Fixture::new();
        let err = fx.registry.remove_registered_project(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_rename_and_clear_name() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        fx.registry.create_registered_project(&a, None).await.unwrap();

        let renamed = fx
            .registry
            .rename_registered_project(1, Some("Alpha".into()))
            .await
            .unwrap();
        assert_eq!(renamed.display_name(), "Alpha");

        let cleared = fx.registry.rename_registered_project(1, Some("  ".into())).await.unwrap();
        assert_eq!(cleared.name, None);
        assert_eq!(cleared.display_name(), "a");
    }

    #[tokio::test]
    async fn test_records_survive_new_instance() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        fx.registry.create_registered_project(&a, None).await.unwrap();

        let reopened = TomlProjectRegistry::with_file(fx.temp.path().join("projects.toml"));
        let listed = reopened.list_registered_projects().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].path, a);
    }
}
