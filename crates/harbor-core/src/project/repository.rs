//! Project source traits.
//!
//! Defines the two independent sources feeding the merged project list.

use super::model::Project;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Durable registry of projects the user added explicitly.
///
/// Records are soft-deleted: `remove_registered_project` marks a record
/// inactive and it disappears from `list_registered_projects`.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Derive the external project id from the path (see `project_id_for_path`)
/// - Reject a second active record with the same path
/// - Return entries in a stable order (creation order)
#[async_trait]
pub trait ProjectRegistry: Send + Sync {
    /// Lists active registered projects.
    async fn list_registered_projects(&self) -> Result<Vec<Project>>;

    /// Creates a registry record for `path`.
    ///
    /// # Errors
    ///
    /// - `HarborError::InaccessiblePath`: the path is missing or not a directory
    /// - `HarborError::DuplicatePath`: an active record already uses this path
    async fn create_registered_project(&self, path: &Path, name: Option<String>)
    -> Result<Project>;

    /// Soft-deletes the record with the given internal id.
    ///
    /// # Errors
    ///
    /// - `HarborError::NotFound`: no active record has this id
    async fn remove_registered_project(&self, internal_id: i64) -> Result<()>;

    /// Changes the display name of a record.
    ///
    /// Passing `None` clears the name so the path's last component is shown.
    async fn rename_registered_project(
        &self,
        internal_id: i64,
        name: Option<String>,
    ) -> Result<Project>;
}

/// Read-only view of the projects the backing engine already has history for.
#[async_trait]
pub trait ProjectDiscovery: Send + Sync {
    /// Lists discovered projects. Must either succeed completely or fail.
    async fn list_discovered_projects(&self) -> Result<Vec<Project>>;
}
