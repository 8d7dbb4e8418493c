//! Session source trait.

use super::model::Session;
use crate::error::Result;
use crate::project::Project;
use async_trait::async_trait;

/// Read-only access to the engine's recorded sessions.
///
/// Only confirmed sessions are ever returned; placeholders live exclusively in
/// the orchestrator's memory.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Lists the sessions recorded for `project`, most recent first.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Session>)`: possibly empty list of confirmed sessions
    /// - `Err(_)`: the history could not be read
    async fn list_sessions(&self, project: &Project) -> Result<Vec<Session>>;
}
