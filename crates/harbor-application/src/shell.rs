//! Host mount point for the workspace.
//!
//! The host builds the adapters, hands them over together with a "go back"
//! callback, and from then on talks to the workspace only through the shell.

use harbor_core::project::Project;
use harbor_core::session::Session;
use harbor_core::settings::PanelLayout;
use serde::Serialize;

use crate::orchestrator::{WorkspaceAdapters, WorkspaceOrchestrator};
use crate::project_list::FilteredProjects;
use crate::session::RenderKey;

/// Callback invoked when the user leaves the workspace.
pub type GoBack = Box<dyn FnMut() + Send>;

pub struct WorkspaceShell {
    orchestrator: WorkspaceOrchestrator,
    go_back: GoBack,
}

impl WorkspaceShell {
    /// Builds the orchestrator and runs its initial load.
    ///
    /// Adapter failures during the load are logged and leave the affected
    /// state at its defaults; mounting itself never fails.
    pub async fn mount(adapters: WorkspaceAdapters, go_back: GoBack) -> Self {
        Self::mount_with(WorkspaceOrchestrator::new(adapters), go_back).await
    }

    /// Like [`mount`](Self::mount) with a pre-configured orchestrator.
    pub async fn mount_with(mut orchestrator: WorkspaceOrchestrator, go_back: GoBack) -> Self {
        tracing::info!("[Workspace] Mounting workspace shell");
        orchestrator.initialize().await;
        Self {
            orchestrator,
            go_back,
        }
    }

    pub fn orchestrator(&self) -> &WorkspaceOrchestrator {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut WorkspaceOrchestrator {
        &mut self.orchestrator
    }

    /// Leaves the workspace.
    pub fn go_back(&mut self) {
        tracing::debug!("[Workspace] Leaving workspace");
        (self.go_back)();
    }

    /// Serializable view of the current state for the host UI.
    pub async fn snapshot(&self) -> WorkspaceSnapshot<'_> {
        let orchestrator = &self.orchestrator;
        WorkspaceSnapshot {
            projects: orchestrator.visible_projects(),
            search_query: orchestrator.search_query(),
            selected_project: orchestrator.selected_project(),
            sessions: orchestrator.sessions(),
            selected_session: orchestrator.selected_session().await,
            render_key: orchestrator.render_key(),
            loading_sessions: orchestrator.is_loading_sessions(),
            layout: orchestrator.layout(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot<'a> {
    pub projects: FilteredProjects<'a>,
    pub search_query: &'a str,
    pub selected_project: Option<&'a Project>,
    pub sessions: &'a [Session],
    pub selected_session: Option<Session>,
    pub render_key: Option<&'a RenderKey>,
    pub loading_sessions: bool,
    pub layout: &'a PanelLayout,
}
