//! Workspace orchestrator.
//!
//! Owns all UI-facing workspace state: the merged project list, the selected
//! project and session, per-project session lists, and the panel layout.
//! Views read it through accessors and change it only through the methods
//! below.

use harbor_core::config::DEFAULT_PREVIEW_CHARS;
use harbor_core::error::{HarborError, Result};
use harbor_core::project::{Project, ProjectDiscovery, ProjectRegistry};
use harbor_core::session::{Session, SessionSource, is_placeholder_id, truncate_preview};
use harbor_core::settings::{LayoutChange, PanelLayout, SettingsStore};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

use crate::layout_service::LayoutService;
use crate::project_list::{FilteredProjects, ProjectList};
use crate::session::{
    ConversationMount, ReconcileOutcome, RenderKey, SessionBook, SessionHandle, ViewEvent,
    ViewNotifier,
};

/// External collaborators consumed by the orchestrator.
#[derive(Clone)]
pub struct WorkspaceAdapters {
    pub registry: Arc<dyn ProjectRegistry>,
    pub discovery: Arc<dyn ProjectDiscovery>,
    pub sessions: Arc<dyn SessionSource>,
    pub settings: Arc<dyn SettingsStore>,
}

/// Ticket for a session-list load started by [`WorkspaceOrchestrator::begin_session_load`].
///
/// A ticket is only honored while the selection it was issued for is still
/// current; results for an abandoned selection are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLoad {
    generation: u64,
    project: Project,
}

impl SessionLoad {
    pub fn project(&self) -> &Project {
        &self.project
    }
}

struct ActiveSession {
    key: RenderKey,
    handle: SessionHandle,
}

pub struct WorkspaceOrchestrator {
    adapters: WorkspaceAdapters,
    projects: ProjectList,
    search_query: String,
    sessions: SessionBook,
    selected_project: Option<Project>,
    active: Option<ActiveSession>,
    layout: LayoutService,
    /// Bumped on every project selection change; stale load tickets compare against it.
    generation: u64,
    loading_sessions: bool,
    preview_chars: usize,
    events_tx: mpsc::UnboundedSender<ViewEvent>,
    events_rx: mpsc::UnboundedReceiver<ViewEvent>,
}

impl WorkspaceOrchestrator {
    pub fn new(adapters: WorkspaceAdapters) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let layout = LayoutService::new(adapters.settings.clone());
        Self {
            adapters,
            projects: ProjectList::default(),
            search_query: String::new(),
            sessions: SessionBook::new(),
            selected_project: None,
            active: None,
            layout,
            generation: 0,
            loading_sessions: false,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            events_tx,
            events_rx,
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars.max(1);
        self
    }

    /// Loads layout, projects, and restores the last confirmed selection.
    pub async fn initialize(&mut self) {
        self.layout.load().await;
        self.refresh_projects().await;
        self.restore_last_selection().await;
    }

    async fn restore_last_selection(&mut self) {
        let last = self.layout.last_selection().clone();
        let Some(project_id) = last.project_id else {
            return;
        };

        if self.projects.find(&project_id).is_none() {
            tracing::debug!("[Workspace] Last project '{}' no longer listed", project_id);
            return;
        }
        if let Err(e) = self.select_project(&project_id).await {
            tracing::warn!("[Workspace] Failed to restore project '{}': {}", project_id, e);
            return;
        }

        let Some(session_id) = last.session_id else {
            return;
        };
        match self.sessions.find(&project_id, &session_id).cloned() {
            Some(session) if !session.is_placeholder() => {
                tracing::info!(
                    "[Workspace] Restored selection {}/{}",
                    project_id,
                    session_id
                );
                self.activate(session, false);
            }
            _ => tracing::debug!(
                "[Workspace] Last session '{}' not found in project '{}'",
                session_id,
                project_id
            ),
        }
    }

    // ============================================================================
    // Projects
    // ============================================================================

    /// Reloads both project sources.
    ///
    /// If either source fails the merged list becomes empty rather than
    /// partial, and any selection goes with it. Returns whether the load
    /// succeeded.
    pub async fn refresh_projects(&mut self) -> bool {
        let (registered, discovered) = tokio::join!(
            self.adapters.registry.list_registered_projects(),
            self.adapters.discovery.list_discovered_projects(),
        );

        match (registered, discovered) {
            (Ok(registered), Ok(discovered)) => {
                tracing::info!(
                    "[Workspace] Loaded {} registered and {} discovered projects",
                    registered.len(),
                    discovered.len()
                );
                self.projects = ProjectList::new(registered, discovered);
                self.resync_selected_project();
                true
            }
            (registered, discovered) => {
                if let Err(e) = registered {
                    tracing::error!("[Workspace] Failed to list registered projects: {}", e);
                }
                if let Err(e) = discovered {
                    tracing::error!("[Workspace] Failed to list discovered projects: {}", e);
                }
                self.projects = ProjectList::default();
                if self.selected_project.is_some() {
                    tracing::info!("[Workspace] Clearing selection after failed project load");
                    self.clear_project_selection();
                }
                false
            }
        }
    }

    /// Keeps the selected project in step with a freshly loaded list.
    fn resync_selected_project(&mut self) {
        let Some(selected_id) = self.selected_project.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        match self.projects.find(&selected_id) {
            Some(project) => self.selected_project = Some(project.clone()),
            None => {
                tracing::info!("[Workspace] Selected project '{}' disappeared", selected_id);
                self.clear_project_selection();
            }
        }
    }

    pub fn projects(&self) -> &ProjectList {
        &self.projects
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// The project list filtered by the current search query.
    pub fn visible_projects(&self) -> FilteredProjects<'_> {
        self.projects.filter(&self.search_query)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_project.as_ref()
    }

    /// Selects a project, clears the session selection and loads its sessions.
    ///
    /// Re-selecting the current project is a no-op.
    pub async fn select_project(&mut self, project_id: &str) -> Result<()> {
        let project = self
            .projects
            .find(project_id)
            .cloned()
            .ok_or_else(|| HarborError::not_found("project", project_id))?;

        if self
            .selected_project
            .as_ref()
            .is_some_and(|current| current.id == project.id)
        {
            return Ok(());
        }

        tracing::info!("[Workspace] Selected project {}", project.path.display());
        self.selected_project = Some(project);
        self.active = None;
        self.generation += 1;
        self.load_sessions().await;
        Ok(())
    }

    pub fn clear_project_selection(&mut self) {
        self.selected_project = None;
        self.active = None;
        self.loading_sessions = false;
        self.generation += 1;
    }

    /// Registers a new project and refreshes the merged list.
    ///
    /// # Errors
    ///
    /// `DuplicatePath` and `InaccessiblePath` from the registry are returned
    /// unchanged and leave the workspace state untouched.
    pub async fn add_project(&mut self, path: &Path, name: Option<String>) -> Result<Project> {
        let project = self
            .adapters
            .registry
            .create_registered_project(path, name)
            .await
            .inspect_err(|e| tracing::warn!("[Workspace] Failed to add project: {}", e))?;

        tracing::info!(
            "[Workspace] Registered project {} ({})",
            project.path.display(),
            project.id
        );
        self.refresh_projects().await;
        Ok(project)
    }

    /// Soft-deletes a registered project.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no project with this id is listed
    /// - `OrphanedInternalId`: the project has no registry record (e.g. it was discovered)
    pub async fn remove_project(&mut self, project_id: &str) -> Result<()> {
        let internal_id = self.resolve_internal_id(project_id)?;

        self.adapters
            .registry
            .remove_registered_project(internal_id)
            .await
            .inspect_err(|e| tracing::warn!("[Workspace] Failed to remove project: {}", e))?;

        tracing::info!("[Workspace] Removed project {}", project_id);
        if self
            .selected_project
            .as_ref()
            .is_some_and(|p| p.id == project_id)
        {
            self.clear_project_selection();
        }
        self.sessions.forget_project(project_id);
        self.refresh_projects().await;
        Ok(())
    }

    /// Changes the display name of a registered project.
    pub async fn rename_project(&mut self, project_id: &str, name: Option<String>) -> Result<Project> {
        let internal_id = self.resolve_internal_id(project_id)?;
        let project = self
            .adapters
            .registry
            .rename_registered_project(internal_id, name)
            .await?;
        self.refresh_projects().await;
        Ok(project)
    }

    fn resolve_internal_id(&self, project_id: &str) -> Result<i64> {
        let project = self
            .projects
            .find(project_id)
            .ok_or_else(|| HarborError::not_found("project", project_id))?;

        project.internal_id.ok_or_else(|| {
            let err = HarborError::OrphanedInternalId(project_id.to_string());
            tracing::error!("[Workspace] {}", err);
            err
        })
    }

    // ============================================================================
    // Session lists
    // ============================================================================

    /// Starts loading the selected project's sessions.
    ///
    /// Hosts that fetch on another task pair this with
    /// [`apply_session_load`](Self::apply_session_load); the latest selection
    /// always wins.
    pub fn begin_session_load(&mut self) -> Option<SessionLoad> {
        let project = self.selected_project.clone()?;
        self.loading_sessions = true;
        Some(SessionLoad {
            generation: self.generation,
            project,
        })
    }

    /// Applies a finished load. Returns false if the ticket was stale.
    pub fn apply_session_load(&mut self, ticket: SessionLoad, result: Result<Vec<Session>>) -> bool {
        let current = ticket.generation == self.generation
            && self
                .selected_project
                .as_ref()
                .is_some_and(|p| p.id == ticket.project.id);
        if !current {
            tracing::debug!(
                "[Workspace] Discarding session list for abandoned project {}",
                ticket.project.id
            );
            return false;
        }

        self.loading_sessions = false;
        match result {
            Ok(sessions) => {
                tracing::debug!(
                    "[Workspace] Loaded {} sessions for {}",
                    sessions.len(),
                    ticket.project.id
                );
                self.sessions.replace_confirmed(&ticket.project.id, sessions);
            }
            Err(e) => {
                tracing::error!(
                    "[Workspace] Failed to list sessions for {}: {}",
                    ticket.project.id,
                    e
                );
                self.sessions.replace_confirmed(&ticket.project.id, Vec::new());
            }
        }
        true
    }

    /// Loads the selected project's sessions through the session source.
    pub async fn load_sessions(&mut self) -> bool {
        let Some(ticket) = self.begin_session_load() else {
            return false;
        };
        let result = self.adapters.sessions.list_sessions(ticket.project()).await;
        self.apply_session_load(ticket, result)
    }

    pub fn is_loading_sessions(&self) -> bool {
        self.loading_sessions
    }

    /// Sessions of the selected project, provisional first.
    pub fn sessions(&self) -> &[Session] {
        match &self.selected_project {
            Some(project) => self.sessions.sessions(&project.id),
            None => &[],
        }
    }

    pub fn placeholder_count(&self, project_id: &str) -> usize {
        self.sessions.placeholder_count(project_id)
    }

    // ============================================================================
    // Session lifecycle
    // ============================================================================

    /// Opens a placeholder session on the selected project.
    ///
    /// Any previous placeholder of the project is replaced. The returned mount
    /// carries the notifier the view uses to report the engine id.
    pub fn new_session(&mut self) -> Result<ConversationMount> {
        let project = self
            .selected_project
            .clone()
            .ok_or_else(|| HarborError::not_found("project", "(no selection)"))?;

        let session = Session::placeholder(&project);
        if let Some(replaced) = self.sessions.put_placeholder(session.clone()) {
            tracing::debug!("[Workspace] Replaced placeholder {}", replaced.id);
        }
        tracing::info!(
            "[Workspace] Opened placeholder {} on {}",
            session.id,
            project.id
        );

        Ok(self.activate(session, true))
    }

    /// Selects a session from the selected project's list.
    ///
    /// Confirmed choices are persisted for the next start; placeholders are not.
    /// Re-selecting the session that is already active returns the current
    /// mount unchanged, without a new notifier.
    pub async fn select_session(&mut self, session_id: &str) -> Result<ConversationMount> {
        let project = self
            .selected_project
            .clone()
            .ok_or_else(|| HarborError::not_found("project", "(no selection)"))?;

        if self.is_active_session(session_id).await {
            if let Some(mount) = self.mount() {
                tracing::debug!("[Workspace] Session {} already active", session_id);
                return Ok(mount);
            }
        }
        let session = self
            .sessions
            .find(&project.id, session_id)
            .cloned()
            .ok_or_else(|| HarborError::not_found("session", session_id))?;

        let provisional = session.is_placeholder();
        let mount = self.activate(session, provisional);
        if !provisional {
            self.layout.persist_selection(&project.id, session_id).await;
        }
        Ok(mount)
    }

    async fn is_active_session(&self, session_id: &str) -> bool {
        match &self.active {
            Some(active) => active.handle.read().await.id == session_id,
            None => false,
        }
    }

    fn activate(&mut self, session: Session, fresh: bool) -> ConversationMount {
        let notifier = session
            .is_placeholder()
            .then(|| ViewNotifier::new(session.id.clone(), self.events_tx.clone()));
        let key = RenderKey::new(session.project_id.clone(), fresh);
        let project_path = session.project_path.clone();
        let handle = Arc::new(RwLock::new(session));

        self.active = Some(ActiveSession {
            key: key.clone(),
            handle: handle.clone(),
        });

        ConversationMount {
            key,
            session: handle,
            project_path,
            notifier,
        }
    }

    /// The current mount, without a notifier.
    pub fn mount(&self) -> Option<ConversationMount> {
        let active = self.active.as_ref()?;
        let project_path = self
            .selected_project
            .as_ref()
            .map(|p| p.path.clone())
            .unwrap_or_default();
        Some(ConversationMount {
            key: active.key.clone(),
            session: active.handle.clone(),
            project_path,
            notifier: None,
        })
    }

    pub fn render_key(&self) -> Option<&RenderKey> {
        self.active.as_ref().map(|a| &a.key)
    }

    pub fn selected_session_handle(&self) -> Option<SessionHandle> {
        self.active.as_ref().map(|a| a.handle.clone())
    }

    /// Snapshot of the selected session.
    pub async fn selected_session(&self) -> Option<Session> {
        match &self.active {
            Some(active) => Some(active.handle.read().await.clone()),
            None => None,
        }
    }

    /// Records that the selected placeholder's first message was sent.
    pub async fn mark_message_dispatched(&mut self, preview: &str) -> bool {
        self.dispatch(None, preview).await
    }

    async fn dispatch(&mut self, expected_id: Option<&str>, preview: &str) -> bool {
        let Some(handle) = self.selected_session_handle() else {
            return false;
        };
        let preview = truncate_preview(preview, self.preview_chars);

        let mut session = handle.write().await;
        if expected_id.is_some_and(|id| id != session.id) {
            return false;
        }
        if !session.mark_dispatched(Some(preview.clone())) {
            return false;
        }
        let (project_id, placeholder_id) = (session.project_id.clone(), session.id.clone());
        drop(session);

        self.sessions
            .update_placeholder(&project_id, &placeholder_id, |s| {
                s.mark_dispatched(Some(preview));
            });
        tracing::debug!("[Workspace] Placeholder {} dispatched", placeholder_id);
        true
    }

    /// Swaps the selected placeholder's id for the engine-assigned `real_id`.
    ///
    /// The selected-session handle is updated in place and the render key is
    /// left untouched. Fired while no placeholder is selected, or repeated
    /// with an id that was already applied, it changes nothing.
    pub async fn on_session_created(&mut self, real_id: &str) -> ReconcileOutcome {
        self.reconcile(None, real_id).await
    }

    async fn reconcile(&mut self, expected_id: Option<&str>, real_id: &str) -> ReconcileOutcome {
        let Some(handle) = self.selected_session_handle() else {
            tracing::debug!("[Workspace] Ignoring session-created '{}': nothing selected", real_id);
            return ReconcileOutcome::Stale;
        };

        let mut session = handle.write().await;
        if !session.is_placeholder() || expected_id.is_some_and(|id| id != session.id) {
            tracing::debug!(
                "[Workspace] Ignoring stale session-created '{}' (selected: {})",
                real_id,
                session.id
            );
            return ReconcileOutcome::Stale;
        }
        if real_id.trim().is_empty() || is_placeholder_id(real_id) {
            tracing::warn!("[Workspace] Rejecting invalid engine session id '{}'", real_id);
            return ReconcileOutcome::Stale;
        }

        let placeholder_id = session.id.clone();
        session.confirm(real_id);
        let confirmed = session.clone();
        drop(session);

        self.sessions
            .promote(&confirmed.project_id, &placeholder_id, confirmed.clone());
        self.layout
            .persist_selection(&confirmed.project_id, &confirmed.id)
            .await;

        tracing::info!(
            "[Workspace] Reconciled placeholder {} -> {}",
            placeholder_id,
            confirmed.id
        );
        ReconcileOutcome::Reconciled {
            placeholder_id,
            session_id: confirmed.id,
        }
    }

    /// Applies a single notification from the conversation view.
    pub async fn handle_view_event(&mut self, event: ViewEvent) -> Option<ReconcileOutcome> {
        match event {
            ViewEvent::MessageDispatched {
                placeholder_id,
                preview,
            } => {
                self.dispatch(Some(&placeholder_id), &preview).await;
                None
            }
            ViewEvent::SessionCreated {
                placeholder_id,
                real_id,
            } => Some(self.reconcile(Some(&placeholder_id), &real_id).await),
        }
    }

    /// Drains every queued view notification.
    pub async fn process_view_events(&mut self) -> Vec<ReconcileOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            outcomes.extend(self.handle_view_event(event).await);
        }
        outcomes
    }

    // ============================================================================
    // Layout
    // ============================================================================

    pub fn layout(&self) -> &PanelLayout {
        self.layout.layout()
    }

    /// Applies a layout change, persisting only the affected key.
    pub async fn update_layout(&mut self, change: LayoutChange) -> bool {
        self.layout.apply(change).await
    }

    pub async fn toggle_left_panel(&mut self) -> bool {
        let collapsed = !self.layout().left_panel_collapsed;
        self.update_layout(LayoutChange::LeftPanelCollapsed(collapsed)).await
    }

    pub async fn toggle_right_panel(&mut self) -> bool {
        let collapsed = !self.layout().right_panel_collapsed;
        self.update_layout(LayoutChange::RightPanelCollapsed(collapsed)).await
    }

    pub async fn toggle_discovered_projects(&mut self) -> bool {
        let collapsed = !self.layout().discovered_projects_collapsed;
        self.update_layout(LayoutChange::DiscoveredProjectsCollapsed(collapsed))
            .await
    }

    pub async fn resize_left_panel(&mut self, width: u32) -> bool {
        self.update_layout(LayoutChange::LeftPanelWidth(width)).await
    }

    pub async fn resize_right_panel(&mut self, width: u32) -> bool {
        self.update_layout(LayoutChange::RightPanelWidth(width)).await
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod orchestrator_test;
