//! Application layer for Harbor.
//!
//! Coordinates the project sources, session source and settings store behind
//! a single [`WorkspaceOrchestrator`] that the desktop shell drives.

pub mod layout_service;
pub mod orchestrator;
pub mod project_list;
pub mod session;
pub mod shell;

pub use layout_service::LayoutService;
pub use orchestrator::{SessionLoad, WorkspaceAdapters, WorkspaceOrchestrator};
pub use project_list::{FilteredProjects, ProjectList};
pub use session::{
    ConversationMount, ReconcileOutcome, RenderKey, SessionBook, SessionHandle, ViewEvent,
    ViewNotifier,
};
pub use shell::{WorkspaceShell, WorkspaceSnapshot};
