//! Domain layer of the Harbor workspace.
//!
//! Holds the project and session models, the layout encoding, and the
//! adapter traits the orchestrator consumes. Storage lives in
//! `harbor-infrastructure`; orchestration in `harbor-application`.

pub mod config;
pub mod error;
pub mod project;
pub mod session;
pub mod settings;

// Re-export common error type
pub use error::{HarborError, Result};
