//! File-backed adapters for the Harbor workspace.
//!
//! - [`TomlProjectRegistry`]: user-registered projects in `projects.toml`
//! - [`TomlSettingsStore`]: layout and last selection in `settings.toml`
//! - [`EngineHistory`]: projects and sessions read from the engine's history directory

pub mod config_service;
pub mod engine;
pub mod paths;
pub mod storage;
pub mod toml_project_registry;
pub mod toml_settings_store;

pub use crate::config_service::ConfigService;
pub use crate::engine::EngineHistory;
pub use crate::paths::HarborPaths;
pub use crate::toml_project_registry::TomlProjectRegistry;
pub use crate::toml_settings_store::TomlSettingsStore;
