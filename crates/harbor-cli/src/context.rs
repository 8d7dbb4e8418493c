//! Wires the file-backed adapters into a workspace shell.

use anyhow::{Context, Result};
use harbor_application::{WorkspaceAdapters, WorkspaceOrchestrator, WorkspaceShell};
use harbor_core::config::HarborConfig;
use harbor_core::error::HarborError;
use harbor_infrastructure::{
    ConfigService, EngineHistory, HarborPaths, TomlProjectRegistry, TomlSettingsStore,
};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppContext {
    pub paths: HarborPaths,
    pub config: HarborConfig,
    /// Why `config` fell back to the defaults, reported once logging is up
    pub config_error: Option<HarborError>,
}

impl AppContext {
    pub fn load(config_dir: Option<PathBuf>) -> Result<Self> {
        let paths = HarborPaths::new(config_dir).context("Failed to resolve config directory")?;
        let (config, config_error) = match ConfigService::new(&paths).try_load() {
            Ok(config) => (config, None),
            Err(e) => (HarborConfig::default(), Some(e)),
        };
        Ok(Self {
            paths,
            config,
            config_error,
        })
    }

    pub fn adapters(&self) -> Result<WorkspaceAdapters> {
        let history = Arc::new(
            EngineHistory::from_config(&self.config).context("Failed to locate engine history")?,
        );
        Ok(WorkspaceAdapters {
            registry: Arc::new(TomlProjectRegistry::new(&self.paths)),
            discovery: history.clone(),
            sessions: history,
            settings: Arc::new(TomlSettingsStore::new(&self.paths)),
        })
    }

    /// Mounts a workspace whose "go back" simply ends the command.
    pub async fn mount(&self) -> Result<WorkspaceShell> {
        let orchestrator = WorkspaceOrchestrator::new(self.adapters()?)
            .with_preview_chars(self.config.preview_chars);
        let go_back = Box::new(|| tracing::debug!("[Workspace] Command finished"));
        Ok(WorkspaceShell::mount_with(orchestrator, go_back).await)
    }
}
