//! TOML-backed settings store.
//!
//! `settings.toml` is a flat table of string values:
//!
//! ```toml
//! leftPanelWidth = "340"
//! lastProjectId = "P2"
//! ```

use crate::paths::HarborPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use harbor_core::error::{HarborError, Result};
use harbor_core::settings::SettingsStore;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

type SettingsTable = BTreeMap<String, String>;

#[derive(Clone)]
pub struct TomlSettingsStore {
    file: Arc<AtomicTomlFile<SettingsTable>>,
}

impl TomlSettingsStore {
    pub fn new(paths: &HarborPaths) -> Self {
        Self::with_file(paths.settings_file())
    }

    pub fn with_file(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }
}

#[async_trait]
impl SettingsStore for TomlSettingsStore {
    async fn get_settings(&self, keys: &[String]) -> Result<HashMap<String, String>> {
        let file = self.file.clone();
        let keys = keys.to_vec();
        tokio::task::spawn_blocking(move || -> Result<HashMap<String, String>> {
            let mut table = file.load_or_default()?;
            Ok(keys
                .into_iter()
                .filter_map(|key| table.remove(&key).map(|value| (key, value)))
                .collect())
        })
        .await
        .map_err(|e| HarborError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn set_settings(&self, values: HashMap<String, String>) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }

        let file = self.file.clone();
        let keys: Vec<_> = values.keys().cloned().collect();
        tokio::task::spawn_blocking(move || {
            file.update(SettingsTable::new(), |table| {
                table.extend(values);
                Ok::<_, HarborError>(())
            })
        })
        .await
        .map_err(|e| HarborError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!("[Layout] Persisted settings {:?}", keys);
        Ok(())
    }
}
