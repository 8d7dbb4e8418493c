//! Panel layout persistence.
//!
//! Loads every layout key in one batched read and writes back only the key a
//! toggle or resize actually changed. Store failures are logged and degrade to
//! defaults; they never reach the UI as errors.

use harbor_core::settings::{LastSelection, LayoutChange, LayoutKey, PanelLayout, SettingsStore};
use std::sync::Arc;

pub struct LayoutService {
    store: Arc<dyn SettingsStore>,
    layout: PanelLayout,
    last_selection: LastSelection,
}

impl LayoutService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            layout: PanelLayout::default(),
            last_selection: LastSelection::default(),
        }
    }

    /// Reads all known keys and replaces the in-memory layout.
    pub async fn load(&mut self) {
        match self.store.get_settings(&LayoutKey::all_names()).await {
            Ok(values) => {
                self.layout = PanelLayout::from_settings(&values);
                self.last_selection = LastSelection::from_settings(&values);
                tracing::debug!("[Layout] Loaded layout: {:?}", self.layout);
            }
            Err(e) => {
                tracing::warn!("[Layout] Failed to read settings, using defaults: {}", e);
                self.layout = PanelLayout::default();
                self.last_selection = LastSelection::default();
            }
        }
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// The selection persisted by a previous run, as read by `load`.
    pub fn last_selection(&self) -> &LastSelection {
        &self.last_selection
    }

    /// Applies a change and persists the single affected key.
    ///
    /// Returns false when the value was already current (nothing is written).
    pub async fn apply(&mut self, change: LayoutChange) -> bool {
        let Some((key, value)) = self.layout.apply(change) else {
            return false;
        };

        if let Err(e) = self
            .store
            .set_settings([(key.clone(), value)].into_iter().collect())
            .await
        {
            tracing::warn!("[Layout] Failed to persist '{}': {}", key, e);
        }
        true
    }

    /// Persists a confirmed `(project, session)` choice for the next start.
    pub async fn persist_selection(&mut self, project_id: &str, session_id: &str) {
        self.last_selection = LastSelection {
            project_id: Some(project_id.to_string()),
            session_id: Some(session_id.to_string()),
        };

        if let Err(e) = self
            .store
            .set_settings(LastSelection::entries(project_id, session_id))
            .await
        {
            tracing::warn!(
                "[Layout] Failed to persist selection {}/{}: {}",
                project_id,
                session_id,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use harbor_core::error::{HarborError, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        values: Mutex<HashMap<String, String>>,
        writes: Mutex<Vec<HashMap<String, String>>>,
        reads: Mutex<usize>,
        fail: bool,
    }

    #[async_trait]
    impl SettingsStore for RecordingStore {
        async fn get_settings(&self, keys: &[String]) -> Result<HashMap<String, String>> {
            *self.reads.lock().unwrap() += 1;
            if self.fail {
                return Err(HarborError::adapter("settings", "unavailable"));
            }
            let values = self.values.lock().unwrap();
            Ok(keys
                .iter()
                .filter_map(|k| values.get(k).map(|v| (k.clone(), v.clone())))
                .collect())
        }

        async fn set_settings(&self, values: HashMap<String, String>) -> Result<()> {
            self.writes.lock().unwrap().push(values.clone());
            if self.fail {
                return Err(HarborError::adapter("settings", "unavailable"));
            }
            self.values.lock().unwrap().extend(values);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_width_round_trip() {
        let store = Arc::new(RecordingStore::default());
        let mut service = LayoutService::new(store.clone());
        service.load().await;
        assert_eq!(service.layout().left_panel_width, 300);

        assert!(service.apply(LayoutChange::LeftPanelWidth(340)).await);

        let mut reloaded = LayoutService::new(store.clone());
        reloaded.load().await;
        assert_eq!(reloaded.layout().left_panel_width, 340);
        assert_eq!(*store.reads.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_writes_only_changed_key() {
        let store = Arc::new(RecordingStore::default());
        let mut service = LayoutService::new(store.clone());
        service.load().await;

        service.apply(LayoutChange::RightPanelCollapsed(true)).await;
        service.apply(LayoutChange::RightPanelCollapsed(true)).await;

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].len(), 1);
        assert_eq!(
            writes[0].get("rightPanelCollapsed").map(String::as_str),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_defaults() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let mut service = LayoutService::new(store);
        service.load().await;
        assert_eq!(*service.layout(), PanelLayout::default());

        // In-memory state still follows the user even when the write fails.
        assert!(service.apply(LayoutChange::LeftPanelCollapsed(true)).await);
        assert!(service.layout().left_panel_collapsed);
    }

    #[tokio::test]
    async fn test_persist_selection_writes_both_keys() {
        let store = Arc::new(RecordingStore::default());
        let mut service = LayoutService::new(store.clone());
        service.persist_selection("P1", "R1").await;

        let mut reloaded = LayoutService::new(store);
        reloaded.load().await;
        assert_eq!(reloaded.last_selection().project_id.as_deref(), Some("P1"));
        assert_eq!(reloaded.last_selection().session_id.as_deref(), Some("R1"));
    }
}
