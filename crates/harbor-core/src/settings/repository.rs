//! Settings store trait.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;

/// Flat string key/value persistence for layout and last-used selections.
///
/// Reads are batched; writes are incremental. `set_settings` must only touch
/// the keys it is given so that concurrent UI interactions cannot clobber
/// unrelated values.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Reads the requested keys. Absent keys are simply missing from the map.
    async fn get_settings(&self, keys: &[String]) -> Result<HashMap<String, String>>;

    /// Writes the given entries, leaving every other key untouched.
    async fn set_settings(&self, values: HashMap<String, String>) -> Result<()>;
}
