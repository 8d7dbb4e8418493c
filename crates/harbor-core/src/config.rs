use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of characters kept from a session's first message.
pub const DEFAULT_PREVIEW_CHARS: usize = 80;

/// Contents of `config.toml`. Every field is optional in the file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HarborConfig {
    /// Home directory of the backing engine (history lives under `projects/`).
    /// `None` resolves to `~/.claude`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_home: Option<PathBuf>,
    /// Length of session previews in the session list
    pub preview_chars: usize,
    /// Default log filter when neither `HARBOR_LOG` nor `RUST_LOG` is set
    pub log_level: String,
}

impl Default for HarborConfig {
    fn default() -> Self {
        Self {
            engine_home: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: HarborConfig = toml::from_str("preview_chars = 40").unwrap();
        assert_eq!(config.preview_chars, 40);
        assert_eq!(config.log_level, "info");
        assert!(config.engine_home.is_none());
    }

    #[test]
    fn test_engine_home_override() {
        let config: HarborConfig = toml::from_str("engine_home = \"/opt/engine\"").unwrap();
        assert_eq!(config.engine_home, Some(PathBuf::from("/opt/engine")));
    }
}
