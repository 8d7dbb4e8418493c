//! Unified path management for Harbor's files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/harbor/            # Config directory
//! ├── config.toml              # Application configuration
//! ├── projects.toml            # Registered projects
//! ├── settings.toml            # Layout and last selection
//! └── logs/                    # Application logs
//!     └── harbor.log.YYYY-MM-DD
//!
//! ~/.claude/                   # Engine home (configurable)
//! └── projects/                # Engine session history
//! ```

use harbor_core::config::HarborConfig;
use harbor_core::error::{HarborError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "harbor";
const DEFAULT_ENGINE_DIR: &str = ".claude";

/// Resolves every file Harbor reads or writes.
///
/// `HarborPaths::new(None)` uses the platform config directory;
/// tests pass a temporary base directory instead.
#[derive(Debug, Clone)]
pub struct HarborPaths {
    config_dir: PathBuf,
}

impl HarborPaths {
    /// Creates a path resolver.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Overrides the config directory when set
    ///
    /// # Errors
    ///
    /// Returns `HarborError::Config` when no base directory is given and the
    /// platform config directory cannot be determined.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match base_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .ok_or_else(|| HarborError::config("Cannot find config directory"))?
                .join(APP_DIR),
        };
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn projects_file(&self) -> PathBuf {
        self.config_dir.join("projects.toml")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Creates the config and logs directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// The engine's home directory: `config.engine_home` or `~/.claude`.
    pub fn engine_home(config: &HarborConfig) -> Result<PathBuf> {
        if let Some(home) = &config.engine_home {
            return Ok(home.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_ENGINE_DIR))
            .ok_or_else(|| HarborError::config("Cannot find home directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_base_dir_override() {
        let temp = TempDir::new().unwrap();
        let paths = HarborPaths::new(Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(paths.config_file(), temp.path().join("config.toml"));
        assert_eq!(paths.projects_file(), temp.path().join("projects.toml"));
        assert_eq!(paths.settings_file(), temp.path().join("settings.toml"));

        paths.ensure_dirs().unwrap();
        assert!(temp.path().join("logs").is_dir());
    }

    #[test]
    fn test_engine_home_from_config() {
        let config = HarborConfig {
            engine_home: Some(PathBuf::from("/opt/engine")),
            ..Default::default()
        };
        assert_eq!(
            HarborPaths::engine_home(&config).unwrap(),
            PathBuf::from("/opt/engine")
        );
    }
}
