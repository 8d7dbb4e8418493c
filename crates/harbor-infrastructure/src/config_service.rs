//! Loads `config.toml`.

use crate::paths::HarborPaths;
use crate::storage::AtomicTomlFile;
use harbor_core::config::HarborConfig;
use harbor_core::error::Result;

/// Reads and writes the application configuration.
///
/// A missing file yields the defaults. A file that fails to parse is an
/// error; callers decide whether to fall back.
pub struct ConfigService {
    file: AtomicTomlFile<HarborConfig>,
}

impl ConfigService {
    pub fn new(paths: &HarborPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
        }
    }

    /// Reads the config, defaulting only when the file is missing.
    pub fn try_load(&self) -> Result<HarborConfig> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    pub fn save(&self, config: &HarborConfig) -> Result<()> {
        self.file.save(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service(temp: &TempDir) -> (ConfigService, HarborPaths) {
        let paths = HarborPaths::new(Some(temp.path().to_path_buf())).unwrap();
        (ConfigService::new(&paths), paths)
    }

    #[test]
    fn test_missing_config_is_default() {
        let temp = TempDir::new().unwrap();
        let (service, _) = service(&temp);
        assert_eq!(service.try_load().unwrap(), HarborConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let (service, _) = service(&temp);
        let config = HarborConfig {
            preview_chars: 120,
            ..Default::default()
        };
        service.save(&config).unwrap();
        assert_eq!(service.try_load().unwrap(), config);
    }

    #[test]
    fn test_try_load_reports_broken_config() {
        let temp = TempDir::new().unwrap();
        let (service, paths) = service(&temp);
        fs::write(paths.config_file(), "preview_chars = [").unwrap();
        assert!(service.try_load().is_err());
    }
}
