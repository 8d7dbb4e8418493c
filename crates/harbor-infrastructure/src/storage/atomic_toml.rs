//! Atomic TOML file operations.
//!
//! Writes go through a temporary file in the same directory followed by a
//! rename, and read-modify-write cycles hold an exclusive `fs2` lock on a
//! sibling `.lock` file.

use harbor_core::error::HarborError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicTomlError> for HarborError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => HarborError::from(e),
            AtomicTomlError::Parse { .. } | AtomicTomlError::Serialize(_) => {
                HarborError::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
            AtomicTomlError::Lock(message) => HarborError::io(message),
        }
    }
}

/// A handle to a TOML file that is only ever replaced atomically.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.display().to_string(),
                source,
            })
    }

    /// Loads the file, falling back to `T::default()` when it is absent.
    pub fn load_or_default(&self) -> Result<T, AtomicTomlError>
    where
        T: Default,
    {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Runs a locked read-modify-write cycle.
    ///
    /// `f` receives the current contents (or `default_value` if the file does
    /// not exist yet). The file is rewritten only when `f` succeeds; its error
    /// is returned unchanged and leaves the file untouched.
    pub fn update<R, E, F>(&self, default_value: T, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let invalid = |msg: &str| {
            AtomicTomlError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, msg))
        };
        let parent = self
            .path
            .parent()
            .ok_or_else(|| invalid("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| invalid("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock released when the handle is dropped.
///
/// The lock file itself stays on disk. Removing it would let a waiter lock
/// the unlinked inode while a newcomer locks a fresh file at the same path.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| AtomicTomlError::Lock(format!("Failed to lock {}: {}", path.display(), e)))?;

        Ok(FileLock { _file: file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    fn file(dir: &TempDir) -> AtomicTomlFile<Counter> {
        AtomicTomlFile::new(dir.path().join("nested").join("counter.toml"))
    }

    #[test]
    fn test_missing_file_loads_none() {
        let temp = TempDir::new().unwrap();
        assert!(file(&temp).load().unwrap().is_none());
        assert_eq!(file(&temp).load_or_default().unwrap(), Counter::default());
    }

    #[test]
    fn test_update_accumulates_and_keeps_lock_file() {
        let temp = TempDir::new().unwrap();
        let counter = file(&temp);

        for _ in 0..3 {
            counter
                .update(Counter::default(), |c| {
                    c.count += 5;
                    Ok::<_, AtomicTomlError>(())
                })
                .unwrap();
        }

        assert_eq!(counter.load().unwrap().unwrap().count, 15);
        let dir = temp.path().join("nested");
        assert!(!dir.join(".counter.toml.tmp").exists());
        assert!(dir.join("counter.lock").exists());
    }

    #[test]
    fn test_failed_update_keeps_previous_contents() {
        let temp = TempDir::new().unwrap();
        let counter = file(&temp);
        counter
            .save(&Counter {
                name: "kept".into(),
                count: 1,
            })
            .unwrap();

        let result: Result<(), HarborError> = counter.update(Counter::default(), |c| {
            c.count = 99;
            Err(HarborError::internal("rejected"))
        });

        assert!(result.is_err());
        assert_eq!(counter.load().unwrap().unwrap().count, 1);
    }

    #[test]
    fn test_parse_error_maps_to_serialization() {
        let temp = TempDir::new().unwrap();
        let counter = file(&temp);
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(counter.path(), "count = \"not a number\"").unwrap();

        let err: HarborError = counter.load().unwrap_err().into();
        assert!(matches!(err, HarborError::Serialization { .. }));
    }
}
