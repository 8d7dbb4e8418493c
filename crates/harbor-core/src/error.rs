//! Error types for the Harbor workspace.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A shared error type for the entire Harbor workspace.
///
/// Variants split into two groups: failures coming from an external
/// collaborator (registry, discovery, settings) which callers degrade to a
/// default, and user-visible rejections (`DuplicatePath`, `InaccessiblePath`,
/// `OrphanedInternalId`) which block the requested action.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum HarborError {
    /// An adapter call (registry, discovery, session source, settings) failed
    #[error("{adapter} adapter failed: {message}")]
    AdapterFailure {
        adapter: &'static str,
        message: String,
    },

    /// A registered project with the same path already exists
    #[error("A project is already registered at '{}'", .0.display())]
    DuplicatePath(PathBuf),

    /// The chosen path does not exist or is not a directory
    #[error("Path '{}' is not an accessible directory: {reason}", .path.display())]
    InaccessiblePath { path: PathBuf, reason: String },

    /// A registry operation was requested for a project without an internal id
    #[error("Project '{0}' has no registry record")]
    OrphanedInternalId(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarborError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an AdapterFailure error
    pub fn adapter(adapter: &'static str, message: impl Into<String>) -> Self {
        Self::AdapterFailure {
            adapter,
            message: message.into(),
        }
    }

    /// Creates an InaccessiblePath error
    pub fn inaccessible(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InaccessiblePath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a DuplicatePath error
    pub fn is_duplicate_path(&self) -> bool {
        matches!(self, Self::DuplicatePath(_))
    }

    /// Check if this is an InaccessiblePath error
    pub fn is_inaccessible_path(&self) -> bool {
        matches!(self, Self::InaccessiblePath { .. })
    }

    /// Check if this is an OrphanedInternalId error
    pub fn is_orphaned(&self) -> bool {
        matches!(self, Self::OrphanedInternalId(_))
    }

    /// Whether the error should be shown to the user rather than only logged.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePath(_) | Self::InaccessiblePath { .. } | Self::OrphanedInternalId(_)
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HarborError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HarborError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HarborError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HarborError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for HarborError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, HarborError>`.
pub type Result<T> = std::result::Result<T, HarborError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_visible_classification() {
        assert!(HarborError::DuplicatePath(PathBuf::from("/a")).is_user_visible());
        assert!(HarborError::inaccessible("/missing", "no such directory").is_user_visible());
        assert!(HarborError::OrphanedInternalId("p1".into()).is_user_visible());
        assert!(!HarborError::adapter("registry", "disk full").is_user_visible());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: HarborError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        match err {
            HarborError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_duplicate_path() {
        let err = HarborError::DuplicatePath(PathBuf::from("/work/a"));
        assert_eq!(err.to_string(), "A project is already registered at '/work/a'");
    }
}
