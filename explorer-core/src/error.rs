//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Explorer
//!
//! One enum covers the whole crate. Listing failures split into two classes:
//! request-fatal ones (`DirectoryRead`, `InvalidInput`) and per-child ones
//! (`Inspection`, `Traversal`) that only drop a single entry from the result.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all explorer operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested directory is missing, not a directory, or unreadable.
    #[error("Cannot read directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One directory child vanished or could not be stat'd.
    #[error("Cannot inspect {path:?}: {source}")]
    Inspection {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A descendant could not be visited while summing a folder's size.
    #[error("Folder size walk failed under {path:?}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Input validation errors
    #[error("Invalid input: {field} - {message}")]
    InvalidInput {
        field: String, // "sortField", "sortOrder", etc.
        message: String,
    },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization error (e.g., JSON).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Statistics collector could not be reached or rejected the report.
    #[error("Stats report failed: {0}")]
    Stats(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a directory read failure error
    pub fn directory_read<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Create a child inspection failure error
    pub fn inspection<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Inspection {
            path: path.into(),
            source,
        }
    }

    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts a whole listing request.
    ///
    /// Per-child failures only remove that child from the result.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Inspection { .. } | Self::Traversal { .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        Self::Stats(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_failures_are_not_fatal() {
        let err = AppError::inspection("/tmp/gone", io::Error::from(io::ErrorKind::NotFound));
        assert!(!err.is_fatal());

        let err = AppError::directory_read("/tmp/gone", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_fatal());

        assert!(AppError::invalid_input("sortField", "empty").is_fatal());
    }

    #[test]
    fn test_messages_name_the_path() {
        let err = AppError::directory_read("/srv/data", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().contains("/srv/data"));
    }
}
