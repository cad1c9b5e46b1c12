//! Error types for project-fs

use std::path::PathBuf;

/// Result type for project-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by file clients
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No entry at {location}")]
    NotFound { location: String },

    #[error("An entry already exists at {location}")]
    AlreadyExists { location: String },

    #[error("{location} is a folder, not a file")]
    NotAFile { location: String },

    #[error("{location} is not a folder")]
    NotAFolder { location: String },

    #[error("Invalid location {location}: {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Background task failed: {message}")]
    Task { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }

    pub fn invalid_location(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the addressed entry does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("/file/top/project.json");
        assert!(err.to_string().contains("/file/top/project.json"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_location_display() {
        let err = Error::invalid_location("/file/../etc", "escapes the file root");
        assert!(err.to_string().contains("escapes the file root"));
        assert!(!err.is_not_found());
    }
}
