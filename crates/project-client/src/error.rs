//! Error types for project-client

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by the file client, forwarded unchanged.
    #[error(transparent)]
    Storage(#[from] project_fs::Error),

    #[error("Handler error: {0}")]
    Handler(#[from] project_handlers::Error),

    #[error("Failed to parse project descriptor at {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} could not be found")]
    NotFound { what: String },

    #[error("{dependency_type} is not supported")]
    UnsupportedType { dependency_type: String },

    #[error("Invalid project descriptor: {message}")]
    InvalidDescriptor { message: String },

    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn invalid_descriptor(message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_is_transparent() {
        let inner = project_fs::Error::not_found("/file/top/project.json");
        let message = inner.to_string();
        let err: Error = inner.into();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_unsupported_type_display() {
        let err = Error::UnsupportedType {
            dependency_type: "svn".to_string(),
        };
        assert_eq!(err.to_string(), "svn is not supported");
    }

    #[test]
    fn test_parse_error_names_location() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Parse {
            location: "/file/top/project.json".to_string(),
            source,
        };
        assert!(err.to_string().contains("/file/top/project.json"));
    }
}
