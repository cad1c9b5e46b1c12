//! Error types for project-handlers

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] project_fs::Error),

    #[error("Invalid match pattern '{pattern}' for source '{source_path}': {reason}")]
    InvalidPattern {
        source_path: String,
        pattern: String,
        reason: String,
    },

    #[error("Validation property has an empty source")]
    EmptySource,

    #[error("Handler '{handler_type}' failed: {message}")]
    Handler {
        handler_type: String,
        message: String,
    },
}

impl Error {
    pub fn handler(handler_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            handler_type: handler_type.into(),
            message: message.into(),
        }
    }
}
