//! Scripted project handlers.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use project_fs::Entry;
use project_handlers::{
    DependencyDescription, Error, HandlerMetadata, ProjectHandler, Result, ValidationProperty,
};

#[derive(Debug, Clone)]
enum Reply {
    Describe {
        location: String,
        delay: Option<Duration>,
    },
    Fail,
}

/// A handler whose answers are fixed per entry location.
///
/// Entries without a scripted reply are described as `None`.
#[derive(Debug, Clone)]
pub struct StubHandler {
    metadata: HandlerMetadata,
    replies: HashMap<String, Reply>,
}

impl StubHandler {
    pub fn new(handler_type: &str) -> Self {
        Self {
            metadata: HandlerMetadata::new(format!("test.{handler_type}"), handler_type),
            replies: HashMap::new(),
        }
    }

    pub fn with_validation(mut self, property: ValidationProperty) -> Self {
        self.metadata.validation_properties.push(property);
        self
    }

    /// Describe the entry at `entry_location` as `description_location`.
    pub fn describes(mut self, entry_location: &str, description_location: &str) -> Self {
        self.replies.insert(
            entry_location.to_string(),
            Reply::Describe {
                location: description_location.to_string(),
                delay: None,
            },
        );
        self
    }

    /// Like [`Self::describes`], answering only after `delay`.
    pub fn describes_after(
        mut self,
        entry_location: &str,
        description_location: &str,
        delay: Duration,
    ) -> Self {
        self.replies.insert(
            entry_location.to_string(),
            Reply::Describe {
                location: description_location.to_string(),
                delay: Some(delay),
            },
        );
        self
    }

    /// Fail when asked about the entry at `entry_location`.
    pub fn fails_on(mut self, entry_location: &str) -> Self {
        self.replies.insert(entry_location.to_string(), Reply::Fail);
        self
    }
}

#[async_trait]
impl ProjectHandler for StubHandler {
    fn metadata(&self) -> &HandlerMetadata {
        &self.metadata
    }

    async fn dependency_description(&self, entry: &Entry) -> Result<Option<DependencyDescription>> {
        match self.replies.get(&entry.location) {
            None => Ok(None),
            Some(Reply::Fail) => Err(Error::handler(
                &self.metadata.handler_type,
                format!("scripted failure for {}", entry.location),
            )),
            Some(Reply::Describe { location, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(*delay).await;
                }
                Ok(Some(DependencyDescription::at(location.clone())))
            }
        }
    }
}
