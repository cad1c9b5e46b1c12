//! ProjectHandler trait and handler metadata

use async_trait::async_trait;
use project_fs::Entry;
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationProperty, Validator};
use crate::Result;

/// Parameter a handler asks for when a dependency or project is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerParameter {
    pub id: String,
    pub name: String,
    #[serde(default = "default_parameter_type", rename = "type")]
    pub parameter_type: String,
}

fn default_parameter_type() -> String {
    "text".to_string()
}

/// Declared properties of a handler.
///
/// The serialized form uses the camelCase keys handlers are registered with;
/// the historical `addParamethers` spelling is accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub handler_type: String,
    #[serde(default, alias = "addParamethers")]
    pub add_parameters: Vec<HandlerParameter>,
    #[serde(default, alias = "optionalParamethers")]
    pub optional_parameters: Vec<HandlerParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_dependency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_dependency_tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_project_tooltip: Option<String>,
    #[serde(default)]
    pub validation_properties: Vec<ValidationProperty>,
}

impl HandlerMetadata {
    pub fn new(id: impl Into<String>, handler_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handler_type: handler_type.into(),
            ..Self::default()
        }
    }

    pub fn with_validation(mut self, property: ValidationProperty) -> Self {
        self.validation_properties.push(property);
        self
    }

    /// Compile the declared validation properties.
    pub fn validator(&self) -> Result<Validator> {
        Validator::new(&self.validation_properties)
    }
}

/// What a handler reports about an entry it recognises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DependencyDescription {
    #[serde(default, rename = "Type", skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: String,
}

impl DependencyDescription {
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            dependency_type: None,
            name: None,
            location: location.into(),
        }
    }
}

/// A pluggable resolver for one dependency type.
#[async_trait]
pub trait ProjectHandler: Send + Sync {
    fn metadata(&self) -> &HandlerMetadata;

    fn handler_type(&self) -> &str {
        &self.metadata().handler_type
    }

    /// Describe `entry` as a dependency of this handler's type.
    ///
    /// `Ok(None)` means the entry is not something this handler can describe.
    async fn dependency_description(&self, entry: &Entry) -> Result<Option<DependencyDescription>>;
}
