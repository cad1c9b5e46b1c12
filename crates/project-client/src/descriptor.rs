//! Project descriptor document and dependency entries
//!
//! A descriptor is a JSON object with arbitrary keys. Keys this crate does not
//! know about are carried through reads and writes untouched. The location
//! keys are stamped from where the document was found; a stamped descriptor
//! handed in by a caller is cleaned with [`ProjectDescriptor::without_derived`]
//! before it is first stored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

pub const NAME: &str = "Name";
pub const CONTENT_LOCATION: &str = "ContentLocation";
pub const WORKSPACE_LOCATION: &str = "WorkspaceLocation";
pub const PROJECT_JSON_LOCATION: &str = "ProjectJsonLocation";
pub const DEPENDENCIES: &str = "Dependencies";

/// Keys stamped on read.
const DERIVED_KEYS: [&str; 3] = [CONTENT_LOCATION, WORKSPACE_LOCATION, PROJECT_JSON_LOCATION];

/// Dependency type resolved against the workspace's own folders.
pub const FILE_DEPENDENCY: &str = "file";

/// A declared project dependency.
///
/// `location` is interpreted by the handler for `dependency_type`; for
/// `"file"` dependencies it is a workspace-relative path whose first segment
/// names a top-level folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dependency {
    #[serde(rename = "Type")]
    pub dependency_type: String,
    #[serde(default)]
    pub name: String,
    pub location: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dependency {
    pub fn new(
        dependency_type: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            dependency_type: dependency_type.into(),
            name: name.into(),
            location: location.into(),
            extra: Map::new(),
        }
    }

    /// A `"file"` dependency named after the last segment of its path.
    pub fn file(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self::new(FILE_DEPENDENCY, name, path)
    }

    pub fn is_file(&self) -> bool {
        self.dependency_type == FILE_DEPENDENCY
    }
}

/// The `project.json` document of one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectDescriptor {
    fields: Map<String, Value>,
}

impl ProjectDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        let mut descriptor = Self::new();
        descriptor.set_name(name);
        descriptor
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Parse stored content; empty content is an empty document.
    pub fn parse(content: &str, location: &str) -> Result<Self> {
        if content.is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(content).map_err(|source| Error::Parse {
            location: location.to_string(),
            source,
        })
    }

    /// The document without the keys stamped on read.
    pub fn without_derived(mut self) -> Self {
        for key in DERIVED_KEYS {
            self.fields.remove(key);
        }
        self
    }

    /// Serialize every key for storage.
    pub fn to_document(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.fields)
        } else {
            serde_json::to_string(&self.fields)
        };
        rendered.map_err(|e| Error::invalid_descriptor(e.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field(NAME)
    }

    pub fn content_location(&self) -> Option<&str> {
        self.str_field(CONTENT_LOCATION)
    }

    pub fn workspace_location(&self) -> Option<&str> {
        self.str_field(WORKSPACE_LOCATION)
    }

    pub fn project_json_location(&self) -> Option<&str> {
        self.str_field(PROJECT_JSON_LOCATION)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set(NAME, name.into());
    }

    pub fn set_content_location(&mut self, location: impl Into<String>) {
        self.set(CONTENT_LOCATION, location.into());
    }

    pub fn set_workspace_location(&mut self, location: impl Into<String>) {
        self.set(WORKSPACE_LOCATION, location.into());
    }

    pub fn set_project_json_location(&mut self, location: impl Into<String>) {
        self.set(PROJECT_JSON_LOCATION, location.into());
    }

    /// Shallow merge: each top-level key of `properties` replaces the
    /// existing value wholesale.
    pub fn merge(&mut self, properties: Map<String, Value>) {
        for (key, value) in properties {
            self.fields.insert(key, value);
        }
    }

    /// Declared dependencies, in document order.
    pub fn dependencies(&self) -> Result<Vec<Dependency>> {
        match self.fields.get(DEPENDENCIES) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| Error::invalid_descriptor(format!("malformed {}: {}", DEPENDENCIES, e))),
        }
    }

    pub fn has_dependency(&self, location: &str) -> bool {
        self.fields
            .get(DEPENDENCIES)
            .and_then(Value::as_array)
            .is_some_and(|deps| deps.iter().any(|d| field_eq(d, "Location", location)))
    }

    /// Append `dependency` unless one with the same location is declared.
    ///
    /// Returns whether the document changed.
    pub fn add_dependency(&mut self, dependency: &Dependency) -> Result<bool> {
        if self.has_dependency(&dependency.location) {
            return Ok(false);
        }
        let value = serde_json::to_value(dependency)
            .map_err(|e| Error::invalid_descriptor(e.to_string()))?;
        self.dependency_list()?.push(value);
        Ok(true)
    }

    /// Remove every dependency matching both location and type.
    ///
    /// Returns how many entries were removed.
    pub fn remove_dependency(&mut self, dependency: &Dependency) -> Result<usize> {
        let deps = self.dependency_list()?;
        let before = deps.len();
        deps.retain(|d| {
            !(field_eq(d, "Location", &dependency.location)
                && field_eq(d, "Type", &dependency.dependency_type))
        });
        Ok(before - deps.len())
    }

    fn dependency_list(&mut self) -> Result<&mut Vec<Value>> {
        let slot = self
            .fields
            .entry(DEPENDENCIES)
            .or_insert_with(|| Value::Array(Vec::new()));
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
        slot.as_array_mut()
            .ok_or_else(|| Error::invalid_descriptor(format!("{} is not a list", DEPENDENCIES)))
    }
}

fn field_eq(item: &Value, key: &str, expected: &str) -> bool {
    item.get(key).and_then(Value::as_str) == Some(expected)
}
