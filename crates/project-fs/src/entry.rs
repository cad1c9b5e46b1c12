//! Entry and workspace metadata returned by file clients

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::location::{self, FILE_ROOT};

/// A file or folder in a workspace.
///
/// `parents` lists the ancestor folders nearest first, so the last element is
/// the top-level folder of the workspace. Top-level entries carry an empty
/// chain. Backend-specific attributes are flattened into the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<Entry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Entry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_location: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Entry {
    /// A file entry with no ancestor information.
    pub fn file(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            directory: false,
            parents: None,
            children: None,
            children_location: None,
            content_location: None,
            attributes: Map::new(),
        }
    }

    /// A folder entry whose children can be fetched from its own location.
    pub fn folder(name: impl Into<String>, location: impl Into<String>) -> Self {
        let location = location::as_folder(&location.into());
        Self {
            name: name.into(),
            children_location: Some(location.clone()),
            location,
            directory: true,
            parents: None,
            children: None,
            content_location: None,
            attributes: Map::new(),
        }
    }

    /// Build an entry for `location`, deriving its name and ancestor chain.
    pub fn at(location: &str, directory: bool) -> Self {
        let name = location::file_name(location).unwrap_or_default().to_string();
        let entry = if directory {
            Self::folder(name, location)
        } else {
            Self::file(name, location)
        };
        entry.with_parents(ancestors(location))
    }

    pub fn with_parents(mut self, parents: Vec<Entry>) -> Self {
        self.parents = Some(parents);
        self
    }

    pub fn with_children(mut self, children: Vec<Entry>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_content_location(mut self, content_location: impl Into<String>) -> Self {
        self.content_location = Some(content_location.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// The outermost ancestor folder, if the entry has any.
    pub fn top_level_ancestor(&self) -> Option<&Entry> {
        self.parents.as_ref().and_then(|parents| parents.last())
    }
}

/// Ancestor folders of `location` below the file root, nearest first.
pub fn ancestors(location: &str) -> Vec<Entry> {
    let mut chain = Vec::new();
    let mut current = location::parent(location);
    while let Some(folder) = current {
        if folder == FILE_ROOT {
            break;
        }
        let name = location::file_name(&folder).unwrap_or_default().to_string();
        current = location::parent(&folder);
        chain.push(Entry::folder(name, folder));
    }
    chain
}

/// The root container of a file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Workspace {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub children: Vec<Entry>,
}

impl Workspace {
    /// Top-level child with the given name.
    pub fn child_named(&self, name: &str) -> Option<&Entry> {
        self.children.iter().find(|child| child.name == name)
    }
}
