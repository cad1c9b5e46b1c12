//! In-memory file client

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::client::FileClient;
use crate::entry::{Entry, Workspace};
use crate::location::{self, FILE_ROOT};
use crate::{Error, Result};

const DEFAULT_WORKSPACE: &str = "/workspace";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Folder,
    File(String),
}

/// A file store held entirely in memory.
///
/// Keys are full locations, so folder keys end with `/`. The map is ordered,
/// which keeps listings stable and lets a folder's subtree be scanned as a
/// contiguous range.
#[derive(Debug)]
pub struct MemoryFileClient {
    workspace_name: String,
    workspace_location: String,
    nodes: RwLock<BTreeMap<String, Node>>,
}

impl MemoryFileClient {
    pub fn new() -> Self {
        Self::with_workspace("Workspace", DEFAULT_WORKSPACE)
    }

    pub fn with_workspace(name: impl Into<String>, location: impl Into<String>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(FILE_ROOT.to_string(), Node::Folder);
        Self {
            workspace_name: name.into(),
            workspace_location: location.into(),
            nodes: RwLock::new(nodes),
        }
    }

    pub fn workspace_location(&self) -> &str {
        &self.workspace_location
    }

    /// Create a folder (and any missing ancestors) from a root-relative path.
    ///
    /// Returns the folder location.
    pub fn add_folder(&self, path: &str) -> Result<String> {
        let folder = location::join(FILE_ROOT, &location::as_folder(path))?;
        let mut nodes = self.write_nodes();
        ensure_folders(&mut nodes, &folder)?;
        Ok(folder)
    }

    /// Create or replace a file from a root-relative path, creating missing
    /// folders on the way. Returns the file location.
    pub fn add_file(&self, path: &str, content: &str) -> Result<String> {
        let file = location::join(FILE_ROOT, location::trim_folder(path))?;
        let mut nodes = self.write_nodes();
        if let Some(parent) = location::parent(&file) {
            ensure_folders(&mut nodes, &parent)?;
        }
        if nodes.get(&location::as_folder(&file)).is_some() {
            return Err(Error::NotAFile { location: file });
        }
        nodes.insert(file.clone(), Node::File(content.to_string()));
        Ok(file)
    }

    /// Current content of the file at `location`, if there is one.
    pub fn content(&self, location: &str) -> Option<String> {
        match self.read_nodes().get(location) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// Whether any entry exists at `location`.
    pub fn exists(&self, location: &str) -> bool {
        lookup(&self.read_nodes(), location).is_some()
    }

    fn read_nodes(&self) -> RwLockReadGuard<'_, BTreeMap<String, Node>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_nodes(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Node>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_workspace(&self, location: &str) -> Result<()> {
        if location::trim_folder(location) == location::trim_folder(&self.workspace_location) {
            Ok(())
        } else {
            Err(Error::not_found(location))
        }
    }
}

impl Default for MemoryFileClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a location to its stored key, tolerating a missing or extra
/// trailing separator.
fn lookup<'a>(nodes: &'a BTreeMap<String, Node>, location: &str) -> Option<(&'a String, &'a Node)> {
    nodes
        .get_key_value(location)
        .or_else(|| nodes.get_key_value(&location::as_folder(location)))
        .or_else(|| nodes.get_key_value(location::trim_folder(location)))
}

fn ensure_folders(nodes: &mut BTreeMap<String, Node>, folder: &str) -> Result<()> {
    let mut pending = Vec::new();
    let mut current = Some(folder.to_string());
    while let Some(loc) = current {
        match nodes.get(&loc) {
            Some(Node::Folder) => break,
            Some(Node::File(_)) => return Err(Error::NotAFolder { location: loc }),
            None => {
                if nodes.contains_key(location::trim_folder(&loc)) {
                    return Err(Error::NotAFolder { location: loc });
                }
                current = location::parent(&loc);
                pending.push(loc);
            }
        }
    }
    for loc in pending {
        nodes.insert(loc, Node::Folder);
    }
    Ok(())
}

fn children_of(nodes: &BTreeMap<String, Node>, folder: &str) -> Vec<Entry> {
    nodes
        .range(folder.to_string()..)
        .take_while(|(key, _)| key.starts_with(folder))
        .filter(|(key, _)| {
            let rest = location::trim_folder(&key[folder.len()..]);
            !rest.is_empty() && !rest.contains('/')
        })
        .map(|(key, node)| Entry::at(key, matches!(node, Node::Folder)))
        .collect()
}

fn existing_folder(nodes: &BTreeMap<String, Node>, location: &str) -> Result<String> {
    match lookup(nodes, location) {
        Some((key, Node::Folder)) => Ok(key.clone()),
        Some((key, Node::File(_))) => Err(Error::NotAFolder {
            location: key.clone(),
        }),
        None => Err(Error::not_found(location)),
    }
}

#[async_trait]
impl FileClient for MemoryFileClient {
    async fn read(&self, location: &str) -> Result<String> {
        match lookup(&self.read_nodes(), location) {
            Some((_, Node::File(content))) => Ok(content.clone()),
            Some((key, Node::Folder)) => Err(Error::NotAFile {
                location: key.clone(),
            }),
            None => Err(Error::not_found(location)),
        }
    }

    async fn read_metadata(&self, location: &str) -> Result<Entry> {
        match lookup(&self.read_nodes(), location) {
            Some((key, node)) => Ok(Entry::at(key, matches!(node, Node::Folder))),
            None => Err(Error::not_found(location)),
        }
    }

    async fn write(&self, location: &str, content: &str) -> Result<()> {
        let mut nodes = self.write_nodes();
        if location::is_folder(location) || nodes.contains_key(&location::as_folder(location)) {
            return Err(Error::NotAFile {
                location: location.to_string(),
            });
        }
        let parent = location::parent(location)
            .ok_or_else(|| Error::invalid_location(location, "not under the file root"))?;
        existing_folder(&nodes, &parent)?;
        tracing::debug!(location, bytes = content.len(), "Writing file");
        nodes.insert(location.to_string(), Node::File(content.to_string()));
        Ok(())
    }

    async fn create_file(&self, parent_location: &str, name: &str) -> Result<Entry> {
        location::validate_name(name).map_err(|reason| Error::invalid_location(name, reason))?;
        let mut nodes = self.write_nodes();
        let parent = existing_folder(&nodes, parent_location)?;
        let file = format!("{}{}", parent, name);
        if lookup(&nodes, &file).is_some() {
            return Err(Error::AlreadyExists { location: file });
        }
        nodes.insert(file.clone(), Node::File(String::new()));
        Ok(Entry::at(&file, false))
    }

    async fn create_project(&self, workspace_location: &str, name: &str) -> Result<Entry> {
        self.check_workspace(workspace_location)?;
        location::validate_name(name).map_err(|reason| Error::invalid_location(name, reason))?;
        let mut nodes = self.write_nodes();
        let folder = format!("{}{}/", FILE_ROOT, name);
        if lookup(&nodes, &folder).is_some() {
            return Err(Error::AlreadyExists { location: folder });
        }
        nodes.insert(folder.clone(), Node::Folder);
        Ok(Entry::at(&folder, true).with_content_location(folder.clone()))
    }

    async fn fetch_children(&self, children_location: &str) -> Result<Vec<Entry>> {
        let nodes = self.read_nodes();
        let folder = existing_folder(&nodes, children_location)?;
        Ok(children_of(&nodes, &folder))
    }

    async fn load_workspace(&self, location: Option<&str>) -> Result<Workspace> {
        if let Some(location) = location {
            self.check_workspace(location)?;
        }
        Ok(Workspace {
            name: self.workspace_name.clone(),
            location: self.workspace_location.clone(),
            children: children_of(&self.read_nodes(), FILE_ROOT),
        })
    }
}
