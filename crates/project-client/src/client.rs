//! Project client
//!
//! Reads, creates and edits project descriptors through a [`FileClient`], and
//! resolves declared dependencies to workspace entries through the handlers of
//! a [`HandlerRegistry`].
//!
//! Edits are read-modify-write cycles over the whole document. Unless
//! [`ClientConfig::serialize_writes`] is set, two concurrent edits of the same
//! project can interleave and the last write wins.

use std::sync::{Arc, PoisonError, RwLock};

use futures::stream::{FuturesUnordered, StreamExt};
use project_fs::{Entry, FileClient, Workspace, location};
use project_handlers::{HandlerRegistry, ProjectHandler};
use serde_json::{Map, Value};
use tokio::sync::OwnedMutexGuard;

use crate::config::ClientConfig;
use crate::descriptor::{Dependency, ProjectDescriptor};
use crate::gate::WriteGate;
use crate::{Error, Result};

/// Result of [`ProjectClient::init_project`].
#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    /// The descriptor file was created and the given document written to it.
    Initialized {
        content_location: String,
        descriptor: ProjectDescriptor,
    },
    /// An empty descriptor file was created.
    Created { file: Entry },
}

/// Why [`ProjectClient::change_project_properties`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No properties were given.
    NoProperties,
    /// The descriptor does not know where its file lives.
    NoDescriptorLocation,
}

/// Result of [`ProjectClient::change_project_properties`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyChange {
    Applied(ProjectDescriptor),
    Skipped(SkipReason),
}

/// Client-side API for projects stored in a workspace.
///
/// Handlers are snapshotted from the registry when the client is built.
/// Handlers registered later stay invisible until [`Self::refresh_handlers`]
/// is called.
pub struct ProjectClient {
    files: Arc<dyn FileClient>,
    registry: Arc<dyn HandlerRegistry>,
    handlers: RwLock<Vec<Arc<dyn ProjectHandler>>>,
    config: ClientConfig,
    gate: WriteGate,
}

impl ProjectClient {
    pub fn new(files: Arc<dyn FileClient>, registry: Arc<dyn HandlerRegistry>) -> Self {
        Self::with_config(files, registry, ClientConfig::default())
    }

    pub fn with_config(
        files: Arc<dyn FileClient>,
        registry: Arc<dyn HandlerRegistry>,
        config: ClientConfig,
    ) -> Self {
        let handlers = registry.handlers();
        tracing::debug!(handlers = handlers.len(), "Project client created");
        Self {
            files,
            registry,
            handlers: RwLock::new(handlers),
            config,
            gate: WriteGate::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn file_client(&self) -> &Arc<dyn FileClient> {
        &self.files
    }

    /// Find the descriptor among `children` of `folder` and read it.
    ///
    /// Returns `None` when the folder holds no descriptor file.
    pub async fn locate_descriptor(
        &self,
        folder: &Entry,
        children: &[Entry],
        workspace: &Workspace,
    ) -> Result<Option<ProjectDescriptor>> {
        let Some(file) = children
            .iter()
            .find(|child| child.name == self.config.descriptor_name)
        else {
            tracing::debug!(folder = %folder.location, "No project descriptor");
            return Ok(None);
        };

        let content = self.files.read(&file.location).await?;
        let mut descriptor = ProjectDescriptor::parse(&content, &file.location)?;
        if !descriptor.get(crate::descriptor::NAME).is_some_and(is_set) {
            descriptor.set_name(folder.name.clone());
        }
        descriptor.set_content_location(folder.location.clone());
        descriptor.set_workspace_location(workspace.location.clone());
        descriptor.set_project_json_location(file.location.clone());
        Ok(Some(descriptor))
    }

    /// Read the project that `entry` belongs to.
    ///
    /// Only the top-level ancestor of `entry` is consulted, so a descriptor in
    /// an intermediate folder is never found. An entry without ancestors is
    /// treated as the top-level folder itself. The workspace is loaded when
    /// not given.
    pub async fn read_project(
        &self,
        entry: &Entry,
        workspace: Option<&Workspace>,
    ) -> Result<Option<ProjectDescriptor>> {
        let loaded;
        let workspace = match workspace {
            Some(workspace) => workspace,
            None => {
                loaded = self.files.load_workspace(None).await?;
                &loaded
            }
        };

        let folder = entry.top_level_ancestor().unwrap_or(entry);
        if let Some(children) = &folder.children {
            return self.locate_descriptor(folder, children, workspace).await;
        }
        if let Some(children_location) = &folder.children_location {
            let children = self.files.fetch_children(children_location).await?;
            return self.locate_descriptor(folder, &children, workspace).await;
        }
        Ok(None)
    }

    /// Read the project of every direct child of the workspace.
    ///
    /// Children are read concurrently. Results come back in completion order.
    /// Children that are not projects, or whose read fails, are left out.
    pub async fn read_all_projects(&self, workspace: &Workspace) -> Vec<ProjectDescriptor> {
        let mut reads: FuturesUnordered<_> = workspace
            .children
            .iter()
            .map(|child| async move { (child, self.read_project(child, Some(workspace)).await) })
            .collect();

        let mut projects = Vec::new();
        while let Some((child, result)) = reads.next().await {
            match result {
                Ok(Some(project)) => projects.push(project),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(location = %child.location, "Skipping unreadable project: {}", e)
                }
            }
        }
        tracing::debug!(
            children = workspace.children.len(),
            projects = projects.len(),
            "Read workspace projects"
        );
        projects
    }

    /// Create the descriptor file in `content_location`.
    ///
    /// With a descriptor, it is written to the new file minus any location
    /// keys stamped by an earlier read.
    pub async fn init_project(
        &self,
        content_location: &str,
        descriptor: Option<ProjectDescriptor>,
    ) -> Result<InitOutcome> {
        let file = self
            .files
            .create_file(content_location, &self.config.descriptor_name)
            .await?;

        let Some(descriptor) = descriptor else {
            return Ok(InitOutcome::Created { file });
        };

        let document = descriptor
            .clone()
            .without_derived()
            .to_document(self.config.pretty_json)?;
        self.files.write(&file.location, &document).await?;
        tracing::info!(content_location, "Initialized project");
        Ok(InitOutcome::Initialized {
            content_location: content_location.to_string(),
            descriptor,
        })
    }

    /// Create a project folder named after the descriptor and initialize it.
    ///
    /// The name is carried by the folder, so it is not written to the file.
    pub async fn create_project(
        &self,
        workspace_location: &str,
        mut descriptor: ProjectDescriptor,
    ) -> Result<InitOutcome> {
        let name = descriptor
            .name()
            .filter(|name| !name.is_empty())
            .map(String::from)
            .ok_or_else(|| Error::invalid_descriptor("a project name is required"))?;

        let folder = self.files.create_project(workspace_location, &name).await?;
        descriptor.remove(crate::descriptor::NAME);
        let content_location = folder
            .content_location
            .clone()
            .unwrap_or_else(|| folder.location.clone());
        self.init_project(&content_location, Some(descriptor)).await
    }

    /// Add a dependency to the stored descriptor.
    ///
    /// Nothing is written when a dependency with the same location is already
    /// declared. Resolves only after the write has completed.
    pub async fn add_project_dependency(
        &self,
        descriptor: &ProjectDescriptor,
        dependency: &Dependency,
    ) -> Result<ProjectDescriptor> {
        let content_location = require_content_location(descriptor)?;
        let _guard = self.lock_project(&location::as_folder(content_location)).await;

        let file = self.descriptor_file(content_location).await?;
        let mut document = self.read_document(&file.location).await?;
        if document.add_dependency(dependency)? {
            self.write_document(&file.location, &document).await?;
            tracing::info!(
                project = %content_location,
                dependency = %dependency.location,
                "Added project dependency"
            );
        } else {
            tracing::debug!(dependency = %dependency.location, "Dependency already declared");
        }
        restamp(&mut document, descriptor, &file.location);
        Ok(document)
    }

    /// Remove every dependency matching both location and type.
    pub async fn remove_project_dependency(
        &self,
        descriptor: &ProjectDescriptor,
        dependency: &Dependency,
    ) -> Result<ProjectDescriptor> {
        let content_location = require_content_location(descriptor)?;
        let _guard = self.lock_project(&location::as_folder(content_location)).await;

        let file = self.descriptor_file(content_location).await?;
        let mut document = self.read_document(&file.location).await?;
        let removed = document.remove_dependency(dependency)?;
        self.write_document(&file.location, &document).await?;
        tracing::info!(
            project = %content_location,
            dependency = %dependency.location,
            removed,
            "Removed project dependency"
        );
        restamp(&mut document, descriptor, &file.location);
        Ok(document)
    }

    /// Merge top-level `properties` into the stored descriptor.
    ///
    /// Each key replaces the stored value wholesale. Returns
    /// [`PropertyChange::Skipped`] without touching storage when there are no
    /// properties or the descriptor has no known file location.
    pub async fn change_project_properties(
        &self,
        descriptor: &ProjectDescriptor,
        properties: Option<Map<String, Value>>,
    ) -> Result<PropertyChange> {
        let Some(properties) = properties else {
            return Ok(PropertyChange::Skipped(SkipReason::NoProperties));
        };
        let Some(json_location) = descriptor.project_json_location() else {
            tracing::debug!("Descriptor has no file location; properties not saved");
            return Ok(PropertyChange::Skipped(SkipReason::NoDescriptorLocation));
        };

        let key = location::parent(json_location).unwrap_or_else(|| json_location.to_string());
        let _guard = self.lock_project(&key).await;

        let mut document = self.read_document(json_location).await?;
        let keys: Vec<String> = properties.keys().cloned().collect();
        document.merge(properties);
        self.write_document(json_location, &document).await?;
        tracing::info!(location = json_location, ?keys, "Changed project properties");

        if let Some(content_location) = descriptor.content_location() {
            document.set_content_location(content_location);
        }
        document.set_project_json_location(json_location);
        if let Some(name) = descriptor.name() {
            document.set_name(name);
        }
        Ok(PropertyChange::Applied(document))
    }

    /// Resolve a dependency to the workspace entry it refers to.
    ///
    /// `"file"` dependencies name a path whose first segment is a top-level
    /// folder. Other types are resolved by asking their handler to describe
    /// every top-level entry it accepts; the first description to come back
    /// with a matching location wins and the remaining checks are dropped.
    pub async fn dependency_file_metadata(
        &self,
        dependency: &Dependency,
        workspace_location: Option<&str>,
    ) -> Result<Entry> {
        if dependency.is_file() {
            let workspace = self.files.load_workspace(workspace_location).await?;
            let (top, rest) = dependency
                .location
                .split_once('/')
                .unwrap_or((dependency.location.as_str(), ""));
            let child = workspace.child_named(top).ok_or_else(|| {
                Error::not_found(format!("{} in the workspace", dependency.location))
            })?;
            let target = location::join(&child.location, rest)?;
            return Ok(self.files.read_metadata(&target).await?);
        }

        let handler = self
            .project_handler(&dependency.dependency_type)
            .ok_or_else(|| Error::UnsupportedType {
                dependency_type: dependency.dependency_type.clone(),
            })?;
        let metadata = handler.metadata();
        // Without validation properties a handler claims no entries
        let validator = if metadata.validation_properties.is_empty() {
            None
        } else {
            Some(metadata.validator()?)
        };

        let workspace = self.files.load_workspace(workspace_location).await?;
        let handler = handler.as_ref();
        let mut checks: FuturesUnordered<_> = workspace
            .children
            .iter()
            .filter(|child| validator.as_ref().is_some_and(|v| v.accepts(child)))
            .map(|child| async move { (child, handler.dependency_description(child).await) })
            .collect();
        tracing::debug!(
            handler_type = %dependency.dependency_type,
            candidates = checks.len(),
            "Resolving dependency"
        );

        while let Some((child, result)) = checks.next().await {
            match result {
                Ok(Some(description)) if description.location == dependency.location => {
                    return Ok(child.clone());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(location = %child.location, "Dependency check failed: {}", e)
                }
            }
        }
        Err(Error::not_found(format!("{} in the workspace", dependency.name)))
    }

    /// Types of the snapshotted handlers, in registration order.
    pub fn project_handler_types(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|h| h.handler_type().to_string())
            .collect()
    }

    /// The first snapshotted handler of `handler_type`.
    pub fn project_handler(&self, handler_type: &str) -> Option<Arc<dyn ProjectHandler>> {
        self.snapshot()
            .into_iter()
            .find(|h| h.handler_type() == handler_type)
    }

    /// Every snapshotted handler whose validation accepts `entry`.
    ///
    /// A handler without validation properties accepts everything. Handlers
    /// whose properties do not compile are skipped.
    pub fn matching_project_handlers(&self, entry: &Entry) -> Vec<Arc<dyn ProjectHandler>> {
        self.snapshot()
            .into_iter()
            .filter(|handler| match handler.metadata().validator() {
                Ok(validator) => validator.accepts(entry),
                Err(e) => {
                    tracing::warn!(handler_type = handler.handler_type(), "Invalid validation properties: {}", e);
                    false
                }
            })
            .collect()
    }

    /// Take a fresh snapshot of the registry's handlers.
    pub fn refresh_handlers(&self) {
        let handlers = self.registry.handlers();
        tracing::debug!(handlers = handlers.len(), "Refreshed project handlers");
        *self.handlers.write().unwrap_or_else(PoisonError::into_inner) = handlers;
    }

    fn snapshot(&self) -> Vec<Arc<dyn ProjectHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn lock_project(&self, key: &str) -> Option<OwnedMutexGuard<()>> {
        if self.config.serialize_writes {
            Some(self.gate.acquire(key).await)
        } else {
            None
        }
    }

    async fn descriptor_file(&self, content_location: &str) -> Result<Entry> {
        self.files
            .fetch_children(content_location)
            .await?
            .into_iter()
            .find(|child| child.name == self.config.descriptor_name)
            .ok_or_else(|| {
                Error::not_found(format!("{} in {}", self.config.descriptor_name, content_location))
            })
    }

    async fn read_document(&self, location: &str) -> Result<ProjectDescriptor> {
        let content = self.files.read(location).await?;
        ProjectDescriptor::parse(&content, location)
    }

    async fn write_document(&self, location: &str, document: &ProjectDescriptor) -> Result<()> {
        let content = document.to_document(self.config.pretty_json)?;
        self.files.write(location, &content).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ProjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectClient")
            .field("handlers", &self.project_handler_types())
            .field("config", &self.config)
            .finish()
    }
}

/// Whether a stored value counts as given: not null, false, zero or empty.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn require_content_location(descriptor: &ProjectDescriptor) -> Result<&str> {
    descriptor
        .content_location()
        .ok_or_else(|| Error::invalid_descriptor("descriptor has no content location"))
}

/// Copy the caller's view of where the project lives onto a freshly read
/// document.
fn restamp(document: &mut ProjectDescriptor, source: &ProjectDescriptor, json_location: &str) {
    if let Some(content_location) = source.content_location() {
        document.set_content_location(content_location);
    }
    if let Some(workspace_location) = source.workspace_location() {
        document.set_workspace_location(workspace_location);
    }
    document.set_project_json_location(json_location);
    if let Some(name) = source.name() {
        document.set_name(name);
    }
}
