//! File client backed by a directory on disk

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::client::FileClient;
use crate::entry::{Entry, Workspace};
use crate::location::{self, FILE_ROOT};
use crate::{Error, Result, io};

/// Serves the workspace rooted at a local directory.
///
/// `/file/<path>` maps onto `<root>/<path>`. Locations that would leave the
/// root are rejected before touching the disk.
#[derive(Debug, Clone)]
pub struct LocalFileClient {
    root: PathBuf,
    workspace_name: String,
    workspace_location: String,
}

impl LocalFileClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let workspace_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Workspace".to_string());
        Self {
            root,
            workspace_name,
            workspace_location: "/workspace".to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a location onto the filesystem.
    pub fn resolve(&self, location: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in location::segments(location)? {
            path.push(segment);
        }
        Ok(path)
    }

    async fn entry_for(&self, location: &str) -> Result<Entry> {
        let path = self.resolve(location)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| map_io(location, &path, e))?;
        let location = if metadata.is_dir() {
            location::as_folder(location)
        } else {
            location::trim_folder(location).to_string()
        };
        Ok(Entry::at(&location, metadata.is_dir()))
    }

    async fn require_folder(&self, location: &str) -> Result<PathBuf> {
        let path = self.resolve(location)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| map_io(location, &path, e))?;
        if metadata.is_dir() {
            Ok(path)
        } else {
            Err(Error::NotAFolder {
                location: location.to_string(),
            })
        }
    }

    fn check_workspace(&self, location: &str) -> Result<()> {
        if location::trim_folder(location) == self.workspace_location {
            Ok(())
        } else {
            Err(Error::not_found(location))
        }
    }
}

fn map_io(location: &str, path: &Path, err: std::io::Error) -> Error {
    match err.kind() {
        ErrorKind::NotFound => Error::not_found(location),
        ErrorKind::AlreadyExists => Error::AlreadyExists {
            location: location.to_string(),
        },
        _ => Error::io(path, err),
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
}

#[async_trait]
impl FileClient for LocalFileClient {
    async fn read(&self, location: &str) -> Result<String> {
        let path = self.resolve(location)?;
        if location::is_folder(location) || is_dir(&path).await {
            return Err(Error::NotAFile {
                location: location.to_string(),
            });
        }
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| map_io(location, &path, e))
    }

    async fn read_metadata(&self, location: &str) -> Result<Entry> {
        self.entry_for(location).await
    }

    async fn write(&self, location: &str, content: &str) -> Result<()> {
        if location::is_folder(location) {
            return Err(Error::NotAFile {
                location: location.to_string(),
            });
        }
        let parent = location::parent(location)
            .ok_or_else(|| Error::invalid_location(location, "not under the file root"))?;
        self.require_folder(&parent).await?;

        let path = self.resolve(location)?;
        if is_dir(&path).await {
            return Err(Error::NotAFile {
                location: location.to_string(),
            });
        }
        tracing::debug!(location, bytes = content.len(), "Writing file");
        let bytes = content.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || io::write_atomic(&path, &bytes))
            .await
            .map_err(|e| Error::Task {
                message: e.to_string(),
            })?
    }

    async fn create_file(&self, parent_location: &str, name: &str) -> Result<Entry> {
        location::validate_name(name).map_err(|reason| Error::invalid_location(name, reason))?;
        let parent = self.require_folder(parent_location).await?;
        let file = format!("{}{}", location::as_folder(parent_location), name);
        let path = parent.join(name);
        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| map_io(&file, &path, e))?;
        Ok(Entry::at(&file, false))
    }

    async fn create_project(&self, workspace_location: &str, name: &str) -> Result<Entry> {
        self.check_workspace(workspace_location)?;
        location::validate_name(name).map_err(|reason| Error::invalid_location(name, reason))?;
        let folder = format!("{}{}/", FILE_ROOT, name);
        let path = self.resolve(&folder)?;
        tokio::fs::create_dir(&path)
            .await
            .map_err(|e| map_io(&folder, &path, e))?;
        Ok(Entry::at(&folder, true).with_content_location(folder.clone()))
    }

    async fn fetch_children(&self, children_location: &str) -> Result<Vec<Entry>> {
        let path = self.require_folder(children_location).await?;
        let folder = location::as_folder(children_location);

        let mut reader = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| map_io(children_location, &path, e))?;
        let mut children = Vec::new();
        while let Some(dir_entry) = reader
            .next_entry()
            .await
            .map_err(|e| Error::io(&path, e))?
        {
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            if io::is_temp_artifact(&name) {
                continue;
            }
            let is_dir = dir_entry
                .file_type()
                .await
                .map_err(|e| Error::io(dir_entry.path(), e))?
                .is_dir();
            let child = if is_dir {
                format!("{}{}/", folder, name)
            } else {
                format!("{}{}", folder, name)
            };
            children.push(Entry::at(&child, is_dir));
        }
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn load_workspace(&self, location: Option<&str>) -> Result<Workspace> {
        if let Some(location) = location {
            self.check_workspace(location)?;
        }
        Ok(Workspace {
            name: self.workspace_name.clone(),
            location: self.workspace_location.clone(),
            children: self.fetch_children(FILE_ROOT).await?,
        })
    }
}
