//! Workspace session for a single CLI invocation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use project_client::{ClientConfig, ProjectClient, ProjectDescriptor};
use project_fs::{Entry, LocalFileClient, location};
use project_handlers::HandlerSet;

use crate::error::{CliError, Result};

/// A project client over a workspace directory.
///
/// The CLI ships no dependency handlers, so only `file` dependencies resolve.
pub struct Session {
    pub client: ProjectClient,
    pub root: PathBuf,
}

impl Session {
    pub fn open(root: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir()?,
        };
        if !root.is_dir() {
            return Err(CliError::user(format!(
                "workspace '{}' is not a directory",
                root.display()
            )));
        }
        let config = match config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        tracing::debug!(root = %root.display(), ?config, "Opening workspace");

        let files = Arc::new(LocalFileClient::new(root.clone()));
        let registry = Arc::new(HandlerSet::new());
        Ok(Self {
            client: ProjectClient::with_config(files, registry, config),
            root,
        })
    }

    /// Location of a workspace-relative folder argument.
    pub fn folder_location(&self, folder: &str) -> Result<String> {
        let joined = location::join(location::FILE_ROOT, folder.trim_matches('/'))?;
        if joined == location::FILE_ROOT {
            return Err(CliError::user("a folder inside the workspace is required"));
        }
        Ok(location::as_folder(&joined))
    }

    /// Read the project `folder` belongs to, failing when there is none.
    pub async fn require_project(&self, folder: &str) -> Result<ProjectDescriptor> {
        let entry = Entry::at(&self.folder_location(folder)?, true);
        self.client
            .read_project(&entry, None)
            .await?
            .ok_or_else(|| CliError::user(format!("'{}' is not inside a project", folder)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_folder_location() {
        let dir = TempDir::new().unwrap();
        let session = Session::open(Some(dir.path()), None).unwrap();
        assert_eq!(session.folder_location("app").unwrap(), "/file/app/");
        assert_eq!(session.folder_location("app/src/").unwrap(), "/file/app/src/");
        assert!(session.folder_location("").is_err());
        assert!(session.folder_location("../outside").is_err());
    }

    #[test]
    fn test_open_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(Session::open(Some(&missing), None).is_err());
    }
}
