//! FileClient trait

use async_trait::async_trait;

use crate::Result;
use crate::entry::{Entry, Workspace};

/// Asynchronous, location-addressed document store.
///
/// Every operation reports failures as errors and performs no retries.
#[async_trait]
pub trait FileClient: Send + Sync {
    /// Read the text content of a file.
    async fn read(&self, location: &str) -> Result<String>;

    /// Read the metadata of a file or folder, including its ancestor chain.
    async fn read_metadata(&self, location: &str) -> Result<Entry>;

    /// Replace the content of a file, creating it if the parent folder exists.
    async fn write(&self, location: &str, content: &str) -> Result<()>;

    /// Create an empty file named `name` inside `parent_location`.
    async fn create_file(&self, parent_location: &str, name: &str) -> Result<Entry>;

    /// Create a top-level project folder named `name` in the workspace.
    ///
    /// The returned entry carries the folder's `content_location`.
    async fn create_project(&self, workspace_location: &str, name: &str) -> Result<Entry>;

    /// List the direct children of a folder.
    async fn fetch_children(&self, children_location: &str) -> Result<Vec<Entry>>;

    /// Load the workspace; `None` loads the default one.
    async fn load_workspace(&self, location: Option<&str>) -> Result<Workspace>;
}
