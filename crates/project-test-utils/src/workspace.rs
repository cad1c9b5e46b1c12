//! In-memory workspace fixtures.

use std::sync::Arc;

use project_fs::MemoryFileClient;
use serde_json::Value;

/// Builder for a [`MemoryFileClient`] populated with test content.
///
/// # Panics
/// The builder methods panic if the store rejects a path, which only happens
/// for malformed fixture paths.
#[derive(Debug, Default)]
pub struct TestWorkspace {
    client: MemoryFileClient,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level project folder holding `project.json` with `descriptor`.
    pub fn project(self, name: &str, descriptor: Value) -> Self {
        let path = format!("{}/project.json", name);
        self.file(&path, &descriptor.to_string())
    }

    /// Add a top-level project folder with an empty `project.json`.
    pub fn empty_project(self, name: &str) -> Self {
        let path = format!("{}/project.json", name);
        self.file(&path, "")
    }

    /// Add a folder (and missing ancestors).
    pub fn folder(self, path: &str) -> Self {
        self.client
            .add_folder(path)
            .unwrap_or_else(|e| panic!("TestWorkspace::folder: {path}: {e}"));
        self
    }

    /// Add a file (and missing ancestor folders).
    pub fn file(self, path: &str, content: &str) -> Self {
        self.client
            .add_file(path, content)
            .unwrap_or_else(|e| panic!("TestWorkspace::file: {path}: {e}"));
        self
    }

    pub fn build(self) -> Arc<MemoryFileClient> {
        Arc::new(self.client)
    }
}
