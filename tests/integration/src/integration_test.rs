//! End-to-end integration test over an on-disk workspace
//!
//! Exercises the complete flow: config loading -> project discovery ->
//! dependency edits -> dependency resolution through a handler.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use project_client::{ClientConfig, Dependency, ProjectClient, PropertyChange};
use project_fs::{Entry, FileClient, LocalFileClient};
use project_handlers::{
    DependencyDescription, HandlerMetadata, HandlerSet, ProjectHandler, Result, ValidationProperty,
};
use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// Describes a folder by the contents of its `.origin` file.
struct OriginHandler {
    metadata: HandlerMetadata,
    files: Arc<dyn FileClient>,
}

impl OriginHandler {
    fn new(files: Arc<dyn FileClient>) -> Self {
        Self {
            metadata: HandlerMetadata::new("origin.folders", "origin")
                .with_validation(ValidationProperty::matching("Directory", true)),
            files,
        }
    }
}

#[async_trait]
impl ProjectHandler for OriginHandler {
    fn metadata(&self) -> &HandlerMetadata {
        &self.metadata
    }

    async fn dependency_description(&self, entry: &Entry) -> Result<Option<DependencyDescription>> {
        let children = self.files.fetch_children(&entry.location).await?;
        let Some(origin) = children.iter().find(|c| c.name == ".origin") else {
            return Ok(None);
        };
        let content = self.files.read(&origin.location).await?;
        Ok(Some(DependencyDescription::at(content.trim())))
    }
}

/// Set up a workspace with two projects and two cloned folders.
fn setup_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("web")).unwrap();
    fs::write(
        root.join("web/project.json"),
        r#"{"Name":"Web","Dependencies":[{"Type":"file","Name":"assets","Location":"shared/assets"}]}"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("api")).unwrap();
    fs::write(root.join("api/project.json"), "").unwrap();

    fs::create_dir_all(root.join("shared/assets")).unwrap();
    fs::create_dir_all(root.join("clone-one")).unwrap();
    fs::write(root.join("clone-one/.origin"), "https://example.com/one.git\n").unwrap();
    fs::create_dir_all(root.join("clone-two")).unwrap();
    fs::write(root.join("clone-two/.origin"), "https://example.com/two.git\n").unwrap();

    fs::write(root.join("client.toml"), "pretty_json = true\nserialize_writes = true\n").unwrap();
    temp
}

fn open_client(root: &Path) -> ProjectClient {
    let config = ClientConfig::load(&root.join("client.toml")).unwrap();
    let files: Arc<dyn FileClient> = Arc::new(LocalFileClient::new(root));
    let registry = Arc::new(HandlerSet::new());
    registry.register(OriginHandler::new(files.clone()));
    ProjectClient::with_config(files, registry, config)
}

#[tokio::test]
async fn test_discover_projects() {
    let temp = setup_workspace();
    let client = open_client(temp.path());

    let workspace = client.file_client().load_workspace(None).await.unwrap();
    let mut names: Vec<String> = client
        .read_all_projects(&workspace)
        .await
        .iter()
        .filter_map(|p| p.name().map(String::from))
        .collect();
    names.sort();
    assert_eq!(names, vec!["Web", "api"]);
}

#[tokio::test]
async fn test_edit_and_resolve_dependencies() {
    let temp = setup_workspace();
    let client = open_client(temp.path());

    let web = client
        .read_project(&Entry::at("/file/web/", true), None)
        .await
        .unwrap()
        .unwrap();

    let clone = Dependency::new("origin", "two", "https://example.com/two.git");
    let web = client.add_project_dependency(&web, &clone).await.unwrap();
    assert_eq!(web.dependencies().unwrap().len(), 2);

    for (dependency, expected) in web
        .dependencies()
        .unwrap()
        .iter()
        .zip(["/file/shared/assets/", "/file/clone-two/"])
    {
        let entry = client
            .dependency_file_metadata(dependency, web.workspace_location())
            .await
            .unwrap();
        assert_eq!(entry.location, expected);
    }

    let web = client.remove_project_dependency(&web, &clone).await.unwrap();
    assert_eq!(web.dependencies().unwrap().len(), 1);
}

#[tokio::test]
async fn test_property_change_is_written_pretty() {
    let temp = setup_workspace();
    let client = open_client(temp.path());

    let api = client
        .read_project(&Entry::at("/file/api/", true), None)
        .await
        .unwrap()
        .unwrap();

    let mut properties = Map::new();
    properties.insert("Port".to_string(), json!(8080));
    let change = client
        .change_project_properties(&api, Some(properties))
        .await
        .unwrap();
    assert!(matches!(change, PropertyChange::Applied(ref p) if p.get("Port") == Some(&json!(8080))));

    let content = fs::read_to_string(temp.path().join("api/project.json")).unwrap();
    assert!(content.contains('\n'));
    let stored: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(stored, json!({"Port": 8080}));
}
