//! Creating projects and editing their properties

use colored::Colorize;
use project_client::{InitOutcome, ProjectDescriptor, PropertyChange, SkipReason};
use project_fs::location;
use serde_json::{Map, Value};

use crate::commands::list::print_project;
use crate::context::Session;
use crate::error::{CliError, Result};

/// Run the init command
pub async fn run_init(session: &Session, folder: &str, name: Option<&str>, json: bool) -> Result<()> {
    let content_location = session.folder_location(folder)?;
    let outcome = session
        .client
        .init_project(&content_location, name.map(ProjectDescriptor::named))
        .await?;
    report_outcome(&outcome, json)
}

/// Run the create command
pub async fn run_create(session: &Session, name: &str, json: bool) -> Result<()> {
    location::validate_name(name).map_err(CliError::user)?;
    let workspace = session.client.file_client().load_workspace(None).await?;
    let outcome = session
        .client
        .create_project(&workspace.location, ProjectDescriptor::named(name))
        .await?;
    report_outcome(&outcome, json)
}

fn report_outcome(outcome: &InitOutcome, json: bool) -> Result<()> {
    let created = match outcome {
        InitOutcome::Initialized {
            content_location, ..
        } => content_location.clone(),
        InitOutcome::Created { file } => file.location.clone(),
    };
    if json {
        println!("{}", serde_json::json!({ "Created": created }));
    } else {
        println!("{} {}", "Created".green().bold(), created);
    }
    Ok(())
}

/// Run the set command
pub async fn run_set(session: &Session, folder: &str, pairs: &[String], json: bool) -> Result<()> {
    let project = session.require_project(folder).await?;
    let properties = if pairs.is_empty() {
        None
    } else {
        Some(parse_properties(pairs)?)
    };

    match session.client.change_project_properties(&project, properties).await? {
        PropertyChange::Applied(updated) => print_project(&updated, json),
        PropertyChange::Skipped(SkipReason::NoProperties) => {
            println!("{}", "Nothing to change.".dimmed());
            Ok(())
        }
        PropertyChange::Skipped(SkipReason::NoDescriptorLocation) => {
            Err(CliError::user(format!("'{}' has no descriptor file", folder)))
        }
    }
}

/// Parse `key=value` pairs. Values that are valid JSON keep their type.
pub fn parse_properties(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut properties = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| CliError::user(format!("expected key=value, got '{}'", pair)))?;
        if key.is_empty() {
            return Err(CliError::user(format!("missing key in '{}'", pair)));
        }
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        properties.insert(key.to_string(), value);
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_properties_keeps_json_types() {
        let parsed = parse_properties(&pairs(&["a=1", "b=true", "c={\"x\":[1]}", "d=plain text"]))
            .unwrap();
        assert_eq!(parsed.get("a"), Some(&json!(1)));
        assert_eq!(parsed.get("b"), Some(&json!(true)));
        assert_eq!(parsed.get("c"), Some(&json!({"x": [1]})));
        assert_eq!(parsed.get("d"), Some(&json!("plain text")));
    }

    #[test]
    fn test_parse_properties_splits_on_first_equals() {
        let parsed = parse_properties(&pairs(&["url=a=b"])).unwrap();
        assert_eq!(parsed.get("url"), Some(&json!("a=b")));
    }

    #[test]
    fn test_parse_properties_rejects_malformed_pairs() {
        assert!(parse_properties(&pairs(&["novalue"])).is_err());
        assert!(parse_properties(&pairs(&["=1"])).is_err());
    }
}
