//! Dependency commands

use colored::Colorize;
use project_client::Dependency;
use serde_json::json;

use crate::commands::list::print_project;
use crate::context::Session;
use crate::error::{CliError, Result};

fn dependency(dependency_type: &str, location: &str, name: Option<&str>) -> Dependency {
    let mut dependency = Dependency::file(location);
    dependency.dependency_type = dependency_type.to_string();
    if let Some(name) = name {
        dependency.name = name.to_string();
    }
    dependency
}

/// Run the add-dependency command
pub async fn run_add_dependency(
    session: &Session,
    folder: &str,
    location: &str,
    dependency_type: &str,
    name: Option<&str>,
    json: bool,
) -> Result<()> {
    let project = session.require_project(folder).await?;
    let updated = session
        .client
        .add_project_dependency(&project, &dependency(dependency_type, location, name))
        .await?;
    print_project(&updated, json)
}

/// Run the remove-dependency command
pub async fn run_remove_dependency(
    session: &Session,
    folder: &str,
    location: &str,
    dependency_type: &str,
    json: bool,
) -> Result<()> {
    let project = session.require_project(folder).await?;
    let updated = session
        .client
        .remove_project_dependency(&project, &dependency(dependency_type, location, None))
        .await?;
    print_project(&updated, json)
}

/// Run the resolve command
///
/// Fails when any dependency does not resolve, after reporting all of them.
pub async fn run_resolve(session: &Session, folder: &str, json: bool) -> Result<()> {
    let project = session.require_project(folder).await?;
    let workspace_location = project.workspace_location().map(String::from);

    let mut report = Vec::new();
    let mut unresolved = 0;
    for dependency in project.dependencies()? {
        let result = session
            .client
            .dependency_file_metadata(&dependency, workspace_location.as_deref())
            .await;
        match result {
            Ok(entry) => {
                if !json {
                    println!(
                        "  {} {} {}",
                        "✓".green(),
                        dependency.name,
                        entry.location.dimmed()
                    );
                }
                report.push(json!({ "Dependency": dependency, "Entry": entry }));
            }
            Err(e) => {
                unresolved += 1;
                if !json {
                    println!("  {} {} {}", "✗".red(), dependency.name, e.to_string().red());
                }
                report.push(json!({ "Dependency": dependency, "Error": e.to_string() }));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if unresolved > 0 {
        return Err(CliError::user(format!(
            "{} of {} dependencies could not be resolved",
            unresolved,
            report.len()
        )));
    }
    Ok(())
}
