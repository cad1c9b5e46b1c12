//! Listing and showing projects

use colored::Colorize;
use project_client::ProjectDescriptor;

use crate::context::Session;
use crate::error::Result;

/// Run the list command
pub async fn run_list(session: &Session, json: bool) -> Result<()> {
    let workspace = session.client.file_client().load_workspace(None).await?;
    let mut projects = session.client.read_all_projects(&workspace).await;
    projects.sort_by(|a, b| a.name().cmp(&b.name()));

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    println!("{} {}", "Projects in".bold(), session.root.display());
    println!();
    for project in &projects {
        let dependencies = project.dependencies().map(|d| d.len()).unwrap_or(0);
        println!(
            "  {:<20} {} ({} {})",
            project.name().unwrap_or_default().green(),
            project.content_location().unwrap_or_default().dimmed(),
            dependencies,
            if dependencies == 1 { "dependency" } else { "dependencies" }
        );
    }
    println!();
    println!("{} {} projects", "Total:".dimmed(), projects.len());
    Ok(())
}

/// Run the show command
pub async fn run_show(session: &Session, folder: &str, json: bool) -> Result<()> {
    let project = session.require_project(folder).await?;
    print_project(&project, json)
}

pub fn print_project(project: &ProjectDescriptor, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
        return Ok(());
    }

    println!("{}", project.name().unwrap_or_default().bold());
    for (key, value) in project.as_map() {
        if key == project_client::descriptor::NAME {
            continue;
        }
        println!("  {:<20} {}", key.cyan(), value);
    }
    Ok(())
}
