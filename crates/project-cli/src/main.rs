//! Projects CLI
//!
//! Reads and edits the project descriptors of a workspace directory.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::Session;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = project_client::logging::init("warn", cli.verbose) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let Some(command) = cli.command.clone() else {
        println!("{} workspace project descriptors", "projects".green().bold());
        println!();
        println!("Run {} for available commands.", "projects --help".cyan());
        return Ok(());
    };

    let session = Session::open(cli.root.as_deref(), cli.config.as_deref())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(&session, command, cli.json))
}

async fn execute_command(session: &Session, cmd: Commands, json: bool) -> Result<()> {
    match cmd {
        Commands::List => commands::run_list(session, json).await,
        Commands::Show { folder } => commands::run_show(session, &folder, json).await,
        Commands::Init { folder, name } => {
            commands::run_init(session, &folder, name.as_deref(), json).await
        }
        Commands::Create { name } => commands::run_create(session, &name, json).await,
        Commands::AddDependency {
            folder,
            location,
            dependency_type,
            name,
        } => {
            commands::run_add_dependency(
                session,
                &folder,
                &location,
                &dependency_type,
                name.as_deref(),
                json,
            )
            .await
        }
        Commands::RemoveDependency {
            folder,
            location,
            dependency_type,
        } => {
            commands::run_remove_dependency(session, &folder, &location, &dependency_type, json)
                .await
        }
        Commands::Set { folder, properties } => {
            commands::run_set(session, &folder, &properties, json).await
        }
        Commands::Resolve { folder } => commands::run_resolve(session, &folder, json).await,
    }
}
