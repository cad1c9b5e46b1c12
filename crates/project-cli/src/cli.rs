//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Manage the project descriptors of a workspace directory
#[derive(Parser, Debug)]
#[command(name = "projects")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace directory (defaults to the current directory)
    #[arg(long, global = true, env = "PROJECTS_ROOT")]
    pub root: Option<PathBuf>,

    /// Client configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every project in the workspace
    List,

    /// Show the descriptor of the project a folder belongs to
    Show {
        /// Folder inside the workspace, e.g. `app` or `app/src`
        folder: String,
    },

    /// Create the descriptor file in an existing folder
    ///
    /// Examples:
    ///   projects init app              # Empty project.json
    ///   projects init app --name App   # project.json with a name
    Init {
        /// Folder inside the workspace
        folder: String,

        /// Project name to write into the new descriptor
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Create a new project folder with a descriptor
    Create {
        /// Name of the project folder
        name: String,
    },

    /// Declare a dependency of a project
    ///
    /// Examples:
    ///   projects add-dependency app lib/src
    ///   projects add-dependency app /gitapi/clone/lib --type git --name lib
    AddDependency {
        /// Project folder
        folder: String,

        /// Location of the dependency
        location: String,

        /// Dependency type
        #[arg(short = 't', long = "type", default_value = "file")]
        dependency_type: String,

        /// Display name (defaults to the last path segment)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Remove a declared dependency
    RemoveDependency {
        /// Project folder
        folder: String,

        /// Location of the dependency
        location: String,

        /// Dependency type
        #[arg(short = 't', long = "type", default_value = "file")]
        dependency_type: String,
    },

    /// Set top-level descriptor properties
    ///
    /// Values are parsed as JSON when possible and kept as strings otherwise.
    ///
    /// Examples:
    ///   projects set app Version=3 Description="Main app"
    Set {
        /// Project folder
        folder: String,

        /// Properties as key=value pairs
        #[arg(value_name = "KEY=VALUE")]
        properties: Vec<String>,
    },

    /// Resolve each declared dependency to a workspace entry
    Resolve {
        /// Project folder
        folder: String,
    },
}
