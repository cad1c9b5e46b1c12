//! Command implementations for project-cli

pub mod dependency;
pub mod list;
pub mod project;

pub use dependency::{run_add_dependency, run_remove_dependency, run_resolve};
pub use list::{run_list, run_show};
pub use project::{run_create, run_init, run_set};
