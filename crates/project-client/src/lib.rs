//! Client-side API for projects.
//!
//! A project is a folder in a workspace holding a `project.json` descriptor.
//! [`ProjectClient`] reads and edits descriptors through a
//! [`project_fs::FileClient`] and resolves declared dependencies through the
//! handlers of a [`project_handlers::HandlerRegistry`].

pub mod client;
pub mod config;
pub mod descriptor;
pub mod error;
mod gate;
pub mod logging;

pub use client::{InitOutcome, ProjectClient, PropertyChange, SkipReason};
pub use config::ClientConfig;
pub use descriptor::{Dependency, ProjectDescriptor};
pub use error::{Error, Result};
