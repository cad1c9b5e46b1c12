//! Shared test utilities for the project client workspace.
//!
//! This crate provides standard fixtures so the crate test suites do not each
//! rebuild workspaces and handlers by hand. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`workspace`]: in-memory workspaces populated with projects and files
//! - [`handlers`]: scripted project handlers

pub mod handlers;
pub mod workspace;

pub use handlers::StubHandler;
pub use workspace::TestWorkspace;
