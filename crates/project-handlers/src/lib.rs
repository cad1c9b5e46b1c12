//! Project handlers for the project client.
//!
//! A handler knows how to recognise and describe dependencies of one type.
//! Handlers are collected in a [`HandlerRegistry`] and matched against
//! workspace entries through a [`Validator`] built from their declared
//! validation properties.

pub mod error;
pub mod handler;
pub mod registry;
pub mod validation;

pub use error::{Error, Result};
pub use handler::{DependencyDescription, HandlerMetadata, HandlerParameter, ProjectHandler};
pub use registry::{HandlerRegistry, HandlerSet};
pub use validation::{ValidationProperty, Validator};
