//! Handler registry
//!
//! The registry is the source the project client snapshots its handlers from.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::handler::ProjectHandler;

/// Source of the currently registered project handlers.
pub trait HandlerRegistry: Send + Sync {
    /// All registered handlers, in registration order.
    fn handlers(&self) -> Vec<Arc<dyn ProjectHandler>>;
}

/// A registry that handlers can be added to at any time.
///
/// Several handlers may share a type; lookups by type return the first one
/// registered.
///
/// # Example
///
/// ```
/// use project_handlers::{HandlerRegistry, HandlerSet};
///
/// let registry = HandlerSet::new();
/// assert!(registry.handlers().is_empty());
/// ```
#[derive(Default)]
pub struct HandlerSet {
    handlers: RwLock<Vec<Arc<dyn ProjectHandler>>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    pub fn register(&self, handler: impl ProjectHandler + 'static) {
        self.register_arc(Arc::new(handler));
    }

    pub fn register_arc(&self, handler: Arc<dyn ProjectHandler>) {
        tracing::debug!(handler_type = handler.handler_type(), "Registering project handler");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    /// Types of all registered handlers, in registration order.
    pub fn types(&self) -> Vec<String> {
        self.handlers()
            .iter()
            .map(|h| h.handler_type().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HandlerRegistry for HandlerSet {
    fn handlers(&self) -> Vec<Arc<dyn ProjectHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSet")
            .field("types", &self.types())
            .finish()
    }
}
