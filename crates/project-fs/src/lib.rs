//! File storage abstraction for the project client.
//!
//! Entries are addressed by location strings rooted at [`location::FILE_ROOT`].
//! Folder locations end with `/`, file locations never do. Two backends are
//! provided: [`MemoryFileClient`] and [`LocalFileClient`].

pub mod client;
pub mod entry;
pub mod error;
pub mod io;
pub mod local;
pub mod location;
pub mod memory;

pub use client::FileClient;
pub use entry::{Entry, Workspace};
pub use error::{Error, Result};
pub use local::LocalFileClient;
pub use memory::MemoryFileClient;
