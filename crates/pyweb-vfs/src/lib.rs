//! PyWeb Virtual File System (VFS).
//!
//! The embedded runtime keeps its own private file tree. Module sources are
//! written into it before any interpreter-side `import` executes. This crate
//! abstracts that tree behind the [`Vfs`] trait and ships two
//! implementations:
//!
//! - [`MemoryVfs`]: an in-memory tree that tolerates concurrent writes to
//!   independent files.
//! - [`HostVfs`]: a tree rooted in a directory of the host filesystem, used
//!   to stage module files on disk.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Virtual filesystem error types.
pub mod error;
/// Host-directory backed virtual filesystem implementation.
pub mod host;
/// In-memory virtual filesystem implementation.
pub mod memory;
/// Path normalization and sandboxing utilities.
pub mod path;

pub use error::{VfsError, VfsResult};
pub use host::HostVfs;
pub use memory::MemoryVfs;

use async_trait::async_trait;

/// The runtime's private file tree.
///
/// Paths are relative and `/`-separated. Implementations must reject paths
/// that escape the root.
#[async_trait]
pub trait Vfs: Send + Sync {
    /// Create a directory. The parent must already exist.
    ///
    /// Returns [`VfsError::AlreadyExists`] if the path is taken.
    async fn mkdir(&self, path: &str) -> VfsResult<()>;

    /// Create or replace a file. The parent directory must already exist.
    async fn write_file(&self, path: &str, contents: &str) -> VfsResult<()>;

    /// Read a whole file as text.
    async fn read_file(&self, path: &str) -> VfsResult<String>;
}
