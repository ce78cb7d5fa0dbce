//! The embedded interpreter seen from the host.

use std::sync::Arc;

use async_trait::async_trait;
use pyweb_vfs::Vfs;

use crate::Value;
use crate::error::RuntimeResult;

/// An initialized embedded interpreter.
///
/// Implementations own their concurrency discipline; callers never hold a
/// lock around these calls.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Execute source text immediately and return its result value.
    ///
    /// `args` are passed through untouched to the interpreter.
    fn run(&self, code: &str, args: &[Value]) -> RuntimeResult<Value>;

    /// Execute source text, allowing top-level `await`.
    async fn run_async(&self, code: &str, args: &[Value]) -> RuntimeResult<Value>;

    /// Load a named runtime package.
    async fn load_package(&self, name: &str) -> RuntimeResult<()>;

    /// Load whichever packages the import statements in `code` require.
    async fn load_packages_from_imports(&self, code: &str) -> RuntimeResult<()>;

    /// The runtime's private filesystem.
    fn fs(&self) -> Arc<dyn Vfs>;
}

/// Instantiates the embedded interpreter from a versioned index URL.
#[async_trait]
pub trait RuntimeLoader: Send + Sync {
    /// Fetch and initialize the engine located at `index_url`.
    async fn load(&self, index_url: &str) -> RuntimeResult<Arc<dyn Runtime>>;
}
