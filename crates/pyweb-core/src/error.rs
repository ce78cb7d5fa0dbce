//! Error types shared across the bootstrap crates.

use pyweb_vfs::VfsError;
use thiserror::Error;

/// Errors raised by the embedded runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine could not be fetched or initialized.
    #[error("failed to initialize runtime from {url}: {message}")]
    Init {
        /// Index URL the engine was loaded from.
        url: String,
        /// Failure description.
        message: String,
    },

    /// Interpreter code raised.
    #[error("execution failed: {0}")]
    Execution(String),

    /// A runtime package could not be loaded.
    #[error("failed to load package '{name}': {message}")]
    Package {
        /// Package name.
        name: String,
        /// Failure description.
        message: String,
    },

    /// The runtime's virtual filesystem rejected an operation.
    #[error("virtual filesystem error: {0}")]
    Fs(#[from] VfsError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised while fetching a text resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Nothing exists at the requested location.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("fetching {path} returned status {status}")]
    Status {
        /// Requested path.
        path: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be completed.
    #[error("transport error fetching {path}: {message}")]
    Transport {
        /// Requested path.
        path: String,
        /// Failure description.
        message: String,
    },

    /// A relative path climbs above the resource root.
    #[error("{0} resolves outside the resource root")]
    OutsideRoot(String),

    /// Local read failure.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Requested path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether the failure means the resource is simply absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Status { status: 404, .. })
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
