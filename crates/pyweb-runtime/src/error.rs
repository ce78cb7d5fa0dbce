//! Bootstrap and bridge error types.

use pyweb_core::{FetchError, RuntimeError};
use pyweb_hooks::FailureSite;
use pyweb_vfs::VfsError;
use thiserror::Error;

/// Errors that stop the bootstrap sequence.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The context was already bootstrapped.
    #[error("bootstrap already ran on this context")]
    AlreadyBooted,

    /// The runtime engine could not be loaded.
    #[error("runtime failed to load: {0}")]
    RuntimeLoad(#[source] RuntimeError),

    /// No base resource path is known.
    #[error("no base path configured; set `path` or load the bootstrap script as '{marker}'")]
    MissingBasePath {
        /// Marker the path derivation looked for.
        marker: String,
    },

    /// A module could not be fetched.
    #[error("failed to fetch module {file}: {source}")]
    ModuleFetch {
        /// Module filename.
        file: String,
        /// Fetch failure.
        #[source]
        source: FetchError,
    },

    /// A module could not be written to the runtime filesystem.
    #[error("failed to write module {file}: {source}")]
    ModuleWrite {
        /// Module filename, or the package directory.
        file: String,
        /// Filesystem failure.
        #[source]
        source: VfsError,
    },

    /// A system package could not be loaded.
    #[error("failed to load system package '{name}': {source}")]
    SystemPackage {
        /// Package name.
        name: String,
        /// Runtime failure.
        #[source]
        source: RuntimeError,
    },

    /// A version diagnostic statement failed to run.
    #[error("diagnostic statement failed: {0}")]
    Diagnostic(#[source] BridgeError),
}

impl BootstrapError {
    /// The component the failure belongs to.
    #[must_use]
    pub fn site(&self) -> FailureSite {
        match self {
            Self::RuntimeLoad(_) => FailureSite::RuntimeLoad,
            Self::MissingBasePath { .. } | Self::ModuleFetch { .. } | Self::ModuleWrite { .. } => {
                FailureSite::ModuleLoad
            },
            Self::AlreadyBooted | Self::SystemPackage { .. } | Self::Diagnostic(_) => {
                FailureSite::Bootstrap
            },
        }
    }

    /// Whether the debug hook has already seen this failure.
    ///
    /// Diagnostics run through the bridge, which reports on its own.
    #[must_use]
    pub fn already_reported(&self) -> bool {
        matches!(self, Self::Diagnostic(BridgeError::Runtime(_)))
    }
}

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Errors returned by the execute bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Called before the runtime was loaded.
    #[error("runtime is not loaded; bootstrap has not completed")]
    NotBooted,

    /// The context was dropped before a deferred call ran.
    #[error("application context was dropped before the deferred call ran")]
    ContextDropped,

    /// The source file could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The runtime raised.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sites() {
        let load = BootstrapError::RuntimeLoad(RuntimeError::Init {
            url: "u".into(),
            message: "m".into(),
        });
        assert_eq!(load.site(), FailureSite::RuntimeLoad);

        let fetch = BootstrapError::ModuleFetch {
            file: "tags.py".into(),
            source: FetchError::NotFound("x".into()),
        };
        assert_eq!(fetch.site(), FailureSite::ModuleLoad);
        assert!(!fetch.already_reported());
    }

    #[test]
    fn test_diagnostic_runtime_failure_already_reported() {
        let err = BootstrapError::Diagnostic(BridgeError::Runtime(RuntimeError::Execution(
            "ImportError".into(),
        )));
        assert!(err.already_reported());
        assert!(!BootstrapError::Diagnostic(BridgeError::NotBooted).already_reported());
    }
}
