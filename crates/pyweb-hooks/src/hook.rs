//! Hook trait and failure sites.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The component that caught a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureSite {
    /// Instantiating the runtime engine.
    RuntimeLoad,
    /// Discovering or materializing package modules.
    ModuleLoad,
    /// Any other bootstrap stage.
    Bootstrap,
    /// Synchronous execute bridge.
    Run,
    /// Asynchronous execute bridge.
    RunAsync,
    /// Pending value observer.
    PendingObserver,
}

impl fmt::Display for FailureSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RuntimeLoad => "runtime_load",
            Self::ModuleLoad => "module_load",
            Self::Bootstrap => "bootstrap",
            Self::Run => "run",
            Self::RunAsync => "run_async",
            Self::PendingObserver => "pending_observer",
        };
        f.write_str(name)
    }
}

/// Receives every caught failure.
///
/// Implementations must be side-effect only. The dispatcher contains
/// panics, but a hook should not rely on that.
pub trait DebugHook: Send + Sync {
    /// Called once per caught failure.
    fn on_failure(&self, site: FailureSite, error: &(dyn Error + 'static));
}

/// A hook that ignores everything. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDebugHook;

impl DebugHook for NoopDebugHook {
    fn on_failure(&self, _site: FailureSite, _error: &(dyn Error + 'static)) {}
}
