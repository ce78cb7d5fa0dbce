//! Panic-contained hook dispatch.

use std::error::Error;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{trace, warn};

use crate::hook::{DebugHook, FailureSite, NoopDebugHook};

/// Delivers failures to the installed [`DebugHook`].
#[derive(Clone)]
pub struct HookDispatcher {
    hook: Arc<dyn DebugHook>,
}

impl fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDispatcher").finish_non_exhaustive()
    }
}

impl Default for HookDispatcher {
    fn default() -> Self {
        Self::noop()
    }
}

impl HookDispatcher {
    /// Dispatch to `hook`.
    #[must_use]
    pub fn new(hook: Arc<dyn DebugHook>) -> Self {
        Self { hook }
    }

    /// Dispatch to [`NoopDebugHook`].
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopDebugHook))
    }

    /// Report a caught failure. Never panics and never fails.
    pub fn notify(&self, site: FailureSite, error: &(dyn Error + 'static)) {
        trace!(site = %site, error = %error, "notifying debug hook");
        let outcome = catch_unwind(AssertUnwindSafe(|| self.hook.on_failure(site, error)));
        if outcome.is_err() {
            warn!(site = %site, "debug hook panicked; ignoring");
        }
    }
}
