//! Host-facing execution bridge.
//!
//! Every call into the runtime goes through [`RunBridge`] so that failures
//! are handled the same way everywhere: logged at `debug`, reported to the
//! debug hook exactly once, then returned unchanged to the caller.

use std::sync::Arc;

use pyweb_core::{Runtime, RuntimeError, Value};
use pyweb_hooks::{FailureSite, PendingError};
use tracing::debug;

use crate::context::AppContext;
use crate::error::{BridgeError, BridgeResult};

/// Executes code and files in the loaded runtime.
#[derive(Debug, Clone)]
pub struct RunBridge {
    ctx: Arc<AppContext>,
}

impl RunBridge {
    /// Bridge over `ctx`. Calls fail with [`BridgeError::NotBooted`] until
    /// the bootstrap has installed a runtime.
    #[must_use]
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    fn runtime(&self) -> BridgeResult<Arc<dyn Runtime>> {
        self.ctx.runtime().ok_or(BridgeError::NotBooted)
    }

    fn fail(&self, site: FailureSite, e: RuntimeError) -> BridgeError {
        debug!(site = %site, error = %e, "runtime call failed");
        self.ctx.hooks().notify(site, &e);
        BridgeError::Runtime(e)
    }

    /// Execute `code` synchronously.
    ///
    /// # Errors
    ///
    /// [`BridgeError::NotBooted`] before bootstrap, otherwise the runtime's
    /// own failure.
    pub fn run(&self, code: &str, args: &[Value]) -> BridgeResult<Value> {
        let runtime = self.runtime()?;
        runtime
            .run(code, args)
            .map_err(|e| self.fail(FailureSite::Run, e))
    }

    /// Load the packages `code` imports, then execute it asynchronously.
    ///
    /// # Errors
    ///
    /// [`BridgeError::NotBooted`] before bootstrap, otherwise the first
    /// runtime failure of either step.
    pub async fn run_async(&self, code: &str, args: &[Value]) -> BridgeResult<Value> {
        let runtime = self.runtime()?;
        let result = match runtime.load_packages_from_imports(code).await {
            Ok(()) => runtime.run_async(code, args).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| self.fail(FailureSite::RunAsync, e))
    }

    /// Fetch the file at `path` and execute it synchronously.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Fetch`] if the file cannot be fetched (not reported to
    /// the hook), otherwise as [`RunBridge::run`].
    pub async fn run_file(&self, path: &str, args: &[Value]) -> BridgeResult<Value> {
        self.runtime()?;
        let code = self.ctx.load_text(path).await?;
        self.run(&code, args)
    }

    /// Fetch the file at `path` and execute it asynchronously.
    ///
    /// # Errors
    ///
    /// As [`RunBridge::run_file`] and [`RunBridge::run_async`].
    pub async fn run_file_async(&self, path: &str, args: &[Value]) -> BridgeResult<Value> {
        self.runtime()?;
        let code = self.ctx.load_text(path).await?;
        self.run_async(&code, args).await
    }

    /// Park an asynchronous execution in the pending slot instead of
    /// awaiting it.
    ///
    /// Nothing runs until [`RunBridge::observe_pending`] awaits the slot.
    /// A later call replaces an unobserved one. The parked call holds the
    /// context weakly and fails with [`BridgeError::ContextDropped`] if the
    /// context is gone by then.
    pub fn defer_async(&self, code: impl Into<String>, args: Vec<Value>) {
        let ctx = Arc::downgrade(&self.ctx);
        let code = code.into();
        self.ctx.pending().set_pending(Box::pin(async move {
            let ctx = ctx
                .upgrade()
                .ok_or_else(|| -> PendingError { Box::new(BridgeError::ContextDropped) })?;
            RunBridge::new(ctx)
                .run_async(&code, &args)
                .await
                .map_err(|e| -> PendingError { Box::new(e) })
        }));
    }

    /// Await whatever the pending slot holds and keep the resolved value.
    ///
    /// Rejections are logged and reported, never returned.
    pub async fn observe_pending(&self) -> Option<Value> {
        self.ctx.pending().observe_latest(self.ctx.hooks()).await;
        self.ctx.pending().latest()
    }
}
