//! The one-time startup sequence.
//!
//! Stages, in order:
//!
//! 1. Wait for the host document to finish loading
//! 2. Load the runtime engine
//! 3. Concurrently: load system packages, and materialize the package
//!    modules into the runtime filesystem. Each branch ends with a version
//!    diagnostic.
//! 4. Run the optional user entry point
//! 5. Invoke the `onload` callback
//!
//! Nothing in stage 3 starts before the runtime handle exists, and stage 5
//! never runs if stage 2 or 3 failed.

use std::sync::Arc;

use pyweb_core::{HostDocument, Runtime, RuntimeLoader, Version};
use tracing::{debug, error, info, warn};

use crate::bridge::RunBridge;
use crate::context::AppContext;
use crate::error::{BootstrapError, BootstrapResult, BridgeError};
use crate::loader::ModuleLoader;

const SYSTEM_DIAGNOSTIC: &str = "import sys\nprint(sys.version)\ndel sys\n";

fn package_diagnostic(package: &str) -> String {
    format!("import {package}\nprint('PyWeb version:', {package}.__version__)\ndel {package}\n")
}

/// Drives the bootstrap sequence over a shared [`AppContext`].
pub struct Bootstrapper {
    ctx: Arc<AppContext>,
    loader: Arc<dyn RuntimeLoader>,
    host: Arc<dyn HostDocument>,
}

impl Bootstrapper {
    /// Sequencer loading the engine through `loader` once `host` is ready.
    #[must_use]
    pub fn new(
        ctx: Arc<AppContext>,
        loader: Arc<dyn RuntimeLoader>,
        host: Arc<dyn HostDocument>,
    ) -> Self {
        Self { ctx, loader, host }
    }

    /// Run the sequence and return a bridge bound to the loaded runtime.
    ///
    /// # Errors
    ///
    /// Fails if the context was already bootstrapped, the runtime cannot be
    /// loaded, or a system package, module or diagnostic fails. Failures are
    /// logged and reported to the debug hook before being returned. A missing
    /// or failing entry point is not an error.
    pub async fn run(self) -> BootstrapResult<RunBridge> {
        if !self.ctx.begin() {
            return Err(BootstrapError::AlreadyBooted);
        }

        match self.sequence().await {
            Ok(bridge) => Ok(bridge),
            Err(e) => {
                error!(site = %e.site(), error = %e, "pyweb bootstrap failed");
                if !e.already_reported() {
                    self.ctx.hooks().notify(e.site(), &e);
                }
                Err(e)
            },
        }
    }

    async fn sequence(&self) -> BootstrapResult<RunBridge> {
        self.host.loaded().await;
        info!(version = %Version::current(), "Loading pyweb");

        let index_url = self.ctx.config().index_url();
        debug!(index_url = %index_url, "loading runtime");
        let runtime = self
            .loader
            .load(&index_url)
            .await
            .map_err(BootstrapError::RuntimeLoad)?;
        self.ctx.install_runtime(Arc::clone(&runtime));
        info!("runtime loaded");

        let bridge = RunBridge::new(Arc::clone(&self.ctx));
        tokio::try_join!(
            self.load_system(runtime.as_ref(), &bridge),
            self.load_package(runtime.as_ref(), &bridge),
        )?;

        self.run_entry_point(&bridge).await;

        (self.ctx.resolved().onload)().await;
        info!("pyweb loaded");
        Ok(bridge)
    }

    async fn load_system(&self, runtime: &dyn Runtime, bridge: &RunBridge) -> BootstrapResult<()> {
        for name in &self.ctx.config().system_packages {
            runtime
                .load_package(name)
                .await
                .map_err(|source| BootstrapError::SystemPackage {
                    name: name.clone(),
                    source,
                })?;
            debug!(package = %name, "system package loaded");
        }

        bridge
            .run(SYSTEM_DIAGNOSTIC, &[])
            .map_err(BootstrapError::Diagnostic)?;
        Ok(())
    }

    async fn load_package(&self, runtime: &dyn Runtime, bridge: &RunBridge) -> BootstrapResult<()> {
        let config = self.ctx.config();
        let fs = runtime.fs();

        let manifest = ModuleLoader::new(config, self.ctx.fetcher(), self.ctx.loading())
            .stage(fs.as_ref())
            .await?;
        self.ctx.install_manifest(manifest);

        bridge
            .run(&package_diagnostic(&config.package), &[])
            .map_err(BootstrapError::Diagnostic)?;
        Ok(())
    }

    async fn run_entry_point(&self, bridge: &RunBridge) {
        let entry = &self.ctx.config().entry_point;
        match bridge.run_file_async(entry, &[]).await {
            Ok(_) => debug!(entry = %entry, "entry point executed"),
            Err(BridgeError::Fetch(e)) => {
                info!(entry = %entry, reason = %e, "No user entry point found");
            },
            Err(e) => warn!(entry = %entry, error = %e, "User entry point failed"),
        }
    }
}

/// Resolve the whole sequence in one call.
///
/// # Errors
///
/// See [`Bootstrapper::run`].
pub async fn bootstrap(
    ctx: Arc<AppContext>,
    loader: Arc<dyn RuntimeLoader>,
    host: Arc<dyn HostDocument>,
) -> BootstrapResult<RunBridge> {
    Bootstrapper::new(ctx, loader, host).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_diagnostic() {
        assert_eq!(
            package_diagnostic("pyweb"),
            "import pyweb\nprint('PyWeb version:', pyweb.__version__)\ndel pyweb\n"
        );
    }

    #[test]
    fn test_system_diagnostic_cleans_up() {
        assert!(SYSTEM_DIAGNOSTIC.starts_with("import sys"));
        assert!(SYSTEM_DIAGNOSTIC.trim_end().ends_with("del sys"));
    }
}
