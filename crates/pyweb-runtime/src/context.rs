//! Application context shared by every bootstrap component.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use pyweb_config::{Config, ResolvedConfig};
use pyweb_core::{FetchResult, Fetcher, Runtime};
use pyweb_hooks::{DebugHook, HookDispatcher, PendingSlot};
use tracing::trace;

use crate::discovery::ModuleManifest;

/// Records which path is currently being fetched.
///
/// Last write wins; concurrent fetches overwrite each other. Diagnostic only.
#[derive(Debug, Default)]
pub struct LoadingMarker {
    current: Mutex<Option<String>>,
}

impl LoadingMarker {
    /// An empty marker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Option<String>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `path` as loading.
    pub fn record(&self, path: &str) {
        *self.guard() = Some(path.to_owned());
    }

    /// The most recently marked path.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.guard().clone()
    }

    /// Mark `path`, then fetch it through `fetcher`.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error.
    pub async fn fetch(&self, fetcher: &dyn Fetcher, path: &str) -> FetchResult<String> {
        self.record(path);
        trace!(path = %path, "fetching");
        fetcher.fetch_text(path).await
    }
}

/// Everything the bootstrap and the bridge share.
///
/// Created once, before loading begins, and passed around behind an `Arc`.
/// The runtime handle and the module manifest are written once during
/// bootstrap and read-only afterwards.
pub struct AppContext {
    config: ResolvedConfig,
    fetcher: Arc<dyn Fetcher>,
    hooks: HookDispatcher,
    pending: PendingSlot,
    loading: LoadingMarker,
    started: AtomicBool,
    runtime: OnceLock<Arc<dyn Runtime>>,
    manifest: OnceLock<ModuleManifest>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("loading", &self.loading)
            .field("booted", &self.runtime.get().is_some())
            .field("manifest", &self.manifest.get())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Context over a resolved configuration, fetching through `fetcher`,
    /// with a no-op debug hook.
    #[must_use]
    pub fn new(config: ResolvedConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            hooks: HookDispatcher::noop(),
            pending: PendingSlot::new(),
            loading: LoadingMarker::new(),
            started: AtomicBool::new(false),
            runtime: OnceLock::new(),
            manifest: OnceLock::new(),
        }
    }

    /// Install a debug hook.
    #[must_use]
    pub fn with_debug_hook(mut self, hook: Arc<dyn DebugHook>) -> Self {
        self.hooks = HookDispatcher::new(hook);
        self
    }

    /// The resolved configuration.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The data options of the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config.config
    }

    /// The resource fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &dyn Fetcher {
        self.fetcher.as_ref()
    }

    /// The debug hook dispatcher.
    #[must_use]
    pub fn hooks(&self) -> &HookDispatcher {
        &self.hooks
    }

    /// The pending-value slot.
    #[must_use]
    pub fn pending(&self) -> &PendingSlot {
        &self.pending
    }

    /// The currently-loading marker.
    #[must_use]
    pub fn loading(&self) -> &LoadingMarker {
        &self.loading
    }

    /// The runtime handle, once loaded.
    #[must_use]
    pub fn runtime(&self) -> Option<Arc<dyn Runtime>> {
        self.runtime.get().cloned()
    }

    /// The module manifest, once the package has been loaded.
    #[must_use]
    pub fn manifest(&self) -> Option<&ModuleManifest> {
        self.manifest.get()
    }

    /// Fetch `path` as text, marking it as loading.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error.
    pub async fn load_text(&self, path: &str) -> FetchResult<String> {
        self.loading.fetch(self.fetcher.as_ref(), path).await
    }

    /// Claim the right to bootstrap. Only the first call returns true.
    pub(crate) fn begin(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn install_runtime(&self, runtime: Arc<dyn Runtime>) {
        let _ = self.runtime.set(runtime);
    }

    pub(crate) fn install_manifest(&self, manifest: ModuleManifest) {
        let _ = self.manifest.set(manifest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyweb_config::ConfigResolver;
    use pyweb_test::{MockFetcher, test_host};

    fn context(fetcher: MockFetcher) -> AppContext {
        let resolved = ConfigResolver::new().resolve(&test_host());
        AppContext::new(resolved, Arc::new(fetcher))
    }

    #[test]
    fn test_begin_only_once() {
        let ctx = context(MockFetcher::new());
        assert!(ctx.begin());
        assert!(!ctx.begin());
    }

    #[tokio::test]
    async fn test_load_text_marks_path() {
        let ctx = context(MockFetcher::new().with_file("./main.py", "print(1)"));
        assert_eq!(ctx.loading().current(), None);

        let text = ctx.load_text("./main.py").await.unwrap();
        assert_eq!(text, "print(1)");
        assert_eq!(ctx.loading().current().as_deref(), Some("./main.py"));

        assert!(ctx.load_text("./missing.py").await.is_err());
        assert_eq!(ctx.loading().current().as_deref(), Some("./missing.py"));
    }

    #[test]
    fn test_not_booted_initially() {
        let ctx = context(MockFetcher::new());
        assert!(ctx.runtime().is_none());
        assert!(ctx.manifest().is_none());
        assert_eq!(ctx.config().package, "pyweb");
    }
}
