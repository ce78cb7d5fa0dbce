//! Shared harness for bootstrap integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pyweb_config::{ConfigResolver, entry_fn};
use pyweb_core::HostDocument;
use pyweb_runtime::{AppContext, Bootstrapper};
use pyweb_test::{MockFetcher, MockRuntime, MockRuntimeLoader, RecordingDebugHook, test_host};

/// Every collaborator of one bootstrap run, with handles kept for assertions.
#[allow(dead_code)]
pub struct Harness {
    /// The runtime handed out by the loader.
    pub runtime: Arc<MockRuntime>,
    /// The runtime loader.
    pub loader: Arc<MockRuntimeLoader>,
    /// The resource fetcher.
    pub fetcher: Arc<MockFetcher>,
    /// The host document.
    pub host: Arc<dyn HostDocument>,
    /// The debug hook.
    pub hook: Arc<RecordingDebugHook>,
    /// The shared context.
    pub ctx: Arc<AppContext>,
    /// Number of `onload` invocations.
    pub onload_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl Harness {
    /// A titled host serving the fixture package with a ready loader.
    pub fn new(fetcher: MockFetcher) -> Self {
        let runtime = MockRuntime::new();
        Self::build(
            fetcher,
            MockRuntimeLoader::new(runtime.clone()),
            runtime,
            Arc::new(test_host()),
            ConfigResolver::new(),
        )
    }

    /// Full control over every collaborator.
    pub fn build(
        fetcher: MockFetcher,
        loader: Arc<MockRuntimeLoader>,
        runtime: Arc<MockRuntime>,
        host: Arc<dyn HostDocument>,
        resolver: ConfigResolver,
    ) -> Self {
        pyweb_test::init_test_tracing();

        let onload_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&onload_calls);
        let resolved = resolver
            .with_onload(entry_fn(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }))
            .resolve(host.as_ref());

        let fetcher = Arc::new(fetcher);
        let hook = RecordingDebugHook::new();
        let ctx = Arc::new(
            AppContext::new(resolved, fetcher.clone()).with_debug_hook(hook.clone()),
        );

        Self {
            runtime,
            loader,
            fetcher,
            host,
            hook,
            ctx,
            onload_calls,
        }
    }

    /// A fresh sequencer over this harness.
    pub fn bootstrapper(&self) -> Bootstrapper {
        Bootstrapper::new(
            Arc::clone(&self.ctx),
            self.loader.clone(),
            Arc::clone(&self.host),
        )
    }

    /// How many times `onload` ran.
    pub fn onload_count(&self) -> usize {
        self.onload_calls.load(Ordering::SeqCst)
    }
}
