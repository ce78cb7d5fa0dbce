//! Mock implementations for testing.

use std::collections::HashMap;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use pyweb_core::{
    FetchError, FetchResult, Fetcher, HostDocument, Runtime, RuntimeError, RuntimeLoader,
    RuntimeResult, Value,
};
use pyweb_hooks::{DebugHook, FailureSite};
use pyweb_vfs::{MemoryVfs, Vfs};
use tokio::sync::{Notify, watch};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A call observed by [`MockRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    /// `run(code)`
    Run(String),
    /// `run_async(code)`
    RunAsync(String),
    /// `load_package(name)`
    LoadPackage(String),
    /// `load_packages_from_imports(code)`
    LoadPackagesFromImports(String),
}

/// Mock implementation of the `Runtime` trait.
///
/// Records every call, serves scripted results and failures keyed by a
/// substring of the executed code, and exposes its in-memory filesystem.
#[derive(Debug, Default)]
pub struct MockRuntime {
    fs: Arc<MemoryVfs>,
    calls: Mutex<Vec<RuntimeCall>>,
    results: Mutex<Vec<(String, Value)>>,
    failures: Mutex<Vec<(String, String)>>,
    delays: Mutex<Vec<(String, Duration)>>,
    failing_packages: Mutex<Vec<String>>,
    package_delay: Mutex<Option<Duration>>,
}

impl MockRuntime {
    /// Create a new mock runtime.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Return `value` from any execution whose code contains `needle`.
    pub fn respond_when(&self, needle: impl Into<String>, value: Value) {
        lock(&self.results).push((needle.into(), value));
    }

    /// Fail any execution whose code contains `needle`.
    pub fn fail_when(&self, needle: impl Into<String>, message: impl Into<String>) {
        lock(&self.failures).push((needle.into(), message.into()));
    }

    /// Suspend `run_async` for `delay` when the code contains `needle`.
    pub fn delay_when(&self, needle: impl Into<String>, delay: Duration) {
        lock(&self.delays).push((needle.into(), delay));
    }

    /// Suspend every `load_package` call for `delay`.
    pub fn delay_packages(&self, delay: Duration) {
        *lock(&self.package_delay) = Some(delay);
    }

    /// Fail `load_package(name)`.
    pub fn fail_package(&self, name: impl Into<String>) {
        lock(&self.failing_packages).push(name.into());
    }

    /// All calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RuntimeCall> {
        lock(&self.calls).clone()
    }

    /// Code passed to `run` and `run_async`, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RuntimeCall::Run(code) | RuntimeCall::RunAsync(code) => Some(code.clone()),
                _ => None,
            })
            .collect()
    }

    /// The runtime's filesystem.
    #[must_use]
    pub fn vfs(&self) -> Arc<MemoryVfs> {
        Arc::clone(&self.fs)
    }

    fn execute(&self, call: RuntimeCall, code: &str) -> RuntimeResult<Value> {
        lock(&self.calls).push(call);
        if let Some((_, message)) = lock(&self.failures)
            .iter()
            .find(|(needle, _)| code.contains(needle.as_str()))
        {
            return Err(RuntimeError::Execution(message.clone()));
        }
        Ok(lock(&self.results)
            .iter()
            .find(|(needle, _)| code.contains(needle.as_str()))
            .map_or(Value::Null, |(_, value)| value.clone()))
    }
}

#[async_trait]
impl Runtime for MockRuntime {
    fn run(&self, code: &str, _args: &[Value]) -> RuntimeResult<Value> {
        self.execute(RuntimeCall::Run(code.to_owned()), code)
    }

    async fn run_async(&self, code: &str, _args: &[Value]) -> RuntimeResult<Value> {
        tokio::task::yield_now().await;
        let delay = lock(&self.delays)
            .iter()
            .find(|(needle, _)| code.contains(needle.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.execute(RuntimeCall::RunAsync(code.to_owned()), code)
    }

    async fn load_package(&self, name: &str) -> RuntimeResult<()> {
        lock(&self.calls).push(RuntimeCall::LoadPackage(name.to_owned()));
        let delay = *lock(&self.package_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if lock(&self.failing_packages).iter().any(|p| p == name) {
            return Err(RuntimeError::Package {
                name: name.to_owned(),
                message: "package index unreachable".to_owned(),
            });
        }
        Ok(())
    }

    async fn load_packages_from_imports(&self, code: &str) -> RuntimeResult<()> {
        lock(&self.calls).push(RuntimeCall::LoadPackagesFromImports(code.to_owned()));
        Ok(())
    }

    fn fs(&self) -> Arc<dyn Vfs> {
        self.fs.clone()
    }
}

#[derive(Debug)]
enum LoaderMode {
    Ready,
    Gated,
    Never,
    Fail(String),
}

/// Mock implementation of the `RuntimeLoader` trait.
#[derive(Debug)]
pub struct MockRuntimeLoader {
    runtime: Arc<MockRuntime>,
    mode: LoaderMode,
    gate: Notify,
    urls: Mutex<Vec<String>>,
    loads: AtomicUsize,
}

impl MockRuntimeLoader {
    fn with_mode(runtime: Arc<MockRuntime>, mode: LoaderMode) -> Arc<Self> {
        Arc::new(Self {
            runtime,
            mode,
            gate: Notify::new(),
            urls: Mutex::new(Vec::new()),
            loads: AtomicUsize::new(0),
        })
    }

    /// Loader that hands out `runtime` immediately.
    #[must_use]
    pub fn new(runtime: Arc<MockRuntime>) -> Arc<Self> {
        Self::with_mode(runtime, LoaderMode::Ready)
    }

    /// Loader that waits for [`MockRuntimeLoader::release`].
    #[must_use]
    pub fn gated(runtime: Arc<MockRuntime>) -> Arc<Self> {
        Self::with_mode(runtime, LoaderMode::Gated)
    }

    /// Loader that never settles.
    #[must_use]
    pub fn never(runtime: Arc<MockRuntime>) -> Arc<Self> {
        Self::with_mode(runtime, LoaderMode::Never)
    }

    /// Loader that fails with `message`.
    #[must_use]
    pub fn failing(runtime: Arc<MockRuntime>, message: impl Into<String>) -> Arc<Self> {
        Self::with_mode(runtime, LoaderMode::Fail(message.into()))
    }

    /// Let a gated load complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// Number of `load` calls.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Index URLs passed to `load`.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        lock(&self.urls).clone()
    }
}

#[async_trait]
impl RuntimeLoader for MockRuntimeLoader {
    async fn load(&self, index_url: &str) -> RuntimeResult<Arc<dyn Runtime>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        lock(&self.urls).push(index_url.to_owned());

        match &self.mode {
            LoaderMode::Ready => {},
            LoaderMode::Gated => self.gate.notified().await,
            LoaderMode::Never => std::future::pending::<()>().await,
            LoaderMode::Fail(message) => {
                return Err(RuntimeError::Init {
                    url: index_url.to_owned(),
                    message: message.clone(),
                });
            },
        }

        Ok(self.runtime.clone())
    }
}

/// Mock implementation of the `Fetcher` trait.
///
/// Unknown paths fail with [`FetchError::NotFound`].
#[derive(Debug, Default)]
pub struct MockFetcher {
    files: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, String>>,
    delays: Mutex<HashMap<String, Duration>>,
    fetched: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Create an empty fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` at `path`.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, text: impl Into<String>) -> Self {
        lock(&self.files).insert(path.into(), text.into());
        self
    }

    /// Fail requests for `path` with a transport error.
    #[must_use]
    pub fn with_failure(self, path: impl Into<String>, message: impl Into<String>) -> Self {
        lock(&self.failures).insert(path.into(), message.into());
        self
    }

    /// Delay responses for `path`.
    #[must_use]
    pub fn with_delay(self, path: impl Into<String>, delay: Duration) -> Self {
        lock(&self.delays).insert(path.into(), delay);
        self
    }

    /// Paths requested so far, in request order.
    #[must_use]
    pub fn fetched(&self) -> Vec<String> {
        lock(&self.fetched).clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_text(&self, path: &str) -> FetchResult<String> {
        lock(&self.fetched).push(path.to_owned());

        let delay = lock(&self.delays).get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = lock(&self.failures).get(path).cloned() {
            return Err(FetchError::Transport {
                path: path.to_owned(),
                message,
            });
        }

        lock(&self.files)
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_owned()))
    }
}

/// Mock implementation of the `HostDocument` trait.
///
/// Loaded from the start unless built with [`MockHostDocument::deferred`].
#[derive(Debug)]
pub struct MockHostDocument {
    title: Mutex<Option<String>>,
    script_src: Option<String>,
    loaded: watch::Sender<bool>,
}

impl Default for MockHostDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHostDocument {
    /// An untitled, already loaded document with no script locator.
    #[must_use]
    pub fn new() -> Self {
        let (loaded, _) = watch::channel(true);
        Self {
            title: Mutex::new(None),
            script_src: None,
            loaded,
        }
    }

    /// A document whose load signal fires only on [`MockHostDocument::fire_load`].
    #[must_use]
    pub fn deferred() -> Self {
        let doc = Self::new();
        doc.loaded.send_replace(false);
        doc
    }

    /// Set the initial title.
    #[must_use]
    pub fn with_title(self, title: impl Into<String>) -> Self {
        *lock(&self.title) = Some(title.into());
        self
    }

    /// Set the bootstrap script locator.
    #[must_use]
    pub fn with_script_src(mut self, src: impl Into<String>) -> Self {
        self.script_src = Some(src.into());
        self
    }

    /// Signal that the document finished loading.
    pub fn fire_load(&self) {
        self.loaded.send_replace(true);
    }
}

#[async_trait]
impl HostDocument for MockHostDocument {
    fn current_script_src(&self) -> Option<String> {
        self.script_src.clone()
    }

    fn title(&self) -> Option<String> {
        lock(&self.title).clone()
    }

    fn set_title(&self, title: &str) {
        *lock(&self.title) = Some(title.to_owned());
    }

    async fn loaded(&self) {
        let mut rx = self.loaded.subscribe();
        let _ = rx.wait_for(|loaded| *loaded).await;
    }
}

/// A debug hook that records every notification.
#[derive(Debug, Default)]
pub struct RecordingDebugHook {
    events: Mutex<Vec<(FailureSite, String)>>,
}

impl RecordingDebugHook {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of notifications received.
    #[must_use]
    pub fn count(&self) -> usize {
        lock(&self.events).len()
    }

    /// Sites of all notifications, in order.
    #[must_use]
    pub fn sites(&self) -> Vec<FailureSite> {
        lock(&self.events).iter().map(|(site, _)| *site).collect()
    }

    /// Messages of all notifications, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        lock(&self.events).iter().map(|(_, msg)| msg.clone()).collect()
    }
}

impl DebugHook for RecordingDebugHook {
    fn on_failure(&self, site: FailureSite, error: &(dyn Error + 'static)) {
        lock(&self.events).push((site, error.to_string()));
    }
}
