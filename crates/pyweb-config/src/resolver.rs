//! Resolution of the effective configuration.
//!
//! Implements the `ConfigResolver::resolve()` algorithm:
//! 1. Take the defaults layer (the embedded `defaults.toml` unless overridden)
//! 2. Take the user layer, synthesizing an empty one with a warning if absent
//! 3. Normalize user keys to `snake_case` and deep-merge over the defaults
//! 4. Deserialize the merged tree, degrading to defaults on failure
//! 5. Derive `path` from the host's script locator when not configured
//! 6. Assign a default document title when the host has none
//! 7. Pick the `onload` callback once
//!
//! Resolution never fails; every problem is reported with `warn!`.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use pyweb_core::HostDocument;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::loader::embedded_defaults;
use crate::merge::{deep_merge, snake_case_keys};
use crate::types::Config;

/// A zero-argument asynchronous callback.
pub type EntryFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Wrap an async closure as an [`EntryFn`].
pub fn entry_fn<F, Fut>(f: F) -> EntryFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<'static, ()> { Box::pin(f()) })
}

/// Configuration after resolution. Read-only from here on.
#[derive(Clone)]
pub struct ResolvedConfig {
    /// Merged data options.
    pub config: Config,
    /// Callback run once bootstrap completes.
    pub onload: EntryFn,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("config", &self.config)
            .field("onload", &"<callback>")
            .finish()
    }
}

/// Derive the base resource path from the bootstrap script's locator.
///
/// Takes everything before the first occurrence of `marker` and strips
/// trailing `/`. Returns `None` when the marker does not occur.
///
/// `http://host/assets/pyweb.js?x=1` with marker `pyweb.js` gives
/// `http://host/assets`.
#[must_use]
pub fn derive_base_path(script_src: &str, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    let idx = script_src.find(marker)?;
    Some(script_src[..idx].trim_end_matches('/').to_owned())
}

/// Builds a [`ResolvedConfig`] from the defaults and a user layer.
pub struct ConfigResolver {
    defaults: Value,
    user: Option<Value>,
    onload: Option<EntryFn>,
    main: Option<EntryFn>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    /// Resolver over the built-in defaults with no user layer.
    #[must_use]
    pub fn new() -> Self {
        let defaults = embedded_defaults().unwrap_or_else(|e| {
            warn!(error = %e, "Embedded defaults unreadable, using built-in values");
            serde_json::to_value(Config::default()).unwrap_or_else(|_| Value::Object(Map::new()))
        });
        Self {
            defaults,
            user: None,
            onload: None,
            main: None,
        }
    }

    /// Replace the defaults layer.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the user layer.
    #[must_use]
    pub fn with_user_config(mut self, user: Value) -> Self {
        self.user = Some(user);
        self
    }

    /// Override the post-bootstrap callback entirely.
    #[must_use]
    pub fn with_onload(mut self, onload: EntryFn) -> Self {
        self.onload = Some(onload);
        self
    }

    /// Define the user's main entry hook, run by the default `onload`.
    #[must_use]
    pub fn with_main(mut self, main: EntryFn) -> Self {
        self.main = Some(main);
        self
    }

    /// Resolve the effective configuration against `host`.
    pub fn resolve(self, host: &dyn HostDocument) -> ResolvedConfig {
        let user = self.user.unwrap_or_else(|| {
            warn!(
                "No pyweb config found, default config will be used. \
                 A config must be supplied before the bootstrap starts."
            );
            Value::Object(Map::new())
        });

        let merged = deep_merge(&self.defaults, &snake_case_keys(user));
        let mut config = match serde_json::from_value::<Config>(merged) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Invalid pyweb config, falling back to defaults");
                Config::default()
            },
        };

        if config.path.as_deref().is_none_or(str::is_empty) {
            config.path = host
                .current_script_src()
                .and_then(|src| derive_base_path(&src, &config.script_marker));
            match &config.path {
                Some(path) => debug!(path = %path, "derived base path from script locator"),
                None => warn!(
                    marker = %config.script_marker,
                    "Could not derive base path; module loading will fail unless `path` is set"
                ),
            }
        }

        if host.title().is_none_or(|title| title.is_empty()) {
            host.set_title(&config.default_title);
            warn!(
                title = %config.default_title,
                "Document title is not set, using default title"
            );
        }

        if let Err(e) = config.validate() {
            warn!(error = %e, "pyweb config failed validation");
        }

        let onload = match (self.onload, self.main) {
            (Some(onload), _) => onload,
            (None, Some(main)) => main,
            (None, None) => entry_fn(|| async {
                warn!("No main hook defined; supply one to run code after pyweb finishes loading");
            }),
        };

        ResolvedConfig { config, onload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyweb_test::MockHostDocument;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_derive_base_path() {
        assert_eq!(
            derive_base_path("http://host/assets/pyweb.js?x=1", "pyweb.js").as_deref(),
            Some("http://host/assets")
        );
        assert_eq!(
            derive_base_path("http://host/assets//pyweb.js", "pyweb.js").as_deref(),
            Some("http://host/assets")
        );
        assert_eq!(derive_base_path("http://host/app.js", "pyweb.js"), None);
    }

    #[test]
    fn test_missing_user_config_uses_defaults() {
        let host = MockHostDocument::new().with_title("App");
        let resolved = ConfigResolver::new().resolve(&host);

        let expected = Config::default();
        assert_eq!(resolved.config.runtime_version, expected.runtime_version);
        assert_eq!(resolved.config.system_packages, vec!["micropip"]);
        assert_eq!(resolved.config.path, None);
    }

    #[test]
    fn test_user_config_merges_over_defaults() {
        let host = MockHostDocument::new().with_title("App");
        let resolved = ConfigResolver::new()
            .with_user_config(json!({
                "runtimeVersion": "0.22.0",
                "modules": ["app.py"],
                "system_packages": ["numpy"],
                "path": "/static",
            }))
            .resolve(&host);

        assert_eq!(resolved.config.runtime_version, "0.22.0");
        assert_eq!(resolved.config.modules, vec!["app.py"]);
        assert_eq!(resolved.config.system_packages, vec!["micropip", "numpy"]);
        assert_eq!(resolved.config.path.as_deref(), Some("/static"));
    }

    #[test]
    fn test_path_derived_from_script() {
        let host = MockHostDocument::new()
            .with_title("App")
            .with_script_src("http://host/assets/pyweb.js?x=1");
        let resolved = ConfigResolver::new().resolve(&host);

        assert_eq!(resolved.config.path.as_deref(), Some("http://host/assets"));
    }

    #[test]
    fn test_explicit_path_wins_over_script() {
        let host = MockHostDocument::new()
            .with_title("App")
            .with_script_src("http://host/assets/pyweb.js");
        let resolved = ConfigResolver::new()
            .with_user_config(json!({"path": "http://cdn/pyweb-root"}))
            .resolve(&host);

        assert_eq!(resolved.config.path.as_deref(), Some("http://cdn/pyweb-root"));
    }

    #[test]
    fn test_default_title_assigned() {
        let host = MockHostDocument::new();
        let _ = ConfigResolver::new().resolve(&host);
        assert_eq!(host.title().as_deref(), Some("PyWeb"));

        let titled = MockHostDocument::new().with_title("Mine");
        let _ = ConfigResolver::new().resolve(&titled);
        assert_eq!(titled.title().as_deref(), Some("Mine"));
    }

    #[test]
    fn test_invalid_types_degrade_to_defaults() {
        let host = MockHostDocument::new().with_title("App");
        let resolved = ConfigResolver::new()
            .with_user_config(json!({"runtime_version": 42}))
            .resolve(&host);

        assert_eq!(resolved.config, Config::default());
    }

    #[tokio::test]
    async fn test_onload_defaults_to_main() {
        let host = MockHostDocument::new().with_title("App");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let resolved = ConfigResolver::new()
            .with_main(entry_fn(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }))
            .resolve(&host);

        (resolved.onload)().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_explicit_onload_replaces_main() {
        let host = MockHostDocument::new().with_title("App");
        let main_calls = Arc::new(AtomicUsize::new(0));
        let onload_calls = Arc::new(AtomicUsize::new(0));
        let main_counter = Arc::clone(&main_calls);
        let onload_counter = Arc::clone(&onload_calls);

        let resolved = ConfigResolver::new()
            .with_main(entry_fn(move || {
                let counter = Arc::clone(&main_counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }))
            .with_onload(entry_fn(move || {
                let counter = Arc::clone(&onload_counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }))
            .resolve(&host);

        (resolved.onload)().await;
        assert_eq!(main_calls.load(Ordering::SeqCst), 0);
        assert_eq!(onload_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_onload_completes() {
        let host = MockHostDocument::new().with_title("App");
        let resolved = ConfigResolver::new().resolve(&host);
        (resolved.onload)().await;
    }
}
