//! Materializing the package into a virtual filesystem.

use futures::future::try_join_all;
use pyweb_config::Config;
use pyweb_core::Fetcher;
use pyweb_vfs::{Vfs, VfsError};
use tracing::{debug, info};

use crate::context::LoadingMarker;
use crate::discovery::{ImportMatcher, ModuleManifest};
use crate::error::{BootstrapError, BootstrapResult};

/// Discovers the package's modules and writes them into a [`Vfs`].
///
/// Works against any filesystem, so the same pipeline feeds the runtime
/// during bootstrap and a host directory when staging from the CLI.
pub struct ModuleLoader<'a> {
    config: &'a Config,
    fetcher: &'a dyn Fetcher,
    marker: &'a LoadingMarker,
    matcher: ImportMatcher,
}

impl<'a> ModuleLoader<'a> {
    /// Loader for the package described by `config`.
    #[must_use]
    pub fn new(config: &'a Config, fetcher: &'a dyn Fetcher, marker: &'a LoadingMarker) -> Self {
        Self {
            config,
            fetcher,
            marker,
            matcher: ImportMatcher::new(config.module_extension.as_str()),
        }
    }

    fn module_url(&self, file: &str) -> BootstrapResult<String> {
        self.config
            .module_url(file)
            .ok_or_else(|| BootstrapError::MissingBasePath {
                marker: self.config.script_marker.clone(),
            })
    }

    async fn fetch_module(&self, file: &str) -> BootstrapResult<String> {
        let url = self.module_url(file)?;
        self.marker
            .fetch(self.fetcher, &url)
            .await
            .map_err(|source| BootstrapError::ModuleFetch {
                file: file.to_owned(),
                source,
            })
    }

    /// Fetch the root module and build the manifest from its declarations.
    ///
    /// # Errors
    ///
    /// Fails if no base path is configured or the root module cannot be
    /// fetched.
    pub async fn discover(&self) -> BootstrapResult<ModuleManifest> {
        let root = &self.config.root_module;
        let source = self.fetch_module(root).await?;
        let discovered = self.matcher.discover(&source);
        debug!(root = %root, count = discovered.len(), "discovered sibling modules");

        Ok(ModuleManifest::build(root, discovered, &self.config.modules))
    }

    /// Write every manifest file into `vfs` under the package directory.
    ///
    /// The package directory is created first (an existing one is fine).
    /// Files are then fetched and written concurrently; the first failure
    /// aborts the batch.
    ///
    /// # Errors
    ///
    /// Fails on the first fetch or write failure.
    pub async fn materialize(&self, manifest: &ModuleManifest, vfs: &dyn Vfs) -> BootstrapResult<()> {
        let package = &self.config.package;
        match vfs.mkdir(package).await {
            Ok(()) | Err(VfsError::AlreadyExists(_)) => {},
            Err(source) => {
                return Err(BootstrapError::ModuleWrite {
                    file: package.clone(),
                    source,
                });
            },
        }

        try_join_all(manifest.files().iter().map(|file| self.load_module(file, vfs))).await?;

        info!(package = %package, count = manifest.len(), "package modules written");
        Ok(())
    }

    async fn load_module(&self, file: &str, vfs: &dyn Vfs) -> BootstrapResult<()> {
        let text = self.fetch_module(file).await?;
        let target = self.config.module_vfs_path(file);
        vfs.write_file(&target, &text)
            .await
            .map_err(|source| BootstrapError::ModuleWrite {
                file: file.to_owned(),
                source,
            })?;
        debug!(path = %target, bytes = text.len(), "module written");
        Ok(())
    }

    /// [`ModuleLoader::discover`] followed by [`ModuleLoader::materialize`].
    ///
    /// # Errors
    ///
    /// See both steps.
    pub async fn stage(&self, vfs: &dyn Vfs) -> BootstrapResult<ModuleManifest> {
        let manifest = self.discover().await?;
        self.materialize(&manifest, vfs).await?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyweb_core::FetchError;
    use pyweb_test::{MockFetcher, TEST_BASE_PATH, module_url, package_fetcher};
    use pyweb_vfs::MemoryVfs;

    fn config() -> Config {
        Config {
            path: Some(TEST_BASE_PATH.to_owned()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_stage_writes_package() {
        let config = config();
        let fetcher = package_fetcher();
        let marker = LoadingMarker::new();
        let vfs = MemoryVfs::new();

        let manifest = ModuleLoader::new(&config, &fetcher, &marker)
            .stage(&vfs)
            .await
            .unwrap();

        assert_eq!(manifest.files(), ["__init__.py", "tags.py", "router.py"]);
        assert_eq!(vfs.file_count(), 3);
        assert_eq!(vfs.read_file("pyweb/router.py").await.unwrap(), "routes = {}\n");
        assert!(marker.current().is_some());
    }

    #[tokio::test]
    async fn test_user_modules_loaded_after_discovered() {
        let config = Config {
            modules: vec!["app.py".to_owned()],
            ..config()
        };
        let fetcher = package_fetcher().with_file(module_url("app.py"), "APP = True\n");
        let marker = LoadingMarker::new();
        let vfs = MemoryVfs::new();

        let manifest = ModuleLoader::new(&config, &fetcher, &marker)
            .stage(&vfs)
            .await
            .unwrap();

        assert_eq!(manifest.files().last().map(String::as_str), Some("app.py"));
        assert_eq!(vfs.read_file("pyweb/app.py").await.unwrap(), "APP = True\n");
    }

    #[tokio::test]
    async fn test_missing_module_aborts_batch() {
        let config = Config {
            modules: vec!["ghost.py".to_owned()],
            ..config()
        };
        let fetcher = package_fetcher();
        let marker = LoadingMarker::new();
        let vfs = MemoryVfs::new();

        let err = ModuleLoader::new(&config, &fetcher, &marker)
            .stage(&vfs)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::ModuleFetch { ref file, source: FetchError::NotFound(_) } if file == "ghost.py"
        ));
    }

    #[tokio::test]
    async fn test_missing_base_path() {
        let config = Config::default();
        let fetcher = MockFetcher::new();
        let marker = LoadingMarker::new();

        let err = ModuleLoader::new(&config, &fetcher, &marker)
            .discover()
            .await
            .unwrap_err();

        assert!(matches!(err, BootstrapError::MissingBasePath { .. }));
        assert!(fetcher.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_existing_package_dir_tolerated() {
        let config = config();
        let fetcher = package_fetcher();
        let marker = LoadingMarker::new();
        let vfs = MemoryVfs::new();
        vfs.mkdir("pyweb").await.unwrap();

        ModuleLoader::new(&config, &fetcher, &marker)
            .stage(&vfs)
            .await
            .unwrap();

        assert_eq!(vfs.file_count(), 3);
    }

    #[tokio::test]
    async fn test_root_fetched_from_base_path() {
        let config = config();
        let fetcher = package_fetcher();
        let marker = LoadingMarker::new();

        let _ = ModuleLoader::new(&config, &fetcher, &marker)
            .discover()
            .await
            .unwrap();

        assert_eq!(fetcher.fetched(), vec![module_url("__init__.py")]);
    }
}
