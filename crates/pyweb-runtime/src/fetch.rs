//! Concrete [`Fetcher`] implementations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pyweb_core::{FetchError, FetchResult, Fetcher};
use pyweb_vfs::path::resolve_path;
use tracing::debug;

/// Serves resources from a local directory.
///
/// Relative paths (including `./`-prefixed ones) resolve against the root
/// and may not climb above it; absolute paths and `file://` URLs are read
/// as given.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> FetchResult<PathBuf> {
        let local = path.strip_prefix("file://").unwrap_or(path);
        let candidate = Path::new(local);
        if candidate.is_absolute() {
            return Ok(candidate.to_path_buf());
        }
        resolve_path(&self.root, local).map_err(|_| FetchError::OutsideRoot(path.to_owned()))
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch_text(&self, path: &str) -> FetchResult<String> {
        let target = self.resolve(path)?;
        debug!(path = %path, target = %target.display(), "reading resource");
        tokio::fs::read_to_string(&target)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::NotFound(path.to_owned()),
                _ => FetchError::Io {
                    path: path.to_owned(),
                    source: e,
                },
            })
    }
}

#[cfg(feature = "http")]
pub use self::http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use pyweb_core::{FetchError, FetchResult, Fetcher, Version};
    use reqwest::{Client, StatusCode};
    use tracing::debug;
    use url::Url;

    /// Serves resources over HTTP(S).
    ///
    /// Absolute URLs are requested as given; anything else is joined onto
    /// the base URL.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
        base: Option<Url>,
    }

    impl HttpFetcher {
        /// Fetcher resolving relative paths against `base`.
        ///
        /// # Errors
        ///
        /// Returns [`FetchError::Transport`] if the HTTP client cannot be built.
        pub fn new(base: Option<Url>) -> FetchResult<Self> {
            let client = Client::builder()
                .user_agent(format!("pyweb/{}", Version::current()))
                .build()
                .map_err(|e| FetchError::Transport {
                    path: base.as_ref().map_or_else(String::new, Url::to_string),
                    message: format!("failed to create HTTP client: {e}"),
                })?;
            Ok(Self { client, base })
        }

        fn resolve(&self, path: &str) -> FetchResult<Url> {
            if let Ok(url) = Url::parse(path) {
                return Ok(url);
            }
            let base = self.base.as_ref().ok_or_else(|| FetchError::Transport {
                path: path.to_owned(),
                message: "relative path without a base URL".to_owned(),
            })?;
            base.join(path).map_err(|e| FetchError::Transport {
                path: path.to_owned(),
                message: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl Fetcher for HttpFetcher {
        async fn fetch_text(&self, path: &str) -> FetchResult<String> {
            let url = self.resolve(path)?;
            debug!(url = %url, "fetching resource");

            let transport = |e: reqwest::Error| FetchError::Transport {
                path: path.to_owned(),
                message: e.to_string(),
            };

            let response = self.client.get(url).send().await.map_err(transport)?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(path.to_owned()));
            }
            if !status.is_success() {
                return Err(FetchError::Status {
                    path: path.to_owned(),
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(transport)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("__init__.py"), "print('hi')\n").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        assert_eq!(fetcher.fetch_text("./__init__.py").await.unwrap(), "print('hi')\n");
        assert_eq!(fetcher.fetch_text("__init__.py").await.unwrap(), "print('hi')\n");
    }

    #[tokio::test]
    async fn test_absolute_and_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tags.py");
        std::fs::write(&file, "TAGS = []\n").unwrap();

        let fetcher = FsFetcher::new("/nonexistent-root");
        let absolute = file.to_string_lossy().into_owned();
        assert_eq!(fetcher.fetch_text(&absolute).await.unwrap(), "TAGS = []\n");
        assert_eq!(
            fetcher.fetch_text(&format!("file://{absolute}")).await.unwrap(),
            "TAGS = []\n"
        );
    }

    #[tokio::test]
    async fn test_parent_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(dir.path().join("secret.py"), "TOKEN = 1\n").unwrap();
        std::fs::write(root.join("main.py"), "x = 1\n").unwrap();

        let fetcher = FsFetcher::new(&root);
        assert!(matches!(
            fetcher.fetch_text("../secret.py").await,
            Err(FetchError::OutsideRoot(ref p)) if p == "../secret.py"
        ));
        assert!(matches!(
            fetcher.fetch_text("./sub/../../secret.py").await,
            Err(FetchError::OutsideRoot(_))
        ));
        assert_eq!(fetcher.fetch_text("./sub/../main.py").await.unwrap(), "x = 1\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsFetcher::new(dir.path());
        let err = fetcher.fetch_text("./missing.py").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
