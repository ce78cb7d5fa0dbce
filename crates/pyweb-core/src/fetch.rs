//! Text resource fetching.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Fetches text resources by path.
///
/// Paths are whatever the host understands: absolute URLs, paths relative to
/// the host document, or local filesystem paths.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the resource at `path` as text.
    async fn fetch_text(&self, path: &str) -> FetchResult<String>;
}
