//! The document hosting the bootstrap script.

use async_trait::async_trait;

/// Host page as seen by the bootstrap.
#[async_trait]
pub trait HostDocument: Send + Sync {
    /// Resource locator of the currently executing bootstrap script, if known.
    fn current_script_src(&self) -> Option<String>;

    /// Document title. `None` or empty means unset.
    fn title(&self) -> Option<String>;

    /// Replace the document title.
    fn set_title(&self, title: &str);

    /// Resolves once the host signals it is fully loaded.
    async fn loaded(&self);
}
