//! A [`HostDocument`] for running outside a page.

use std::sync::Mutex;

use async_trait::async_trait;
use pyweb_core::HostDocument;

/// Stand-in host: fully loaded from the start, with an optional script
/// locator and an initially empty title.
#[derive(Debug, Default)]
pub(crate) struct CliHost {
    script_src: Option<String>,
    title: Mutex<Option<String>>,
}

impl CliHost {
    pub(crate) fn new(script_src: Option<String>) -> Self {
        Self {
            script_src,
            title: Mutex::new(None),
        }
    }
}

#[async_trait]
impl HostDocument for CliHost {
    fn current_script_src(&self) -> Option<String> {
        self.script_src.clone()
    }

    fn title(&self) -> Option<String> {
        self.title
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn set_title(&self, title: &str) {
        *self
            .title
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(title.to_owned());
    }

    async fn loaded(&self) {}
}
