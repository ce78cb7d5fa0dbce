//! Test fixtures.

use crate::mocks::{MockFetcher, MockHostDocument};

/// Base resource path the fixtures serve from.
pub const TEST_BASE_PATH: &str = "http://host/assets";

/// Script locator that derives [`TEST_BASE_PATH`].
pub const TEST_SCRIPT_SRC: &str = "http://host/assets/pyweb.js";

/// A root module declaring two sibling modules.
pub const ROOT_MODULE_SOURCE: &str = "\"\"\"PyWeb package.\"\"\"\n\
__version__ = '0.1.0'\n\
\n\
from . import tags\n\
from . import router\n";

/// Full URL of a package module under [`TEST_BASE_PATH`].
#[must_use]
pub fn module_url(file: &str) -> String {
    format!("{TEST_BASE_PATH}/pyweb/{file}")
}

/// A fetcher serving the [`ROOT_MODULE_SOURCE`] package: `__init__.py`,
/// `tags.py` and `router.py`. No user entry point is served.
#[must_use]
pub fn package_fetcher() -> MockFetcher {
    MockFetcher::new()
        .with_file(module_url("__init__.py"), ROOT_MODULE_SOURCE)
        .with_file(module_url("tags.py"), "class Tag:\n    pass\n")
        .with_file(module_url("router.py"), "routes = {}\n")
}

/// A titled, loaded host whose script locator derives [`TEST_BASE_PATH`].
#[must_use]
pub fn test_host() -> MockHostDocument {
    MockHostDocument::new()
        .with_title("Test Page")
        .with_script_src(TEST_SCRIPT_SRC)
}
