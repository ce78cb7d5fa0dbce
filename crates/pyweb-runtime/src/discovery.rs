//! Module discovery from the root module's relative imports.
//!
//! The root module of the package declares its siblings with lines of the
//! form `from . import <name>`. Discovery turns those lines into filenames
//! so the whole package can be written into the runtime filesystem before
//! any interpreter-side `import` runs.

use serde::Serialize;

/// Prefix that marks a sibling-module declaration.
pub const RELATIVE_IMPORT_PREFIX: &str = "from . import ";

/// Matches sibling-module declarations in module source text.
///
/// Grammar, applied to each line independently:
///
/// ```text
/// declaration := "from . import " name
/// name        := <rest of the line, verbatim>
/// ```
///
/// - The prefix must start at column 0. Indented lines do not match.
/// - The whole remainder is one name. `from . import a, b` yields the single
///   filename `a, b.py`, and `from . import a as b` yields `a as b.py`.
/// - Lines are split on `\n`; a trailing `\r` is dropped with the line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMatcher {
    extension: String,
}

impl Default for ImportMatcher {
    fn default() -> Self {
        Self::new(".py")
    }
}

impl ImportMatcher {
    /// Matcher appending `extension` to each declared name.
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Filename declared by `line`, if it is a declaration.
    #[must_use]
    pub fn match_line(&self, line: &str) -> Option<String> {
        line.strip_prefix(RELATIVE_IMPORT_PREFIX)
            .map(|name| format!("{name}{}", self.extension))
    }

    /// Every declared filename in `source`, in line order.
    #[must_use]
    pub fn discover(&self, source: &str) -> Vec<String> {
        source.lines().filter_map(|line| self.match_line(line)).collect()
    }
}

/// Discover `.py` siblings declared in `source`.
#[must_use]
pub fn discover(source: &str) -> Vec<String> {
    ImportMatcher::default().discover(source)
}

/// Ordered list of files to materialize in the runtime filesystem.
///
/// Root module first, then discovered siblings in source order, then the
/// user's extra modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleManifest {
    files: Vec<String>,
}

impl ModuleManifest {
    /// Assemble the manifest.
    #[must_use]
    pub fn build(root_module: &str, discovered: Vec<String>, user_modules: &[String]) -> Self {
        let mut files = Vec::with_capacity(
            discovered
                .len()
                .saturating_add(user_modules.len())
                .saturating_add(1),
        );
        files.push(root_module.to_owned());
        files.extend(discovered);
        files.extend(user_modules.iter().cloned());
        Self { files }
    }

    /// Filenames in load order.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the manifest is empty. Never true for a built manifest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
