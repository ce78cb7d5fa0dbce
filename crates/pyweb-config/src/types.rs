//! Typed configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Bootstrap configuration.
///
/// Every field has a default, so a partial user layer deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine build tag the runtime is fetched for.
    pub runtime_version: String,
    /// CDN root the versioned engine index lives under.
    pub runtime_base_url: String,
    /// Extra module filenames to preload after the discovered ones.
    pub modules: Vec<String>,
    /// Base resource path. Derived from the script locator when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Package subdirectory holding the modules, also the interpreter package name.
    pub package: String,
    /// Root module whose relative imports are discovered.
    pub root_module: String,
    /// Extension appended to discovered module names.
    pub module_extension: String,
    /// Optional user entry file next to the host document.
    pub entry_point: String,
    /// Runtime packages loaded before anything else runs.
    pub system_packages: Vec<String>,
    /// Script filename used to derive [`Config::path`].
    pub script_marker: String,
    /// Title assigned when the host document has none.
    pub default_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime_version: "0.21.0a2".to_owned(),
            runtime_base_url: "https://cdn.jsdelivr.net/pyodide".to_owned(),
            modules: Vec::new(),
            path: None,
            package: "pyweb".to_owned(),
            root_module: "__init__.py".to_owned(),
            module_extension: ".py".to_owned(),
            entry_point: "./__init__.py".to_owned(),
            system_packages: vec!["micropip".to_owned()],
            script_marker: "pyweb.js".to_owned(),
            default_title: "PyWeb".to_owned(),
        }
    }
}

impl Config {
    /// Versioned index URL of the runtime engine.
    ///
    /// `https://cdn.jsdelivr.net/pyodide` + `0.21.0a2` gives
    /// `https://cdn.jsdelivr.net/pyodide/v0.21.0a2/full/`.
    #[must_use]
    pub fn index_url(&self) -> String {
        format!(
            "{}/v{}/full/",
            self.runtime_base_url.trim_end_matches('/'),
            self.runtime_version
        )
    }

    /// Location of a package module, relative to the base path.
    ///
    /// Returns `None` when no base path is known.
    #[must_use]
    pub fn module_url(&self, file: &str) -> Option<String> {
        self.path
            .as_deref()
            .map(|base| format!("{base}/{}/{file}", self.package))
    }

    /// Where a package module lives inside the runtime filesystem.
    #[must_use]
    pub fn module_vfs_path(&self, file: &str) -> String {
        format!("{}/{file}", self.package)
    }

    /// Check structural constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("runtime_version", &self.runtime_version),
            ("package", &self.package),
            ("root_module", &self.root_module),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: field.to_owned(),
                    message: "must not be empty".to_owned(),
                });
            }
        }

        for module in self.modules.iter().chain(std::iter::once(&self.root_module)) {
            if module.starts_with('/') || module.split('/').any(|part| part == "..") {
                return Err(ConfigError::Validation {
                    field: "modules".to_owned(),
                    message: format!("'{module}' escapes the package directory"),
                });
            }
        }

        Ok(())
    }
}
