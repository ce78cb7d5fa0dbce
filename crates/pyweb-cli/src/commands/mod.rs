//! Subcommand implementations.

pub(crate) mod config;
pub(crate) mod manifest;
pub(crate) mod stage;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use pyweb_config::{ConfigResolver, ResolvedConfig, load_user_config};
use pyweb_core::Fetcher;
use pyweb_runtime::{FsFetcher, HttpFetcher};
use serde_json::Value;
use url::Url;

use crate::host::CliHost;

fn is_remote(root: &str) -> bool {
    root.starts_with("http://") || root.starts_with("https://")
}

/// Resource root as a base path: remote roots verbatim, local roots made
/// absolute so module locations do not depend on the working directory.
fn base_path(root: &str) -> Result<String> {
    if is_remote(root) {
        return Ok(root.trim_end_matches('/').to_owned());
    }
    let absolute = std::fs::canonicalize(root)
        .with_context(|| format!("resource root '{root}' is not accessible"))?;
    Ok(absolute.to_string_lossy().trim_end_matches('/').to_owned())
}

/// Resolve the configuration the way the bootstrap would, with `root` as
/// the base path unless the user layer sets one.
pub(crate) fn resolve(
    config_file: Option<&Path>,
    root: Option<&str>,
    script_src: Option<String>,
) -> Result<ResolvedConfig> {
    let mut resolver = ConfigResolver::new();

    let mut user = match config_file {
        Some(path) => Some(load_user_config(path)?),
        None => None,
    };
    if let Some(root) = root {
        let base = base_path(root)?;
        let layer = user.get_or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Some(table) = layer.as_object_mut() {
            table.entry("path").or_insert(Value::String(base));
        }
    }
    if let Some(user) = user {
        resolver = resolver.with_user_config(user);
    }

    let resolved = resolver.resolve(&CliHost::new(script_src));
    resolved.config.validate()?;
    Ok(resolved)
}

/// Fetcher serving `root`: HTTP for URLs, the local filesystem otherwise.
pub(crate) fn fetcher_for(root: &str) -> Result<Arc<dyn Fetcher>> {
    if is_remote(root) {
        let base = Url::parse(&format!("{}/", root.trim_end_matches('/')))
            .with_context(|| format!("invalid resource root URL '{root}'"))?;
        return Ok(Arc::new(HttpFetcher::new(Some(base))?));
    }
    Ok(Arc::new(FsFetcher::new(root)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_root_becomes_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(None, Some(dir.path().to_str().unwrap()), None).unwrap();
        let path = resolved.config.path.unwrap();
        assert!(Path::new(&path).is_absolute());
    }

    #[test]
    fn test_remote_root_kept_verbatim() {
        let resolved = resolve(None, Some("https://example.com/site/"), None).unwrap();
        assert_eq!(resolved.config.path.as_deref(), Some("https://example.com/site"));
    }

    #[test]
    fn test_user_path_wins_over_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pyweb.toml");
        std::fs::write(&config, "path = \"https://cdn.example.com/app\"\n").unwrap();

        let resolved = resolve(Some(&config), Some(dir.path().to_str().unwrap()), None).unwrap();
        assert_eq!(resolved.config.path.as_deref(), Some("https://cdn.example.com/app"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pyweb.json");
        std::fs::write(&config, r#"{"modules": ["../escape.py"]}"#).unwrap();

        let err = resolve(Some(&config), None, None).unwrap_err();
        assert!(err.to_string().contains("escape"));
    }

    #[test]
    fn test_missing_local_root_rejected() {
        assert!(resolve(None, Some("/definitely/not/here"), None).is_err());
    }
}
