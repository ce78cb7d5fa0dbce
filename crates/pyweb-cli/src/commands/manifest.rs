//! `pyweb manifest`: list the modules a bootstrap would load.

use std::path::Path;

use anyhow::Result;
use pyweb_runtime::{LoadingMarker, ModuleLoader, ModuleManifest};

/// Discover the module manifest served from `root`.
pub(crate) async fn discover(root: &str, config_file: Option<&Path>) -> Result<ModuleManifest> {
    let resolved = super::resolve(config_file, Some(root), None)?;
    let fetcher = super::fetcher_for(root)?;
    let marker = LoadingMarker::new();

    let manifest = ModuleLoader::new(&resolved.config, fetcher.as_ref(), &marker)
        .discover()
        .await?;
    Ok(manifest)
}

/// Print the manifest as a JSON array.
pub(crate) async fn run(root: &str, config_file: Option<&Path>) -> Result<()> {
    let manifest = discover(root, config_file).await?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}
