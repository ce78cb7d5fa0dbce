//! `pyweb stage`: write the package's modules into a host directory.

use std::path::Path;

use anyhow::{Context, Result};
use pyweb_runtime::{LoadingMarker, ModuleLoader, ModuleManifest};
use pyweb_vfs::HostVfs;
use tracing::info;

/// Fetch every manifest module from `root` and write it under `out`.
pub(crate) async fn stage(
    root: &str,
    out: &Path,
    config_file: Option<&Path>,
) -> Result<ModuleManifest> {
    let resolved = super::resolve(config_file, Some(root), None)?;
    let fetcher = super::fetcher_for(root)?;
    let marker = LoadingMarker::new();

    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("failed to create output directory {}", out.display()))?;
    let vfs = HostVfs::new(out);

    let manifest = ModuleLoader::new(&resolved.config, fetcher.as_ref(), &marker)
        .stage(&vfs)
        .await?;
    info!(out = %out.display(), count = manifest.len(), "package staged");
    Ok(manifest)
}

/// Stage and report what was written.
pub(crate) async fn run(root: &str, out: &Path, config_file: Option<&Path>) -> Result<()> {
    let manifest = stage(root, out, config_file).await?;
    println!("Staged {} module(s) into {}", manifest.len(), out.display());
    for file in manifest.files() {
        println!("  {file}");
    }
    Ok(())
}
