//! `pyweb config`: print the resolved configuration.

use std::path::Path;

use anyhow::Result;

/// Resolve and print the effective configuration as JSON.
pub(crate) fn run(config_file: Option<&Path>, script_src: Option<String>) -> Result<()> {
    let resolved = super::resolve(config_file, None, script_src)?;
    println!("{}", serde_json::to_string_pretty(&resolved.config)?);
    Ok(())
}
