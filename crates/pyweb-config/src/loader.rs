//! Reading a user configuration layer from disk.
//!
//! Hosts that are not a web page (the CLI, tests) supply the user layer as a
//! file instead of a page-level object. Both TOML and JSON are accepted,
//! chosen by extension; anything that is not `.json` is parsed as TOML.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Parse the embedded defaults layer.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the embedded file is malformed.
pub fn embedded_defaults() -> ConfigResult<Value> {
    let table: toml::Table =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

/// Load a user configuration layer from `path`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or does
/// not contain a table at the top level.
pub fn load_user_config(path: &Path) -> ConfigResult<Value> {
    let shown = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: shown.clone(),
        source: e,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value = if is_json {
        serde_json::from_str::<Value>(&content).map_err(|e| ConfigError::JsonError {
            path: shown.clone(),
            source: e,
        })?
    } else {
        let table: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: shown.clone(),
            source: e,
        })?;
        toml_to_json(toml::Value::Table(table))
    };

    if !value.is_object() {
        return Err(ConfigError::NotATable { path: shown });
    }

    debug!(path = %shown, "loaded user config");
    Ok(value)
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, val)| (key, toml_to_json(val)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    use crate::types::Config;

    #[test]
    fn test_embedded_defaults_match_config_default() {
        let defaults = embedded_defaults().unwrap();
        let config: Config = serde_json::from_value(defaults).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
runtime_version = "0.22.1"
modules = ["app.py"]
"#
        )
        .unwrap();

        let value = load_user_config(file.path()).unwrap();
        assert_eq!(
            value,
            json!({"runtime_version": "0.22.1", "modules": ["app.py"]})
        );
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"runtimeVersion": "0.23.0", "path": "/static"}}"#).unwrap();

        let value = load_user_config(file.path()).unwrap();
        assert_eq!(value["runtimeVersion"], "0.23.0");
        assert_eq!(value["path"], "/static");
    }

    #[test]
    fn test_json_must_be_object() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[1, 2]").unwrap();

        assert!(matches!(
            load_user_config(file.path()),
            Err(ConfigError::NotATable { .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "modules = [").unwrap();

        assert!(matches!(
            load_user_config(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_user_config(Path::new("/nonexistent/pyweb.toml")),
            Err(ConfigError::ReadError { .. })
        ));
    }
}
