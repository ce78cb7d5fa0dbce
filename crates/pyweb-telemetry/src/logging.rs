//! Subscriber setup for the `pyweb` binary.

use std::str::FromStr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::error::{TelemetryError, TelemetryResult};

/// How events are rendered on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, for reading one bootstrap run closely.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
    /// One line per event with span context.
    Full,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "full" => Ok(Self::Full),
            other => Err(TelemetryError::ConfigError(format!(
                "unknown log format '{other}' (expected pretty, compact, json or full)"
            ))),
        }
    }
}

/// Logging options chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Base level: `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Colorize output.
    pub ansi: bool,
    /// Extra directives layered over the level, e.g. `pyweb_runtime=trace`.
    pub directives: Vec<String>,
}

impl LogConfig {
    /// Options for a `-v` count: none is `warn`, then `info`, `debug`, `trace`.
    #[must_use]
    pub fn for_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            level: level.to_owned(),
            format: LogFormat::default(),
            ansi: true,
            directives: Vec::new(),
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable colors.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Add the comma-separated directives in `spec`, ignoring empty items.
    #[must_use]
    pub fn with_directives(mut self, spec: &str) -> Self {
        self.directives.extend(
            spec.split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
        );
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let invalid = |e: tracing_subscriber::filter::ParseError| {
            TelemetryError::ConfigError(e.to_string())
        };
        let mut filter = EnvFilter::try_new(&self.level).map_err(|e| {
            TelemetryError::ConfigError(format!("invalid level '{}': {e}", self.level))
        })?;
        for directive in &self.directives {
            filter = filter.add_directive(directive.parse().map_err(invalid)?);
        }
        Ok(filter)
    }

    fn build_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(self.ansi);
        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Full => layer.boxed(),
        }
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if the level or a directive is invalid, or if a global
/// subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;
    tracing_subscriber::registry()
        .with(config.build_layer())
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::for_verbosity(0).level, "warn");
        assert_eq!(LogConfig::for_verbosity(1).level, "info");
        assert_eq!(LogConfig::for_verbosity(2).level, "debug");
        assert_eq!(LogConfig::for_verbosity(9).level, "trace");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::for_verbosity(1)
            .with_format(LogFormat::Json)
            .with_ansi(false)
            .with_directives("pyweb_runtime=trace, ,pyweb_config=debug");

        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.ansi);
        assert_eq!(config.directives, ["pyweb_runtime=trace", "pyweb_config=debug"]);
        assert!(config.build_filter().is_ok());
    }

    #[test]
    fn test_invalid_directive_rejected() {
        let config = LogConfig::for_verbosity(0).with_directives("[invalid=syntax");
        assert!(matches!(
            config.build_filter(),
            Err(TelemetryError::ConfigError(_))
        ));
    }
}
