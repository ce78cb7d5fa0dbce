//! PyWeb CLI - Inspect and stage PyWeb packages outside the browser.
//!
//! Runs the configuration and module pipelines of the bootstrap against a
//! local directory or a remote URL, without an embedded runtime.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pyweb_telemetry::{LogConfig, LogFormat, setup_logging};

mod commands;
mod host;

/// PyWeb - bootstrap tooling for the embedded Python runtime
#[derive(Parser)]
#[command(name = "pyweb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log format: compact (default), pretty, json or full
    #[arg(long, global = true, default_value = "compact", env = "PYWEB_LOG_FORMAT")]
    log_format: LogFormat,

    /// Extra filter directives, e.g. `pyweb_runtime=trace`
    #[arg(long, global = true, env = "PYWEB_LOG")]
    log_filter: Option<String>,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration as JSON
    Config {
        /// User configuration file (TOML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Bootstrap script locator to derive the base path from
        #[arg(long)]
        script_src: Option<String>,
    },

    /// Print the module manifest discovered under a resource root
    Manifest {
        /// Resource root: a directory or an http(s) URL
        #[arg(short, long)]
        root: String,

        /// User configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Fetch every module in the manifest and write it to a directory
    Stage {
        /// Resource root: a directory or an http(s) URL
        #[arg(short, long)]
        root: String,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// User configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::for_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(!cli.no_color);
    if let Some(filter) = &cli.log_filter {
        log_config = log_config.with_directives(filter);
    }
    if let Err(e) = setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Config { config, script_src } => {
            commands::config::run(config.as_deref(), script_src)?;
        },
        Commands::Manifest { root, config } => {
            commands::manifest::run(&root, config.as_deref()).await?;
        },
        Commands::Stage { root, out, config } => {
            commands::stage::run(&root, &out, config.as_deref()).await?;
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stage() {
        let cli = Cli::parse_from(["pyweb", "-vv", "stage", "--root", "site", "--out", "dist"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert!(matches!(cli.command, Commands::Stage { ref root, .. } if root == "site"));
    }

    #[test]
    fn test_parse_log_format() {
        let cli = Cli::parse_from(["pyweb", "--log-format", "json", "config"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_parse_log_filter_and_no_color() {
        let cli = Cli::parse_from([
            "pyweb",
            "config",
            "--no-color",
            "--log-filter",
            "pyweb_runtime=trace",
        ]);
        assert!(cli.no_color);
        assert_eq!(cli.log_filter.as_deref(), Some("pyweb_runtime=trace"));
    }
}
