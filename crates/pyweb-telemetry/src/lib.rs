//! PyWeb Telemetry - Logging setup for PyWeb tools.
//!
//! Library crates only emit `tracing` events. Binaries call
//! [`setup_logging`] once at startup to decide where those events go and
//! how they look.
//!
//! # Example
//!
//! ```rust,no_run
//! use pyweb_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), pyweb_telemetry::TelemetryError> {
//! let config = LogConfig::for_verbosity(1)
//!     .with_format(LogFormat::Compact)
//!     .with_directives("pyweb_runtime=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("Loading pyweb");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, setup_logging};
