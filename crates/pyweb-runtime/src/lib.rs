#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]

//! PyWeb Runtime - Bootstrap orchestration for the embedded interpreter.
//!
//! Given a resolved configuration, this crate loads the runtime engine,
//! writes the package's modules into the runtime's filesystem, runs the
//! version diagnostics and the optional user entry point, then hands the
//! host a [`RunBridge`] for executing further code.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pyweb_config::ConfigResolver;
//! use pyweb_runtime::{AppContext, Bootstrapper, FsFetcher};
//!
//! let resolved = ConfigResolver::new().resolve(host.as_ref());
//! let ctx = Arc::new(AppContext::new(resolved, Arc::new(FsFetcher::new("site"))));
//! let bridge = Bootstrapper::new(ctx, loader, host).run().await?;
//! bridge.run("print('hello')", &[])?;
//! ```

/// The startup sequence.
pub mod bootstrap;
/// The execution bridge.
pub mod bridge;
/// Shared application context.
pub mod context;
/// Sibling-module discovery.
pub mod discovery;
/// Error types.
pub mod error;
/// Local and HTTP resource fetchers.
pub mod fetch;
/// Module materialization.
pub mod loader;

pub use bootstrap::{Bootstrapper, bootstrap};
pub use bridge::RunBridge;
pub use context::{AppContext, LoadingMarker};
pub use discovery::{ImportMatcher, ModuleManifest, RELATIVE_IMPORT_PREFIX, discover};
pub use error::{BootstrapError, BootstrapResult, BridgeError, BridgeResult};
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use fetch::FsFetcher;
pub use loader::ModuleLoader;
