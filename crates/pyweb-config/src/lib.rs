#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration resolution for the PyWeb bootstrap.
//!
//! A user layer (normally supplied by the host page before the bootstrap
//! script runs) is deep-merged over built-in defaults exactly once, before
//! anything is loaded. The result is a read-only [`ResolvedConfig`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use pyweb_config::ConfigResolver;
//!
//! let resolved = ConfigResolver::new()
//!     .with_user_config(serde_json::json!({"modules": ["app.py"]}))
//!     .resolve(&host);
//! println!("engine index: {}", resolved.config.index_url());
//! ```
//!
//! # Merge rules
//!
//! 1. **Objects** merge recursively key by key
//! 2. **Arrays** concatenate, defaults first, duplicates kept
//! 3. **Everything else** from the user layer replaces the default

/// Configuration error types.
pub mod error;
/// User configuration file loading.
pub mod loader;
/// Deep merging of configuration trees.
pub mod merge;
/// Effective configuration resolution.
pub mod resolver;
/// Configuration struct definitions.
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::{embedded_defaults, load_user_config};
pub use resolver::{ConfigResolver, EntryFn, ResolvedConfig, derive_base_path, entry_fn};
pub use types::Config;
