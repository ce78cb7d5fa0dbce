//! PyWeb Test - Shared test utilities for the bootstrap crates.
//!
//! This crate provides mock implementations of every collaborator trait in
//! `pyweb-core` plus a few fixtures, for use as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! pyweb-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use pyweb_test::{MockRuntime, MockRuntimeLoader, package_fetcher};
//!
//! #[tokio::test]
//! async fn boots() {
//!     let runtime = MockRuntime::new();
//!     let loader = MockRuntimeLoader::new(runtime.clone());
//!     let fetcher = package_fetcher();
//!     // ... drive the bootstrap ...
//!     assert!(runtime.vfs().file_count() > 0);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

/// Install a test-friendly tracing subscriber. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
