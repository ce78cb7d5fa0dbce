//! PyWeb Core - Shared types and collaborator traits.
//!
//! The bootstrap orchestrator never talks to a concrete interpreter, page or
//! network stack. It drives the traits defined here:
//!
//! - [`Runtime`] / [`RuntimeLoader`]: the embedded interpreter and how it is
//!   instantiated.
//! - [`HostDocument`]: the page hosting the bootstrap script.
//! - [`Fetcher`]: text resources addressed by path or URL.
//!
//! Values crossing the interpreter boundary are represented as
//! [`serde_json::Value`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod fetch;
pub mod host;
pub mod runtime;
pub mod version;

pub use error::{FetchError, FetchResult, RuntimeError, RuntimeResult};
pub use fetch::Fetcher;
pub use host::HostDocument;
pub use runtime::{Runtime, RuntimeLoader};
pub use version::Version;

/// A value produced by or passed to the embedded runtime.
pub type Value = serde_json::Value;
