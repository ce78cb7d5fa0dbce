//! PyWeb Hooks - Advisory failure hooks and debugging aids.
//!
//! Every component that catches a failure reports it to a [`DebugHook`]
//! through a [`HookDispatcher`]. Hooks are attach points for interactive
//! inspection only: they cannot return anything, and a panicking hook is
//! contained by the dispatcher, so control flow never depends on them.
//!
//! This crate also holds the [`PendingSlot`], a single last-write-wins slot
//! an operator can use to await and inspect whatever value is currently in
//! flight.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pyweb_hooks::{FailureRecorder, HookDispatcher};
//!
//! let recorder = Arc::new(FailureRecorder::new(10));
//! let hooks = HookDispatcher::new(recorder.clone());
//! // ... bootstrap with `hooks` ...
//! for record in recorder.records() {
//!     eprintln!("{}: {}", record.site, record.message);
//! }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod dispatcher;
pub mod hook;
pub mod pending;
pub mod recorder;

pub use dispatcher::HookDispatcher;
pub use hook::{DebugHook, FailureSite, NoopDebugHook};
pub use pending::{PendingError, PendingFuture, PendingSlot};
pub use recorder::{FailureRecord, FailureRecorder};
