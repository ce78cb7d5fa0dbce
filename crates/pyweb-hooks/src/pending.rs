//! The pending-value slot.
//!
//! Interpreter-side helpers park an in-flight runtime call here, and an
//! operator later calls [`PendingSlot::observe_latest`] to wait for it and
//! keep the resolved value around for inspection. Writes are last-write-wins
//! and nothing in the bootstrap reads the slot.

use std::error::Error;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, error};

use crate::dispatcher::HookDispatcher;
use crate::hook::FailureSite;

/// Error carried by a rejected pending call.
pub type PendingError = Box<dyn Error + Send + Sync>;

/// An in-flight runtime call.
pub type PendingFuture = BoxFuture<'static, Result<Value, PendingError>>;

enum Slot {
    Empty,
    Pending(PendingFuture),
    Ready(Value),
}

/// Single slot holding the latest pending or resolved value.
pub struct PendingSlot {
    slot: Mutex<Slot>,
}

impl fmt::Debug for PendingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.guard() {
            Slot::Empty => "empty",
            Slot::Pending(_) => "pending",
            Slot::Ready(_) => "ready",
        };
        f.debug_struct("PendingSlot").field("state", &state).finish()
    }
}

impl Default for PendingSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingSlot {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Park an in-flight call, replacing whatever was there.
    pub fn set_pending(&self, future: PendingFuture) {
        *self.guard() = Slot::Pending(future);
    }

    /// Store a plain value, replacing whatever was there.
    pub fn set_value(&self, value: Value) {
        *self.guard() = Slot::Ready(value);
    }

    /// Whether an unobserved call is parked.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(&*self.guard(), Slot::Pending(_))
    }

    /// The resolved value, if the slot holds one.
    #[must_use]
    pub fn latest(&self) -> Option<Value> {
        match &*self.guard() {
            Slot::Ready(value) => Some(value.clone()),
            Slot::Empty | Slot::Pending(_) => None,
        }
    }

    /// Await whatever the slot holds and store the outcome.
    ///
    /// The resolved value is stored only if nothing was written to the slot
    /// while awaiting; a newer entry is kept for the next observer.
    /// A rejection is logged and reported to `hooks` as
    /// [`FailureSite::PendingObserver`] and the caller never sees the error.
    pub async fn observe_latest(&self, hooks: &HookDispatcher) {
        let taken = std::mem::replace(&mut *self.guard(), Slot::Empty);
        let future = match taken {
            Slot::Pending(future) => future,
            Slot::Ready(value) => {
                self.set_value(value);
                return;
            },
            Slot::Empty => return,
        };

        match future.await {
            Ok(value) => {
                let mut slot = self.guard();
                if matches!(*slot, Slot::Empty) {
                    debug!("pending value resolved");
                    *slot = Slot::Ready(value);
                } else {
                    debug!("slot replaced while awaiting; keeping newer entry");
                }
            },
            Err(e) => {
                error!(error = %e, "pending value rejected");
                hooks.notify(FailureSite::PendingObserver, &*e);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::DebugHook;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl DebugHook for Counting {
        fn on_failure(&self, site: FailureSite, _error: &(dyn Error + 'static)) {
            assert_eq!(site, FailureSite::PendingObserver);
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_observe_resolves_pending() {
        let slot = PendingSlot::new();
        slot.set_pending(Box::pin(async { Ok::<_, PendingError>(json!(42)) }));
        assert!(slot.is_pending());
        assert_eq!(slot.latest(), None);

        slot.observe_latest(&HookDispatcher::noop()).await;

        assert!(!slot.is_pending());
        assert_eq!(slot.latest(), Some(json!(42)));
    }

    #[tokio::test]
    async fn test_observe_swallows_rejection() {
        let hook = Arc::new(Counting::default());
        let hooks = HookDispatcher::new(hook.clone());
        let slot = PendingSlot::new();
        slot.set_pending(Box::pin(async {
            Err::<Value, PendingError>(std::io::Error::other("ZeroDivisionError").into())
        }));

        slot.observe_latest(&hooks).await;

        assert_eq!(hook.0.load(Ordering::SeqCst), 1);
        assert_eq!(slot.latest(), None);
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn test_observe_keeps_ready_value() {
        let slot = PendingSlot::new();
        slot.set_value(json!("done"));

        slot.observe_latest(&HookDispatcher::noop()).await;

        assert_eq!(slot.latest(), Some(json!("done")));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let slot = PendingSlot::new();
        slot.set_pending(Box::pin(async { Ok::<_, PendingError>(json!(1)) }));
        slot.set_pending(Box::pin(async { Ok::<_, PendingError>(json!(2)) }));

        slot.observe_latest(&HookDispatcher::noop()).await;

        assert_eq!(slot.latest(), Some(json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_during_observe_is_kept() {
        let slot = Arc::new(PendingSlot::new());
        slot.set_pending(Box::pin(async {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            Ok::<_, PendingError>(json!(1))
        }));

        let observer = {
            let slot = Arc::clone(&slot);
            tokio::spawn(async move { slot.observe_latest(&HookDispatcher::noop()).await })
        };
        tokio::task::yield_now().await;
        slot.set_pending(Box::pin(async { Ok::<_, PendingError>(json!(2)) }));
        observer.await.unwrap();

        assert!(slot.is_pending());
        slot.observe_latest(&HookDispatcher::noop()).await;
        assert_eq!(slot.latest(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_observe_empty_is_noop() {
        let slot = PendingSlot::new();
        slot.observe_latest(&HookDispatcher::noop()).await;
        assert_eq!(slot.latest(), None);
    }
}
