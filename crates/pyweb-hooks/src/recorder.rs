//! A hook that keeps the most recent failures for inspection.

use std::collections::VecDeque;
use std::error::Error;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::hook::{DebugHook, FailureSite};

/// One caught failure.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// Component that caught it.
    pub site: FailureSite,
    /// Top-level error message.
    pub message: String,
    /// Messages of the `source()` chain, outermost first.
    pub causes: Vec<String>,
    /// When it was recorded.
    pub at: DateTime<Utc>,
}

/// Ring buffer of the last `capacity` failures.
#[derive(Debug)]
pub struct FailureRecorder {
    capacity: usize,
    records: Mutex<VecDeque<FailureRecord>>,
}

impl FailureRecorder {
    /// Keep at most `capacity` records. A capacity of zero keeps one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, VecDeque<FailureRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the kept records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<FailureRecord> {
        self.guard().iter().cloned().collect()
    }

    /// The most recent record.
    #[must_use]
    pub fn last(&self) -> Option<FailureRecord> {
        self.guard().back().cloned()
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.guard().clear();
    }
}

impl DebugHook for FailureRecorder {
    fn on_failure(&self, site: FailureSite, error: &(dyn Error + 'static)) {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let record = FailureRecord {
            site,
            message: error.to_string(),
            causes,
            at: Utc::now(),
        };

        let mut records = self.guard();
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }
}
