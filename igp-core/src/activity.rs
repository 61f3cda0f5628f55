//! Bounded log of recent inbound and outbound integration traffic.

use igp_sdk::objects::{ActivityDirection, ActivityRecord};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 100;

/// Ring buffer of [`ActivityRecord`]s. Oldest entries are evicted first.
///
/// Cloning shares the buffer.
#[derive(Clone)]
pub struct ActivityLog {
    inner: Arc<ActivityLogInner>,
}

struct ActivityLogInner {
    capacity: usize,
    next_id: AtomicU64,
    records: Mutex<VecDeque<ActivityRecord>>,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(ActivityLogInner {
                capacity,
                next_id: AtomicU64::new(1),
                records: Mutex::new(VecDeque::with_capacity(capacity)),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Append a record stamped with the current time.
    pub fn record(
        &self,
        direction: ActivityDirection,
        method: &str,
        endpoint: &str,
        status: u16,
        request: Value,
        response: Value,
    ) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let record = ActivityRecord {
            id,
            direction,
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            status,
            request,
            response,
            timestamp,
        };

        // A poisoned lock only means another writer panicked mid-push.
        let mut records = self
            .inner
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if records.len() == self.inner.capacity {
            records.pop_front();
        }
        records.push_back(record);
        id
    }

    pub fn inbound(&self, method: &str, endpoint: &str, status: u16, request: Value, response: Value) {
        self.record(
            ActivityDirection::Inbound,
            method,
            endpoint,
            status,
            request,
            response,
        );
    }

    /// Records, newest first.
    pub fn snapshot(&self) -> Vec<ActivityRecord> {
        let records = self
            .inner
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        records.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
