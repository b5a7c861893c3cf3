//! Per-event mutual exclusion for the allocation write path.
//!
//! Serialization is per event, never global: allocations for different
//! events proceed fully concurrently, and only contention on the same event
//! queues. Waiting is bounded; a caller that cannot take the lock within
//! the configured wait fails with [`AllocationError::Contention`] instead
//! of hanging.

use parking_lot::Mutex as TableMutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use ticketline_domain::{AllocationError, EventId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

/// A bounded table of per-event async locks.
///
/// Locks for events with no in-flight allocation are evicted once the table
/// grows past its capacity, so the table cannot grow without bound across
/// the lifetime of the process. A lock that is currently held (or queued
/// on) is never evicted.
pub struct EventLocks {
    capacity: usize,
    table: TableMutex<HashMap<EventId, Arc<Mutex<()>>>>,
}

impl EventLocks {
    /// Create a table that retains at most `capacity` idle locks.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            table: TableMutex::new(HashMap::new()),
        }
    }

    /// Take the lock for `event_id`, waiting at most `wait`.
    pub async fn acquire(
        &self,
        event_id: EventId,
        wait: Duration,
    ) -> Result<OwnedMutexGuard<()>, AllocationError> {
        let lock = self.handle(event_id);
        timeout(wait, lock.lock_owned())
            .await
            .map_err(|_| AllocationError::Contention)
    }

    fn handle(&self, event_id: EventId) -> Arc<Mutex<()>> {
        let mut table = self.table.lock();
        if table.len() >= self.capacity && !table.contains_key(&event_id) {
            // A guard holds a clone of the Arc, so strong_count == 1 means idle
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        Arc::clone(
            table
                .entry(event_id)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Number of locks currently retained.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Whether the table holds no locks.
    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_acquire_and_release() {
        let locks = EventLocks::new(16);
        let event_id = EventId::new();

        let guard = locks.acquire(event_id, WAIT).await.unwrap();
        drop(guard);

        // Reacquirable after release
        let _guard = locks.acquire(event_id, WAIT).await.unwrap();
    }

    #[tokio::test]
    async fn test_contention_times_out() {
        let locks = EventLocks::new(16);
        let event_id = EventId::new();

        let _held = locks.acquire(event_id, WAIT).await.unwrap();
        let result = locks.acquire(event_id, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(AllocationError::Contention)));
    }

    #[tokio::test]
    async fn test_different_events_do_not_contend() {
        let locks = EventLocks::new(16);

        let _a = locks.acquire(EventId::new(), WAIT).await.unwrap();
        let _b = locks.acquire(EventId::new(), WAIT).await.unwrap();
    }

    #[tokio::test]
    async fn test_idle_locks_are_evicted() {
        let locks = EventLocks::new(2);

        for _ in 0..10 {
            let guard = locks.acquire(EventId::new(), WAIT).await.unwrap();
            drop(guard);
        }

        // Every lock above was idle when the next insert hit the bound
        assert!(locks.len() <= 3);
    }

    #[tokio::test]
    async fn test_held_locks_survive_eviction() {
        let locks = EventLocks::new(1);
        let held_id = EventId::new();

        let _held = locks.acquire(held_id, WAIT).await.unwrap();
        for _ in 0..5 {
            let guard = locks.acquire(EventId::new(), WAIT).await.unwrap();
            drop(guard);
        }

        // The held lock was never evicted: a second taker still queues on it
        let result = locks.acquire(held_id, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(AllocationError::Contention)));
    }
}
