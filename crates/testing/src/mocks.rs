//! In-memory store implementations.
//!
//! These implement the application's store ports over plain maps so tests
//! run without a database. The allocation store enforces the same capacity
//! ceiling as the PostgreSQL store and supports injected commit failures
//! for atomicity tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use ticketline_application::services::{AllocationStore, EventStore, StoreError};
use ticketline_domain::{Event, EventId, EventStatus, Payment, Registration};

/// In-memory event store.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an event.
    pub fn insert(&self, event: Event) {
        self.events.write().insert(event.id, event);
    }

    /// Current status of an event, if it exists.
    pub fn status_of(&self, event_id: EventId) -> Option<EventStatus> {
        self.events.read().get(&event_id).map(|e| e.status)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn get(&self, event_id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.events.read().get(&event_id).cloned())
    }

    async fn mark_sold_out(&self, event_id: EventId) -> Result<(), StoreError> {
        let mut events = self.events.write();
        let event = events
            .get_mut(&event_id)
            .ok_or(StoreError::EventNotFound(event_id))?;
        if event.status == EventStatus::Selling {
            event.status = EventStatus::SoldOut;
        }
        Ok(())
    }
}

/// In-memory registration log and payment ledger.
pub struct InMemoryAllocationStore {
    events: Arc<InMemoryEventStore>,
    registrations: RwLock<Vec<Registration>>,
    payments: RwLock<Vec<Payment>>,
    fail_next_commit: AtomicBool,
    commit_delay: RwLock<Option<Duration>>,
}

impl InMemoryAllocationStore {
    /// Create a store sharing the given event store for capacity checks.
    pub fn new(events: Arc<InMemoryEventStore>) -> Self {
        Self {
            events,
            registrations: RwLock::new(Vec::new()),
            payments: RwLock::new(Vec::new()),
            fail_next_commit: AtomicBool::new(false),
            commit_delay: RwLock::new(None),
        }
    }

    /// Make the next `commit` call fail with a backend error, writing
    /// nothing.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Delay every `commit` call, to hold the per-event lock in tests.
    pub fn set_commit_delay(&self, delay: Duration) {
        *self.commit_delay.write() = Some(delay);
    }

    /// Number of registrations recorded for an event.
    pub fn registration_count(&self, event_id: EventId) -> usize {
        self.registrations
            .read()
            .iter()
            .filter(|r| r.event_id == event_id)
            .count()
    }

    /// All payments recorded for an event.
    pub fn payments_for(&self, event_id: EventId) -> Vec<Payment> {
        self.payments
            .read()
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Total number of payment records.
    pub fn payment_count(&self) -> usize {
        self.payments.read().len()
    }
}

#[async_trait]
impl AllocationStore for InMemoryAllocationStore {
    async fn count_active(&self, event_id: EventId) -> Result<u32, StoreError> {
        Ok(self.registration_count(event_id) as u32)
    }

    async fn commit(
        &self,
        registrations: &[Registration],
        payment: &Payment,
    ) -> Result<(), StoreError> {
        let delay = *self.commit_delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected commit failure".to_string()));
        }

        let event_id = payment.event_id;
        let capacity = self
            .events
            .events
            .read()
            .get(&event_id)
            .map(|e| e.capacity)
            .ok_or(StoreError::EventNotFound(event_id))?;

        // The write guard spans the ceiling check and both inserts, so the
        // group lands atomically.
        let mut log = self.registrations.write();
        let active = log.iter().filter(|r| r.event_id == event_id).count() as u32;
        let remaining = capacity.saturating_sub(active);
        if registrations.len() as u32 > remaining {
            return Err(StoreError::CapacityExceeded { remaining });
        }

        log.extend_from_slice(registrations);
        self.payments.write().push(payment.clone());
        Ok(())
    }
}
