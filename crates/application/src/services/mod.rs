//! Application Services
//!
//! The Ticket Allocator and the store ports it drives. The ports are the
//! seam between the allocation logic and whatever persistence backs it:
//! PostgreSQL in production (`ticketline-infrastructure`), in-memory stores
//! in tests (`ticketline-testing`).

mod allocator;

pub use allocator::{AllocationReceipt, AllocatorConfig, TicketAllocator};

use async_trait::async_trait;
use ticketline_domain::{Event, EventId, Payment, Registration};

/// Failure reported by a store implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The event row vanished between check and write.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// The atomic commit would push the registration count past capacity.
    ///
    /// Raised by the store itself so the ceiling holds even when several
    /// processes share the same backing store.
    #[error("capacity exceeded: {remaining} tickets remaining")]
    CapacityExceeded {
        /// Tickets still available at the time the commit was rejected.
        remaining: u32,
    },

    /// The backend failed; any partial writes were rolled back.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Read/transition access to events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch an event by id.
    async fn get(&self, event_id: EventId) -> Result<Option<Event>, StoreError>;

    /// Flip the event to sold-out, only if it is currently selling.
    ///
    /// Idempotent: marking an already sold-out event is a no-op.
    async fn mark_sold_out(&self, event_id: EventId) -> Result<(), StoreError>;
}

/// Append access to the registration log and payment ledger.
#[async_trait]
pub trait AllocationStore: Send + Sync {
    /// Number of active registrations for the event.
    async fn count_active(&self, event_id: EventId) -> Result<u32, StoreError>;

    /// Persist the registrations and the payment as one atomic group.
    ///
    /// Implementations must re-verify the capacity ceiling inside their own
    /// atomic boundary and reject with [`StoreError::CapacityExceeded`]
    /// rather than commit past it. On any failure nothing is persisted.
    async fn commit(
        &self,
        registrations: &[Registration],
        payment: &Payment,
    ) -> Result<(), StoreError>;
}
