//! PostgreSQL store implementations.
//!
//! Concrete adapters for the application's [`EventStore`] and
//! [`AllocationStore`] ports.
//!
//! [`EventStore`]: ticketline_application::EventStore
//! [`AllocationStore`]: ticketline_application::AllocationStore

mod allocation_store;
mod event_store;

pub use allocation_store::PgAllocationStore;
pub use event_store::PgEventStore;

use ticketline_application::StoreError;

/// Map a backend failure into the port error.
pub(crate) fn backend(err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(err.to_string())
}
