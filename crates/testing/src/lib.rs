//! Test support for Ticketline.
//!
//! In-memory store implementations, fluent builders, and ready-made
//! fixtures so allocator behavior can be exercised without a database.

pub mod builders;
pub mod fixtures;
pub mod mocks;

pub use builders::EventBuilder;
pub use fixtures::{allocator_for, selling_event, stores_with};
pub use mocks::{InMemoryAllocationStore, InMemoryEventStore};
