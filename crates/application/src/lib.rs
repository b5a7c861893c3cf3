//! Application layer for Ticketline
//!
//! This crate hosts the Ticket Allocator: the one subsystem of the
//! ticketing backend with genuine concurrency hazards. It decides, under
//! per-event serialization, whether a purchase fits the remaining capacity,
//! commits the per-ticket registrations and payment as one atomic group,
//! and flips the event to sold-out exactly once.
//!
//! ## Modules
//!
//! - `services` - The allocator and the store ports it drives
//! - `locking` - Bounded per-event lock table with a wait bound
//! - `validation` - Request validation framework
//! - `dto` - Wire-facing request/response shapes for the web layer

pub mod dto;
pub mod locking;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use dto::{AllocationRequest, AllocationResponse};
pub use locking::EventLocks;
pub use services::{
    AllocationReceipt, AllocationStore, AllocatorConfig, EventStore, StoreError, TicketAllocator,
};
pub use validation::{Validatable, ValidationResult};
