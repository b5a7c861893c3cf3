//! Ticketline Domain Types
//!
//! This crate provides the core domain model for the Ticketline inventory
//! reservation service. It defines the entities the allocator reads and
//! writes, the money arithmetic behind the revenue split, and the error
//! taxonomy every allocation outcome maps into.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **identifiers**: Strongly-typed UUID-based identifiers for all entities
//! - **money**: Minor-unit currency values and the commission split
//! - **event**: Events, capacity, and the selling lifecycle state machine
//! - **registration**: Per-ticket grant records
//! - **payment**: Immutable financial records with the stored revenue split
//! - **errors**: Allocation error taxonomy with codes and HTTP statuses
//!
//! ## Usage
//!
//! ```rust
//! use ticketline_domain::{
//!     event::EventStatus,
//!     identifiers::EventId,
//!     money::{CommissionRate, Money, RevenueSplit},
//! };
//!
//! let id = EventId::new();
//! assert!(EventStatus::Selling.is_sellable());
//!
//! let split = RevenueSplit::compute(Money::from_cents(10_000), CommissionRate::default());
//! assert_eq!(split.admin_commission, Money::from_cents(500));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod event;
pub mod identifiers;
pub mod money;
pub mod payment;
pub mod registration;

// Re-export commonly used types
pub use errors::{AllocationError, AllocationResult};
pub use event::{Event, EventStatus};
pub use identifiers::*;
pub use money::{CommissionRate, Money, RevenueSplit};
pub use payment::Payment;
pub use registration::Registration;
