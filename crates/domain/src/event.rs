//! Event entity and selling lifecycle.

use crate::identifiers::{EventId, OrganizerId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event lifecycle status.
///
/// The allocator only ever moves an event from `Selling` to `SoldOut`; every
/// other transition belongs to the organizer flow or the time-based sweep.
/// `SoldOut`, `Over`, and `Cancelled` are never left through the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Created but not yet open for sale.
    Draft,
    /// Open for ticket allocation.
    Selling,
    /// Active registrations have reached capacity.
    SoldOut,
    /// The event date has passed.
    Over,
    /// Cancelled by the organizer.
    Cancelled,
}

impl EventStatus {
    /// Whether tickets may currently be allocated.
    pub fn is_sellable(&self) -> bool {
        matches!(self, Self::Selling)
    }

    /// Whether the lifecycle permits moving to `target`.
    pub fn can_transition_to(&self, target: EventStatus) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Selling)
                | (Self::Draft, Self::Cancelled)
                | (Self::Selling, Self::SoldOut)
                | (Self::Selling, Self::Over)
                | (Self::Selling, Self::Cancelled)
                | (Self::SoldOut, Self::Over)
        )
    }

    /// Stable string form, matching the persisted representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Selling => "selling",
            Self::SoldOut => "sold_out",
            Self::Over => "over",
            Self::Cancelled => "cancelled",
        }
    }
}

/// An event with a fixed ticket capacity.
///
/// `capacity` is immutable after creation; the number of active
/// registrations referencing the event must never exceed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// The organizer who created the event.
    pub organizer_id: OrganizerId,
    /// Display name.
    pub name: String,
    /// Maximum number of tickets, positive.
    pub capacity: u32,
    /// Price of a single ticket.
    pub ticket_price: Money,
    /// Current lifecycle status.
    pub status: EventStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Tickets still available given the current active registration count.
    pub fn tickets_left(&self, active_registrations: u32) -> u32 {
        self.capacity.saturating_sub(active_registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_selling_is_sellable() {
        assert!(EventStatus::Selling.is_sellable());
        assert!(!EventStatus::Draft.is_sellable());
        assert!(!EventStatus::SoldOut.is_sellable());
        assert!(!EventStatus::Over.is_sellable());
        assert!(!EventStatus::Cancelled.is_sellable());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&EventStatus::SoldOut).unwrap();
        assert_eq!(json, "\"sold_out\"");
        let back: EventStatus = serde_json::from_str("\"selling\"").unwrap();
        assert_eq!(back, EventStatus::Selling);
    }

    #[test]
    fn test_tickets_left_saturates() {
        let event = Event {
            id: EventId::new(),
            organizer_id: OrganizerId::new(),
            name: "Test".to_string(),
            capacity: 5,
            ticket_price: Money::from_cents(1_000),
            status: EventStatus::Selling,
            created_at: Utc::now(),
        };
        assert_eq!(event.tickets_left(3), 2);
        assert_eq!(event.tickets_left(5), 0);
        // Counts above capacity never happen, but the arithmetic must not wrap
        assert_eq!(event.tickets_left(7), 0);
    }
}
