//! Fluent builder pattern for constructing test data.

use chrono::Utc;
use ticketline_domain::{Event, EventId, EventStatus, Money, OrganizerId};

/// Builder for creating [`Event`] test instances.
#[derive(Clone)]
pub struct EventBuilder {
    id: EventId,
    organizer_id: OrganizerId,
    name: String,
    capacity: u32,
    ticket_price: Money,
    status: EventStatus,
}

impl EventBuilder {
    /// A selling event with capacity 100 at 25.00 per ticket.
    pub fn new() -> Self {
        Self {
            id: EventId::new(),
            organizer_id: OrganizerId::new(),
            name: "Test Event".to_string(),
            capacity: 100,
            ticket_price: Money::from_cents(2_500),
            status: EventStatus::Selling,
        }
    }

    /// Set the event id.
    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the ticket capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the ticket price in minor units.
    pub fn with_price_cents(mut self, cents: i64) -> Self {
        self.ticket_price = Money::from_cents(cents);
        self
    }

    /// Set the lifecycle status.
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Shortcut for a draft event.
    pub fn draft(self) -> Self {
        self.with_status(EventStatus::Draft)
    }

    /// Shortcut for a sold-out event.
    pub fn sold_out(self) -> Self {
        self.with_status(EventStatus::SoldOut)
    }

    /// Shortcut for a cancelled event.
    pub fn cancelled(self) -> Self {
        self.with_status(EventStatus::Cancelled)
    }

    /// Build the event.
    pub fn build(self) -> Event {
        Event {
            id: self.id,
            organizer_id: self.organizer_id,
            name: self.name,
            capacity: self.capacity,
            ticket_price: self.ticket_price,
            status: self.status,
            created_at: Utc::now(),
        }
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
