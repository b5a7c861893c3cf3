//! Ready-made fixtures for allocator tests.

use crate::builders::EventBuilder;
use crate::mocks::{InMemoryAllocationStore, InMemoryEventStore};
use fake::faker::company::en::CatchPhrase;
use fake::Fake;
use std::sync::Arc;
use ticketline_application::{AllocatorConfig, TicketAllocator};
use ticketline_domain::Event;

/// A selling event with the given capacity and ticket price.
pub fn selling_event(capacity: u32, price_cents: i64) -> Event {
    let name: String = CatchPhrase().fake();
    EventBuilder::new()
        .with_name(name)
        .with_capacity(capacity)
        .with_price_cents(price_cents)
        .build()
}

/// In-memory stores seeded with the given event.
pub fn stores_with(event: Event) -> (Arc<InMemoryEventStore>, Arc<InMemoryAllocationStore>) {
    let events = Arc::new(InMemoryEventStore::new());
    events.insert(event);
    let allocations = Arc::new(InMemoryAllocationStore::new(Arc::clone(&events)));
    (events, allocations)
}

/// An allocator with default config over stores seeded with the event.
///
/// Returns the stores as well so tests can inspect and inject.
pub fn allocator_for(
    event: Event,
) -> (
    TicketAllocator<InMemoryEventStore, InMemoryAllocationStore>,
    Arc<InMemoryEventStore>,
    Arc<InMemoryAllocationStore>,
) {
    let (events, allocations) = stores_with(event);
    let allocator = TicketAllocator::new(
        Arc::clone(&events),
        Arc::clone(&allocations),
        AllocatorConfig::default(),
    );
    (allocator, events, allocations)
}
