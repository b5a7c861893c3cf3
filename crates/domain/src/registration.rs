//! Per-ticket grant records.

use crate::identifiers::{EventId, RegistrationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single granted ticket.
///
/// One registration represents exactly one ticket: a purchase of N tickets
/// produces N records, keeping per-ticket cancellation and per-ticket audit
/// possible. Registrations are written once by the allocator and never
/// mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Unique identifier.
    pub id: RegistrationId,
    /// The event the ticket is for.
    pub event_id: EventId,
    /// The buyer holding the ticket.
    pub user_id: UserId,
    /// When the ticket was granted.
    pub registration_date: DateTime<Utc>,
}

impl Registration {
    /// Build the batch of grant records for a purchase of `tickets` tickets.
    pub fn batch(
        event_id: EventId,
        user_id: UserId,
        tickets: u32,
        registration_date: DateTime<Utc>,
    ) -> Vec<Registration> {
        (0..tickets)
            .map(|_| Registration {
                id: RegistrationId::new(),
                event_id,
                user_id,
                registration_date,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_one_record_per_ticket() {
        let event_id = EventId::new();
        let user_id = UserId::new();
        let now = Utc::now();

        let batch = Registration::batch(event_id, user_id, 4, now);
        assert_eq!(batch.len(), 4);
        for grant in &batch {
            assert_eq!(grant.event_id, event_id);
            assert_eq!(grant.user_id, user_id);
            assert_eq!(grant.registration_date, now);
        }

        // Each ticket gets its own identity
        let ids: std::collections::HashSet<_> = batch.iter().map(|g| g.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_batch_empty() {
        assert!(Registration::batch(EventId::new(), UserId::new(), 0, Utc::now()).is_empty());
    }
}
