//! Immutable financial records.

use crate::identifiers::{EventId, PaymentId, UserId};
use crate::money::{CommissionRate, Money, RevenueSplit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The financial record of one successful allocation.
///
/// Created exactly once per allocation, atomically with its registration
/// records, and never mutated. The commission split is computed at
/// allocation time and stored here; it is the canonical, auditable value
/// and is never re-derived later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// The buyer.
    pub user_id: UserId,
    /// The event paid for.
    pub event_id: EventId,
    /// Number of tickets covered by this payment.
    pub tickets: u32,
    /// `tickets × ticket_price` at allocation time.
    pub total_price: Money,
    /// Platform share of the total.
    pub admin_commission: Money,
    /// Organizer share, `total_price − admin_commission`.
    pub organizer_revenue: Money,
    /// When the payment was recorded.
    pub payment_date: DateTime<Utc>,
}

impl Payment {
    /// Build the payment record for an allocation of `tickets` tickets at
    /// `unit_price` each.
    ///
    /// Returns `None` if the total overflows, which a sane ticket price
    /// never does.
    pub fn for_allocation(
        user_id: UserId,
        event_id: EventId,
        tickets: u32,
        unit_price: Money,
        rate: CommissionRate,
        payment_date: DateTime<Utc>,
    ) -> Option<Payment> {
        let total_price = unit_price.checked_mul(tickets)?;
        let split = RevenueSplit::compute(total_price, rate);
        Some(Payment {
            id: PaymentId::new(),
            user_id,
            event_id,
            tickets,
            total_price,
            admin_commission: split.admin_commission,
            organizer_revenue: split.organizer_revenue,
            payment_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_allocation_splits_total() {
        let payment = Payment::for_allocation(
            UserId::new(),
            EventId::new(),
            3,
            Money::from_cents(10_000),
            CommissionRate::default(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(payment.tickets, 3);
        assert_eq!(payment.total_price, Money::from_cents(30_000));
        assert_eq!(payment.admin_commission, Money::from_cents(1_500));
        assert_eq!(payment.organizer_revenue, Money::from_cents(28_500));
    }

    #[test]
    fn test_for_allocation_overflow() {
        let payment = Payment::for_allocation(
            UserId::new(),
            EventId::new(),
            10,
            Money::from_cents(i64::MAX),
            CommissionRate::default(),
            Utc::now(),
        );
        assert!(payment.is_none());
    }

    #[test]
    fn test_free_event_payment() {
        let payment = Payment::for_allocation(
            UserId::new(),
            EventId::new(),
            2,
            Money::ZERO,
            CommissionRate::default(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(payment.total_price, Money::ZERO);
        assert_eq!(payment.admin_commission, Money::ZERO);
        assert_eq!(payment.organizer_revenue, Money::ZERO);
    }
}
