//! Money arithmetic and the platform revenue split.
//!
//! All amounts are held in minor currency units (cents) as integers so the
//! commission split can be computed exactly. The organizer's share is always
//! derived by subtraction from the rounded commission, which guarantees
//! `admin_commission + organizer_revenue == total_price` with no remainder
//! lost to independent rounding.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A monetary amount in minor currency units (cents).
///
/// Ticket prices are non-negative; arithmetic that could overflow is exposed
/// through checked operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in minor units.
    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiply a unit price by a ticket count, `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Add two amounts, `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtract an amount, `None` on overflow.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Whether the amount is negative.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

/// Error returned for a commission rate above 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("commission rate out of range: {0} basis points (max 10000)")]
pub struct InvalidCommissionRate(pub u16);

/// Platform commission rate in basis points (1/100th of a percent).
///
/// The default is 500 basis points, i.e. the platform retains 5% of ticket
/// revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionRate(u16);

impl CommissionRate {
    /// Maximum representable rate, 100%.
    pub const MAX_BASIS_POINTS: u16 = 10_000;

    /// Create a rate from basis points, rejecting values above 100%.
    pub fn new(basis_points: u16) -> Result<Self, InvalidCommissionRate> {
        if basis_points > Self::MAX_BASIS_POINTS {
            return Err(InvalidCommissionRate(basis_points));
        }
        Ok(Self(basis_points))
    }

    /// The rate in basis points.
    #[inline]
    pub const fn basis_points(self) -> u16 {
        self.0
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        Self(500)
    }
}

/// The division of a payment total between platform and organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueSplit {
    /// Platform share, rounded half-up from `total × rate`.
    pub admin_commission: Money,
    /// Organizer share, `total − admin_commission`.
    pub organizer_revenue: Money,
}

impl RevenueSplit {
    /// Split a payment total at the given commission rate.
    ///
    /// The commission is rounded half-up in integer arithmetic; the organizer
    /// revenue is derived by subtraction, never rounded on its own, so the
    /// two parts always sum to `total` exactly.
    pub fn compute(total: Money, rate: CommissionRate) -> Self {
        let bps = i128::from(rate.basis_points());
        let commission = (i128::from(total.cents()) * bps + 5_000) / 10_000;
        let admin_commission = Money::from_cents(commission as i64);
        Self {
            admin_commission,
            organizer_revenue: Money::from_cents(total.cents() - admin_commission.cents()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(12_345).to_string(), "123.45");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn test_checked_mul() {
        let price = Money::from_cents(10_000);
        assert_eq!(price.checked_mul(3), Some(Money::from_cents(30_000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn test_commission_rate_bounds() {
        assert!(CommissionRate::new(0).is_ok());
        assert!(CommissionRate::new(10_000).is_ok());
        assert_eq!(
            CommissionRate::new(10_001),
            Err(InvalidCommissionRate(10_001))
        );
        assert_eq!(CommissionRate::default().basis_points(), 500);
    }

    #[test]
    fn test_split_default_rate() {
        // 300.00 at 5% -> 15.00 / 285.00
        let split = RevenueSplit::compute(Money::from_cents(30_000), CommissionRate::default());
        assert_eq!(split.admin_commission, Money::from_cents(1_500));
        assert_eq!(split.organizer_revenue, Money::from_cents(28_500));
    }

    #[test]
    fn test_split_rounds_half_up() {
        // 0.30 at 5% is 1.5 cents, rounds up to 2
        let split = RevenueSplit::compute(Money::from_cents(30), CommissionRate::default());
        assert_eq!(split.admin_commission, Money::from_cents(2));
        assert_eq!(split.organizer_revenue, Money::from_cents(28));

        // 0.29 at 5% is 1.45 cents, rounds down to 1
        let split = RevenueSplit::compute(Money::from_cents(29), CommissionRate::default());
        assert_eq!(split.admin_commission, Money::from_cents(1));
        assert_eq!(split.organizer_revenue, Money::from_cents(28));
    }

    #[test]
    fn test_split_is_exact() {
        for cents in [0, 1, 99, 100, 12_345, 1_000_000_000] {
            let total = Money::from_cents(cents);
            let split = RevenueSplit::compute(total, CommissionRate::default());
            assert_eq!(
                split
                    .admin_commission
                    .checked_add(split.organizer_revenue)
                    .unwrap(),
                total
            );
        }
    }
}
