//! Data transfer objects for the web layer.
//!
//! The HTTP layer owns routing, authentication, and JSON framing; these
//! types define the one request/response pair it exchanges with the
//! allocator, serialized in camelCase.

use crate::services::AllocationReceipt;
use crate::validation::{Validatable, ValidationResult};
use serde::{Deserialize, Serialize};
use ticketline_domain::{AllocationError, EventId, Money, PaymentId};

/// A buyer's allocation request.
///
/// The authenticated buyer identity arrives separately from the (excluded)
/// auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    /// The event to buy tickets for.
    pub event_id: EventId,
    /// Number of tickets requested.
    pub requested_tickets: u32,
}

impl AllocationRequest {
    /// Smallest permitted purchase.
    pub const MIN_TICKETS_PER_ORDER: u32 = 1;
    /// Largest permitted single-transaction purchase.
    pub const MAX_TICKETS_PER_ORDER: u32 = 10;
}

impl Validatable for AllocationRequest {
    fn validate_all(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        if self.requested_tickets < Self::MIN_TICKETS_PER_ORDER {
            result.add_field_error(
                "requestedTickets",
                format!("must be at least {}", Self::MIN_TICKETS_PER_ORDER),
            );
        }
        if self.requested_tickets > Self::MAX_TICKETS_PER_ORDER {
            result.add_field_error(
                "requestedTickets",
                format!("must be {} or fewer", Self::MAX_TICKETS_PER_ORDER),
            );
        }

        result
    }
}

/// The wire-facing outcome of an allocation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResponse {
    /// Whether the allocation was committed.
    pub success: bool,

    /// Tickets remaining after the purchase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets_left: Option<u32>,

    /// Identifier of the created payment record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<PaymentId>,

    /// Total charged for the purchase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Money>,

    /// Platform share of the total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_commission: Option<Money>,

    /// Organizer share of the total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_revenue: Option<Money>,

    /// Failure taxonomy name, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,

    /// Diagnostic message, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AllocationResponse {
    /// Build the success response for a committed allocation.
    pub fn ok(receipt: &AllocationReceipt) -> Self {
        Self {
            success: true,
            tickets_left: Some(receipt.tickets_left),
            payment_id: Some(receipt.payment.id),
            total_price: Some(receipt.payment.total_price),
            admin_commission: Some(receipt.payment.admin_commission),
            organizer_revenue: Some(receipt.payment.organizer_revenue),
            error_kind: None,
            message: None,
        }
    }

    /// Build the failure response for a rejected allocation.
    pub fn error(err: &AllocationError) -> Self {
        Self {
            success: false,
            tickets_left: None,
            payment_id: None,
            total_price: None,
            admin_commission: None,
            organizer_revenue: None,
            error_kind: Some(error_kind_name(err).to_string()),
            message: Some(err.to_string()),
        }
    }
}

impl From<AllocationReceipt> for AllocationResponse {
    fn from(receipt: AllocationReceipt) -> Self {
        Self::ok(&receipt)
    }
}

impl From<&AllocationError> for AllocationResponse {
    fn from(err: &AllocationError) -> Self {
        Self::error(err)
    }
}

/// Taxonomy name exposed on the wire.
fn error_kind_name(err: &AllocationError) -> &'static str {
    match err {
        AllocationError::NotFound(_) => "NotFound",
        AllocationError::InvalidArgument(_) => "InvalidArgument",
        AllocationError::NotSellable(_) => "NotSellable",
        AllocationError::InsufficientInventory { .. } => "InsufficientInventory",
        AllocationError::Contention => "Contention",
        AllocationError::PersistenceFailure(_) => "PersistenceFailure",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ticketline_domain::{CommissionRate, Payment, UserId};

    fn receipt() -> AllocationReceipt {
        let payment = Payment::for_allocation(
            UserId::new(),
            EventId::new(),
            2,
            Money::from_cents(10_000),
            CommissionRate::default(),
            Utc::now(),
        )
        .unwrap();
        AllocationReceipt {
            payment,
            tickets_left: 3,
        }
    }

    #[test]
    fn test_request_bounds() {
        let mut request = AllocationRequest {
            event_id: EventId::new(),
            requested_tickets: 1,
        };
        assert!(request.validate_all().is_valid());

        request.requested_tickets = 10;
        assert!(request.validate_all().is_valid());

        request.requested_tickets = 0;
        assert!(!request.validate_all().is_valid());

        request.requested_tickets = 11;
        assert!(!request.validate_all().is_valid());
    }

    #[test]
    fn test_success_response_shape() {
        let response = AllocationResponse::ok(&receipt());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["ticketsLeft"], 3);
        assert_eq!(json["totalPrice"], 20_000);
        assert_eq!(json["adminCommission"], 1_000);
        assert_eq!(json["organizerRevenue"], 19_000);
        assert!(json.get("errorKind").is_none());
    }

    #[test]
    fn test_failure_response_shape() {
        let err = AllocationError::InsufficientInventory { remaining: 2 };
        let response = AllocationResponse::error(&err);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["errorKind"], "InsufficientInventory");
        assert!(json["message"].as_str().unwrap().contains('2'));
        assert!(json.get("paymentId").is_none());
    }

    #[test]
    fn test_request_round_trip() {
        let request = AllocationRequest {
            event_id: EventId::new(),
            requested_tickets: 4,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("requestedTickets"));
        let back: AllocationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_id, request.event_id);
        assert_eq!(back.requested_tickets, 4);
    }
}
