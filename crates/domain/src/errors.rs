//! Error types for ticket allocation.
//!
//! Every outcome of an allocation call maps into exactly one of these
//! variants; nothing is silently swallowed. The web layer translates the
//! codes into user-facing messages.

use crate::event::EventStatus;
use crate::identifiers::EventId;

/// Why an allocation call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// The referenced event does not exist.
    #[error("event not found: {0}")]
    NotFound(EventId),

    /// The requested ticket count is outside the permitted range.
    #[error("invalid request: {0}")]
    InvalidArgument(String),

    /// The event is not in a purchasable state.
    #[error("event is not selling (status: {})", .0.as_str())]
    NotSellable(EventStatus),

    /// Granting the request would exceed event capacity.
    ///
    /// Carries the actual number of tickets remaining so the caller can
    /// offer a smaller quantity.
    #[error("insufficient inventory: {remaining} tickets remaining")]
    InsufficientInventory {
        /// Tickets still available for this event.
        remaining: u32,
    },

    /// Another allocation for the same event held the lock past the wait
    /// bound.
    #[error("allocation contention: timed out waiting for event lock")]
    Contention,

    /// A store write failed after all checks passed; the atomic group was
    /// rolled back and no partial state exists.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl AllocationError {
    /// Machine-readable error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotSellable(_) => "NOT_SELLABLE",
            Self::InsufficientInventory { .. } => "INSUFFICIENT_INVENTORY",
            Self::Contention => "CONTENTION",
            Self::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidArgument(_) => 400,
            Self::NotSellable(_) => 409,
            Self::InsufficientInventory { .. } => 409,
            Self::Contention => 503,
            Self::PersistenceFailure(_) => 503,
        }
    }

    /// Whether the caller may reasonably retry.
    ///
    /// `InsufficientInventory` is retryable with a smaller quantity;
    /// `Contention` and `PersistenceFailure` left no side effects behind and
    /// can be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientInventory { .. } | Self::Contention | Self::PersistenceFailure(_)
        )
    }
}

/// Result type for allocation operations.
pub type AllocationResult<T> = Result<T, AllocationError>;
