//! Ticket Allocator
//!
//! The check-then-commit sequence behind every ticket purchase. The naive
//! rendition of this flow (count registrations, decide "ok", insert) is a
//! textbook race under concurrency; here the whole read-check-write
//! sequence runs under a per-event lock, and the store re-verifies the
//! capacity ceiling inside its own atomic boundary, so two concurrent
//! buyers can never jointly oversell an event.

use super::{AllocationStore, EventStore, StoreError};
use crate::dto::AllocationRequest;
use crate::locking::EventLocks;
use crate::validation::Validatable;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use ticketline_common::config::AllocatorSettings;
use ticketline_domain::money::InvalidCommissionRate;
use ticketline_domain::{
    AllocationError, AllocationResult, CommissionRate, Event, Payment, Registration, UserId,
};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, instrument, warn};

/// Allocator behavior knobs.
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Upper bound on waiting for a contended event lock.
    pub lock_wait: Duration,
    /// Platform commission rate applied to every payment.
    pub commission_rate: CommissionRate,
    /// Maximum number of idle per-event locks retained in memory.
    pub lock_table_capacity: usize,
}

impl AllocatorConfig {
    /// Build a config from loaded application settings.
    pub fn from_settings(settings: &AllocatorSettings) -> Result<Self, InvalidCommissionRate> {
        Ok(Self {
            lock_wait: settings.lock_wait(),
            commission_rate: CommissionRate::new(settings.commission_bps)?,
            lock_table_capacity: settings.lock_table_capacity,
        })
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            lock_wait: Duration::from_secs(5),
            commission_rate: CommissionRate::default(),
            lock_table_capacity: 1_024,
        }
    }
}

/// The outcome of a successful allocation.
#[derive(Debug, Clone)]
pub struct AllocationReceipt {
    /// The payment record created for this purchase.
    pub payment: Payment,
    /// Tickets remaining after this purchase.
    pub tickets_left: u32,
}

/// Allocates tickets against event capacity.
///
/// Sole writer of registrations and payments, and the sole mutator of the
/// selling → sold-out transition.
pub struct TicketAllocator<E, A>
where
    E: EventStore,
    A: AllocationStore,
{
    events: Arc<E>,
    allocations: Arc<A>,
    locks: EventLocks,
    config: AllocatorConfig,
}

impl<E, A> TicketAllocator<E, A>
where
    E: EventStore + 'static,
    A: AllocationStore + 'static,
{
    /// Create an allocator over the given stores.
    pub fn new(events: Arc<E>, allocations: Arc<A>, config: AllocatorConfig) -> Self {
        let locks = EventLocks::new(config.lock_table_capacity);
        Self {
            events,
            allocations,
            locks,
            config,
        }
    }

    /// Allocate `request.requested_tickets` tickets to `user_id`.
    ///
    /// On success the registrations and the payment have been durably
    /// committed as one group, and the event has been marked sold-out if
    /// this purchase consumed the last ticket. On failure no partial state
    /// exists.
    ///
    /// # Errors
    ///
    /// See [`AllocationError`] for the full taxonomy. The precondition
    /// order is: ticket-count bounds, event existence, sellable status,
    /// remaining inventory.
    #[instrument(
        skip(self, request),
        fields(event_id = %request.event_id, tickets = request.requested_tickets, user_id = %user_id)
    )]
    pub async fn allocate(
        &self,
        user_id: UserId,
        request: AllocationRequest,
    ) -> AllocationResult<AllocationReceipt> {
        request.validate_all().ensure_valid()?;

        // Everything from the count to the status flip happens under this
        // guard; waiting is bounded and expiry reports Contention.
        let guard = self
            .locks
            .acquire(request.event_id, self.config.lock_wait)
            .await?;

        let event = self
            .events
            .get(request.event_id)
            .await
            .map_err(store_failure)?
            .ok_or(AllocationError::NotFound(request.event_id))?;

        if !event.status.is_sellable() {
            return Err(AllocationError::NotSellable(event.status));
        }

        let active = self
            .allocations
            .count_active(event.id)
            .await
            .map_err(store_failure)?;
        let remaining = event.tickets_left(active);
        if request.requested_tickets > remaining {
            warn!(remaining, "allocation rejected: insufficient inventory");
            return Err(AllocationError::InsufficientInventory { remaining });
        }

        let now = Utc::now();
        let registrations =
            Registration::batch(event.id, user_id, request.requested_tickets, now);
        let payment = Payment::for_allocation(
            user_id,
            event.id,
            request.requested_tickets,
            event.ticket_price,
            self.config.commission_rate,
            now,
        )
        .ok_or_else(|| {
            AllocationError::InvalidArgument("total price overflows the ledger".to_string())
        })?;

        // The write section is spawned so it runs to completion even if the
        // caller's request is cancelled mid-flight; the lock guard travels
        // with it and is released only once the section finishes.
        let events = Arc::clone(&self.events);
        let allocations = Arc::clone(&self.allocations);
        let section = tokio::spawn(commit_allocation(
            events,
            allocations,
            event,
            active,
            registrations,
            payment,
            guard,
        ));

        match section.await {
            Ok(result) => result,
            Err(err) => Err(AllocationError::PersistenceFailure(format!(
                "allocation task aborted: {err}"
            ))),
        }
    }
}

/// The non-interruptible write section of an allocation.
async fn commit_allocation<E, A>(
    events: Arc<E>,
    allocations: Arc<A>,
    event: Event,
    active_before: u32,
    registrations: Vec<Registration>,
    payment: Payment,
    _guard: OwnedMutexGuard<()>,
) -> AllocationResult<AllocationReceipt>
where
    E: EventStore,
    A: AllocationStore,
{
    match allocations.commit(&registrations, &payment).await {
        Ok(()) => {}
        Err(StoreError::CapacityExceeded { remaining }) => {
            // Another writer on a shared store won the race
            warn!(event_id = %event.id, remaining, "commit rejected by capacity ceiling");
            return Err(AllocationError::InsufficientInventory { remaining });
        }
        Err(err) => {
            return Err(AllocationError::PersistenceFailure(err.to_string()));
        }
    }

    // Re-derive the active count. The per-event lock is still held, so the
    // local sum is an exact fallback if the recount read fails.
    let active = match allocations.count_active(event.id).await {
        Ok(count) => count,
        Err(err) => {
            warn!(event_id = %event.id, error = %err, "recount after commit failed");
            active_before + payment.tickets
        }
    };

    if active >= event.capacity {
        match events.mark_sold_out(event.id).await {
            Ok(()) => info!(event_id = %event.id, "event sold out"),
            Err(err) => {
                // The allocation itself stands; the capacity ceiling keeps
                // further commits out even while the status lags.
                warn!(event_id = %event.id, error = %err, "sold-out transition failed");
            }
        }
    }

    let tickets_left = event.capacity.saturating_sub(active);
    info!(
        payment_id = %payment.id,
        tickets = payment.tickets,
        total_price = %payment.total_price,
        tickets_left,
        "allocation committed"
    );

    Ok(AllocationReceipt {
        payment,
        tickets_left,
    })
}

fn store_failure(err: StoreError) -> AllocationError {
    AllocationError::PersistenceFailure(err.to_string())
}
