//! PostgreSQL-backed registration log and payment ledger.

use async_trait::async_trait;
use sqlx::PgPool;
use ticketline_application::{AllocationStore, StoreError};
use ticketline_domain::{EventId, Payment, Registration};
use tracing::{debug, instrument};

use super::backend;

/// PostgreSQL implementation of the allocation store port.
///
/// `commit` runs inside a transaction that row-locks the event and
/// re-verifies the capacity ceiling, so concurrent allocators in other
/// processes cannot push the registration count past capacity.
pub struct PgAllocationStore {
    pool: PgPool,
}

impl PgAllocationStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AllocationStore for PgAllocationStore {
    #[instrument(skip(self))]
    async fn count_active(&self, event_id: EventId) -> Result<u32, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
                .bind(event_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;

        Ok(count as u32)
    }

    #[instrument(skip(self, registrations, payment), fields(event_id = %payment.event_id, tickets = payment.tickets))]
    async fn commit(
        &self,
        registrations: &[Registration],
        payment: &Payment,
    ) -> Result<(), StoreError> {
        let event_id = payment.event_id;
        let mut tx = self.pool.begin().await.map_err(backend)?;

        // Row-lock the event for the rest of the transaction. Concurrent
        // commits for the same event serialize here, which makes the
        // recount below authoritative.
        let capacity: Option<i32> =
            sqlx::query_scalar("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(backend)?;

        let capacity = capacity.ok_or(StoreError::EventNotFound(event_id))? as u32;

        let active: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
                .bind(event_id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(backend)?;

        let remaining = capacity.saturating_sub(active as u32);
        if registrations.len() as u32 > remaining {
            // Dropping the transaction rolls it back and releases the lock.
            return Err(StoreError::CapacityExceeded { remaining });
        }

        for registration in registrations {
            sqlx::query(
                r#"
                INSERT INTO registrations (id, event_id, user_id, registration_date)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(registration.id.as_uuid())
            .bind(registration.event_id.as_uuid())
            .bind(registration.user_id.as_uuid())
            .bind(registration.registration_date)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        }

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, user_id, event_id, tickets,
                total_price, admin_commission, organizer_revenue, payment_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.user_id.as_uuid())
        .bind(payment.event_id.as_uuid())
        .bind(payment.tickets as i32)
        .bind(payment.total_price.cents())
        .bind(payment.admin_commission.cents())
        .bind(payment.organizer_revenue.cents())
        .bind(payment.payment_date)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;

        debug!(
            event_id = %event_id,
            registrations = registrations.len(),
            "Allocation committed"
        );
        Ok(())
    }
}
