//! PostgreSQL-backed event store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use ticketline_application::{EventStore, StoreError};
use ticketline_domain::{Event, EventId, EventStatus, Money, OrganizerId};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::backend;

/// PostgreSQL implementation of the event store port.
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Create a new store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    #[instrument(skip(self))]
    async fn get(&self, event_id: EventId) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, organizer_id, name, capacity, ticket_price, status, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(row_to_event).transpose()
    }

    #[instrument(skip(self))]
    async fn mark_sold_out(&self, event_id: EventId) -> Result<(), StoreError> {
        // Conditional write: only a selling event transitions, so concurrent
        // callers and repeated calls cannot flip the status twice.
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = 'sold_out'
            WHERE id = $1 AND status = 'selling'
            "#,
        )
        .bind(event_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() > 0 {
            debug!(event_id = %event_id, "Event marked sold out");
            return Ok(());
        }

        // No row updated: either the event is already past selling (a no-op)
        // or it does not exist at all.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(event_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        if exists {
            Ok(())
        } else {
            Err(StoreError::EventNotFound(event_id))
        }
    }
}

fn row_to_event(row: sqlx::postgres::PgRow) -> Result<Event, StoreError> {
    let status_str: String = row.get("status");
    let capacity: i32 = row.get("capacity");
    let ticket_price: i64 = row.get("ticket_price");

    Ok(Event {
        id: EventId::from(row.get::<Uuid, _>("id")),
        organizer_id: OrganizerId::from(row.get::<Uuid, _>("organizer_id")),
        name: row.get("name"),
        capacity: capacity as u32,
        ticket_price: Money::from_cents(ticket_price),
        status: parse_status(&status_str)?,
        created_at: row.get("created_at"),
    })
}

fn parse_status(s: &str) -> Result<EventStatus, StoreError> {
    match s {
        "draft" => Ok(EventStatus::Draft),
        "selling" => Ok(EventStatus::Selling),
        "sold_out" => Ok(EventStatus::SoldOut),
        "over" => Ok(EventStatus::Over),
        "cancelled" => Ok(EventStatus::Cancelled),
        _ => Err(StoreError::Backend(format!("unknown event status: {s}"))),
    }
}
