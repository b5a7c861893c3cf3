//! Infrastructure layer for Ticketline.
//!
//! PostgreSQL-backed implementations of the application's store ports,
//! plus connection pool management and health checks. The capacity ceiling
//! is enforced here a second time, inside a database transaction, so the
//! allocator stays safe when several processes share the database.

pub mod database;
pub mod repositories;

pub use database::{DatabaseConfig, DatabasePool, HealthStatus};
pub use repositories::{PgAllocationStore, PgEventStore};

/// Result type for infrastructure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database errors from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row held a value the domain model rejects.
    #[error("invalid row data: {0}")]
    InvalidRow(String),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether retrying the operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        assert!(Error::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!Error::Configuration("missing url".to_string()).is_retryable());
        assert!(!Error::InvalidRow("bad status".to_string()).is_retryable());
    }
}
