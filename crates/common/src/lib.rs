//! Shared configuration and telemetry for Ticketline services.
//!
//! - **config**: environment/file-based application configuration
//! - **telemetry**: structured logging setup with `tracing`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod telemetry;

pub use config::{AllocatorSettings, AppConfig, DatabaseSettings, TelemetrySettings};
pub use telemetry::init_tracing;
