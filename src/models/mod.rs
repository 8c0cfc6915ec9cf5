// src/models/mod.rs

//! Domain models for the ingestion application.

mod config;
mod event_time;
mod incident;

// Re-export all public types
pub use config::{Config, FeedConfig, LoggingConfig, StoreConfig};
pub use event_time::parse_event_time;
pub use incident::{Incident, RawIncident};
