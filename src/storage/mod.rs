//! Storage abstractions for incident persistence.
//!
//! The pipeline writes through the [`IncidentStore`] trait and never learns
//! which backend it is talking to. Duplicate suppression is the backend's
//! job: every implementation must enforce a unique constraint on
//! `event_identifier` and report a conflicting insert as
//! [`InsertOutcome::Skipped`], not as an error.
//!
//! The store is append-only from the pipeline's perspective: there are no
//! update or delete operations on the trait.

pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Incident;

// Re-export for convenience
pub use sqlite::SqliteStore;

/// Outcome of an insert-if-absent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was persisted.
    Inserted,
    /// A record with the same identifier already exists; nothing written.
    Skipped,
}

/// Trait for incident storage backends.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Whether a record with this identifier is already persisted.
    ///
    /// Read-after-write consistent with this process's own inserts.
    async fn exists(&self, event_identifier: &str) -> Result<bool>;

    /// Insert the incident unless its identifier is already present.
    ///
    /// Assigns `ingested_at` at insert time. A uniqueness conflict is the
    /// normal dedup path and maps to [`InsertOutcome::Skipped`]; the stored
    /// record is never overwritten.
    async fn insert_if_absent(&self, incident: &Incident) -> Result<InsertOutcome>;

    /// Load every persisted incident (read surface for presentation).
    async fn list_all(&self) -> Result<Vec<Incident>>;

    /// Number of persisted incidents.
    async fn count(&self) -> Result<u64>;
}
