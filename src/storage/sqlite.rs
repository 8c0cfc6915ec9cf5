//! SQLite storage implementation.
//!
//! Backs the incident store with a single-file embedded database. The
//! `event_identifier` primary key is the enforcement mechanism for
//! at-most-once insertion; the pipeline's `exists` pre-check is only an
//! optimization on top of it.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::error::Result;
use crate::models::Incident;
use crate::storage::{IncidentStore, InsertOutcome};

const CREATE_INCIDENTS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS incidents (
    event_identifier    TEXT PRIMARY KEY NOT NULL,
    event_number        TEXT,
    event_id            TEXT,
    event_timestamp_raw TEXT,
    longitude           REAL NOT NULL DEFAULT 0.0,
    latitude            REAL NOT NULL DEFAULT 0.0,
    event_description   TEXT,
    event_headline      TEXT,
    event_address       TEXT,
    severity_code       TEXT,
    ingested_at         TEXT NOT NULL
)";

/// SQLite storage backend.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and bootstrap the schema.
    pub async fn open(db_path: impl AsRef<Path>, busy_timeout_ms: u64) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        // WAL allows a reader (the presentation side) alongside the writer.
        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
        let pragma = format!("PRAGMA busy_timeout = {}", busy_timeout_ms);
        sqlx::query(&pragma).execute(&pool).await?;

        Self::from_pool(pool).await
    }

    /// Create an in-memory store. Used by tests; data does not survive
    /// the pool.
    pub async fn in_memory() -> Result<Self> {
        // One connection only: each in-memory SQLite connection is its own
        // database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_INCIDENTS_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl IncidentStore for SqliteStore {
    async fn exists(&self, event_identifier: &str) -> Result<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM incidents WHERE event_identifier = ?1)",
        )
        .bind(event_identifier)
        .fetch_one(&self.pool)
        .await?;
        Ok(found != 0)
    }

    async fn insert_if_absent(&self, incident: &Incident) -> Result<InsertOutcome> {
        let ingested_at: DateTime<Utc> = Utc::now();

        let result = sqlx::query(
            "INSERT INTO incidents (
                event_identifier, event_number, event_id, event_timestamp_raw,
                longitude, latitude, event_description, event_headline,
                event_address, severity_code, ingested_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(event_identifier) DO NOTHING",
        )
        .bind(&incident.event_identifier)
        .bind(&incident.event_number)
        .bind(&incident.event_id)
        .bind(&incident.event_timestamp_raw)
        .bind(incident.longitude)
        .bind(incident.latitude)
        .bind(&incident.event_description)
        .bind(&incident.event_headline)
        .bind(&incident.event_address)
        .bind(&incident.severity_code)
        .bind(ingested_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(InsertOutcome::Skipped),
            Ok(_) => Ok(InsertOutcome::Inserted),
            // A racing writer can slip between check and insert; the
            // constraint, not the check, is the guard.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Ok(InsertOutcome::Skipped)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_all(&self) -> Result<Vec<Incident>> {
        let rows = sqlx::query(
            "SELECT event_identifier, event_number, event_id, event_timestamp_raw,
                    longitude, latitude, event_description, event_headline,
                    event_address, severity_code, ingested_at
             FROM incidents
             ORDER BY ingested_at, event_identifier",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_incident).collect()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM incidents")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

fn row_to_incident(row: SqliteRow) -> Result<Incident> {
    Ok(Incident {
        event_identifier: row.try_get("event_identifier")?,
        event_number: row.try_get("event_number")?,
        event_id: row.try_get("event_id")?,
        event_timestamp_raw: row.try_get("event_timestamp_raw")?,
        longitude: row.try_get("longitude")?,
        latitude: row.try_get("latitude")?,
        event_description: row.try_get("event_description")?,
        event_headline: row.try_get("event_headline")?,
        event_address: row.try_get("event_address")?,
        severity_code: row.try_get("severity_code")?,
        ingested_at: row.try_get("ingested_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: &str, desc: &str) -> Incident {
        Incident {
            event_identifier: id.to_string(),
            event_number: Some("26-000001".to_string()),
            event_id: None,
            event_timestamp_raw: Some("Aug 30 2026 9:15pm".to_string()),
            longitude: -84.28,
            latitude: 30.44,
            event_description: Some(desc.to_string()),
            event_headline: None,
            event_address: Some("600 BLOCK N MONROE ST".to_string()),
            severity_code: Some("2".to_string()),
            ingested_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let store = SqliteStore::in_memory().await.unwrap();

        assert!(!store.exists("A1").await.unwrap());
        let outcome = store.insert_if_absent(&incident("A1", "Theft")).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);
        assert!(store.exists("A1").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].event_identifier, "A1");
        assert_eq!(all[0].longitude, -84.28);
        assert!(all[0].ingested_at.is_some(), "store assigns ingested_at");
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_skipped_not_overwritten() {
        let store = SqliteStore::in_memory().await.unwrap();

        store.insert_if_absent(&incident("A1", "Theft")).await.unwrap();
        let outcome = store
            .insert_if_absent(&incident("A1", "Rewritten"))
            .await
            .unwrap();

        assert_eq!(outcome, InsertOutcome::Skipped);
        assert_eq!(store.count().await.unwrap(), 1);

        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].event_description.as_deref(), Some("Theft"));
    }

    #[tokio::test]
    async fn test_list_all_empty_store() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("incidents.db");

        let store = SqliteStore::open(&path, 5000).await.unwrap();
        store.insert_if_absent(&incident("A1", "Theft")).await.unwrap();

        assert!(path.exists());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.db");

        {
            let store = SqliteStore::open(&path, 5000).await.unwrap();
            store.insert_if_absent(&incident("A1", "Theft")).await.unwrap();
        }

        let store = SqliteStore::open(&path, 5000).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(
            store
                .insert_if_absent(&incident("A1", "Theft"))
                .await
                .unwrap(),
            InsertOutcome::Skipped
        );
    }
}
