// src/pipeline/ingest.rs

//! One ingestion cycle: fetch, normalize, deduplicate, persist.
//!
//! Every failure is contained at the smallest scope that makes sense. A
//! failed fetch degrades the whole cycle to "no new records"; a bad or
//! duplicate record is skipped; a store error on one record is reported and
//! the loop moves on. Nothing here is fatal to the process, so the
//! presentation side can always render whatever history already exists.

use crate::error::Result;
use crate::feed::IncidentFeed;
use crate::normalize::normalize;
use crate::storage::{IncidentStore, InsertOutcome};

/// Counters for one ingestion cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Raw records received from the feed
    pub fetched: usize,
    /// New incidents persisted
    pub inserted: usize,
    /// Records skipped because their identifier was already stored
    pub duplicates: usize,
    /// Records dropped by the normalizer
    pub rejected: usize,
    /// Records whose store write failed
    pub write_failures: usize,
    /// Whether the feed fetch itself failed this cycle
    pub fetch_failed: bool,
}

impl IngestReport {
    /// One-line summary for log output.
    pub fn summary(&self) -> String {
        format!(
            "fetched {}, inserted {}, duplicates {}, rejected {}, write failures {}{}",
            self.fetched,
            self.inserted,
            self.duplicates,
            self.rejected,
            self.write_failures,
            if self.fetch_failed { " (fetch failed)" } else { "" },
        )
    }
}

/// Run one ingestion cycle against the given feed and store.
///
/// Collaborators are passed in rather than read from ambient state so the
/// cycle is testable with fakes for both sides.
pub async fn run_ingest(
    feed: &dyn IncidentFeed,
    store: &dyn IncidentStore,
) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    let records = match feed.fetch().await {
        Ok(records) => records,
        Err(e) => {
            // Prior data stays visible; the next invocation is the retry.
            log::warn!("Feed fetch failed, continuing with stored data: {}", e);
            report.fetch_failed = true;
            Vec::new()
        }
    };
    report.fetched = records.len();

    for record in &records {
        let incident = match normalize(record) {
            Ok(incident) => incident,
            Err(reason) => {
                log::debug!("Skipping record without identifier: {:?}", reason);
                report.rejected += 1;
                continue;
            }
        };

        match store.exists(&incident.event_identifier).await {
            Ok(true) => {
                report.duplicates += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                log::error!(
                    "Store lookup failed for {}: {}",
                    incident.event_identifier,
                    e
                );
                report.write_failures += 1;
                continue;
            }
        }

        match store.insert_if_absent(&incident).await {
            Ok(InsertOutcome::Inserted) => report.inserted += 1,
            Ok(InsertOutcome::Skipped) => report.duplicates += 1,
            Err(e) => {
                log::error!(
                    "Store insert failed for {}: {}",
                    incident.event_identifier,
                    e
                );
                report.write_failures += 1;
            }
        }
    }

    log::info!("Ingest cycle complete: {}", report.summary());
    Ok(report)
}
