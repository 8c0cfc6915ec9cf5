// src/pipeline/mod.rs

//! Ingestion pipeline.

mod ingest;

pub use ingest::{IngestReport, run_ingest};
