// src/lib.rs

//! tops-ingest Library
//!
//! Fetch–deduplicate–persist pipeline for the Tallahassee Police
//! Department's public active-incident feed.

pub mod analytics;
pub mod error;
pub mod feed;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod storage;
