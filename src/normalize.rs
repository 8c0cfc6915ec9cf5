// src/normalize.rs

//! Record normalization.
//!
//! Maps one raw feed record into a typed [`Incident`]. Records without a
//! usable `eventinc` identifier are rejected before they can reach storage.

use serde_json::Value;

use crate::models::{Incident, RawIncident};

/// Why a raw record was dropped instead of normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The record has no non-empty `eventinc` value.
    MissingIdentifier,
}

/// Normalize one raw feed record.
///
/// String fields are copied verbatim (JSON numbers are rendered as text,
/// since the feed is inconsistent about `ipk`). Coordinates default to 0.0
/// when missing or unparsable rather than failing the record; see
/// [`coordinate`]. `ingested_at` stays unset until the store assigns it at
/// insert time.
pub fn normalize(raw: &RawIncident) -> Result<Incident, RejectReason> {
    let Some(event_identifier) = string_field(raw, "eventinc").filter(|s| !s.trim().is_empty())
    else {
        return Err(RejectReason::MissingIdentifier);
    };

    Ok(Incident {
        longitude: coordinate(raw, "x", &event_identifier),
        latitude: coordinate(raw, "y", &event_identifier),
        event_number: string_field(raw, "eventnum"),
        event_id: string_field(raw, "eventid"),
        event_timestamp_raw: string_field(raw, "eventdate"),
        event_description: string_field(raw, "eventdesc"),
        event_headline: string_field(raw, "eventheadline"),
        event_address: string_field(raw, "eventaddress"),
        severity_code: string_field(raw, "ipk"),
        ingested_at: None,
        event_identifier,
    })
}

/// Read a field as text, accepting JSON strings and numbers.
fn string_field(raw: &RawIncident, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a coordinate field to f64, defaulting to 0.0.
///
/// The 0.0 fallback fabricates a point at the origin; it is kept for parity
/// with upstream behavior, and the warning makes such rows traceable.
fn coordinate(raw: &RawIncident, key: &str, id: &str) -> f64 {
    let parsed = match raw.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        log::warn!("Incident {}: no usable '{}' coordinate, defaulting to 0.0", id, key);
        0.0
    })
}
