// src/analytics.rs

//! Read-side aggregates over stored incident history.
//!
//! Pure functions over the store's `list_all()` output; the presentation
//! layer renders these however it likes. Records with unusable timestamps
//! simply drop out of the time-based views.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

use crate::models::{Incident, parse_event_time};

/// Count incidents per event type, most common first.
///
/// Ties break alphabetically so output is stable.
pub fn event_type_counts(incidents: &[Incident]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for incident in incidents {
        if let Some(desc) = incident.event_description.as_deref() {
            *counts.entry(desc).or_default() += 1;
        }
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(desc, n)| (desc.to_string(), n))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Count incidents per severity code, lowest code first.
pub fn severity_distribution(incidents: &[Incident]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for incident in incidents {
        if let Some(code) = incident.severity_code.as_deref() {
            *counts.entry(code).or_default() += 1;
        }
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(code, n)| (code.to_string(), n))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
}

/// Human label for an upstream severity code.
///
/// The feed documents 1 as least severe and 4 as most severe; anything else
/// passes through verbatim.
pub fn severity_label(code: &str) -> String {
    match code {
        "1" => "1 (Least severe)".to_string(),
        "2" => "2 (Less severe)".to_string(),
        "3" => "3 (More severe)".to_string(),
        "4" => "4 (Most severe)".to_string(),
        other => other.to_string(),
    }
}

/// Incident count per hour of day (0..24), over parseable timestamps.
pub fn hourly_histogram(incidents: &[Incident]) -> [usize; 24] {
    use chrono::Timelike;

    let mut buckets = [0usize; 24];
    for incident in incidents {
        let Some(raw) = incident.event_timestamp_raw.as_deref() else {
            continue;
        };
        if let Some(time) = parse_event_time(raw) {
            buckets[time.hour() as usize] += 1;
        }
    }
    buckets
}

/// Incidents whose event time falls within the 24 hours before `now`.
pub fn last_24_hours(incidents: &[Incident], now: NaiveDateTime) -> Vec<&Incident> {
    let cutoff = now - Duration::hours(24);
    incidents
        .iter()
        .filter(|incident| {
            incident
                .event_timestamp_raw
                .as_deref()
                .and_then(parse_event_time)
                .is_some_and(|t| t >= cutoff && t <= now)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: &str, desc: Option<&str>, severity: Option<&str>, date: Option<&str>) -> Incident {
        Incident {
            event_identifier: id.to_string(),
            event_number: None,
            event_id: None,
            event_timestamp_raw: date.map(str::to_string),
            longitude: -84.28,
            latitude: 30.44,
            event_description: desc.map(str::to_string),
            event_headline: None,
            event_address: None,
            severity_code: severity.map(str::to_string),
            ingested_at: None,
        }
    }

    #[test]
    fn test_event_type_counts_ordering() {
        let incidents = vec![
            incident("1", Some("Theft"), None, None),
            incident("2", Some("Wreck"), None, None),
            incident("3", Some("Theft"), None, None),
            incident("4", None, None, None),
        ];
        let counts = event_type_counts(&incidents);
        assert_eq!(counts, vec![("Theft".to_string(), 2), ("Wreck".to_string(), 1)]);
    }

    #[test]
    fn test_severity_distribution_skips_missing() {
        let incidents = vec![
            incident("1", None, Some("2"), None),
            incident("2", None, Some("1"), None),
            incident("3", None, Some("2"), None),
            incident("4", None, None, None),
        ];
        let dist = severity_distribution(&incidents);
        assert_eq!(dist, vec![("1".to_string(), 1), ("2".to_string(), 2)]);
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(severity_label("1"), "1 (Least severe)");
        assert_eq!(severity_label("4"), "4 (Most severe)");
        assert_eq!(severity_label("9"), "9");
    }

    #[test]
    fn test_hourly_histogram() {
        let incidents = vec![
            incident("1", None, None, Some("Aug 30 2026 9:15pm")),
            incident("2", None, None, Some("Aug 30 2026  9:40pm")),
            incident("3", None, None, Some("Aug 30 2026 12:01am")),
            incident("4", None, None, Some("not a date")),
            incident("5", None, None, None),
        ];
        let buckets = hourly_histogram(&incidents);
        assert_eq!(buckets[21], 2);
        assert_eq!(buckets[0], 1);
        assert_eq!(buckets.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_last_24_hours_window() {
        let now = parse_event_time("Aug 30 2026 9:00pm").unwrap();
        let incidents = vec![
            incident("fresh", None, None, Some("Aug 30 2026 8:00pm")),
            incident("edge", None, None, Some("Aug 29 2026 9:00pm")),
            incident("stale", None, None, Some("Aug 28 2026 9:00pm")),
            incident("undated", None, None, None),
        ];
        let recent = last_24_hours(&incidents, now);
        let ids: Vec<&str> = recent.iter().map(|i| i.event_identifier.as_str()).collect();
        assert_eq!(ids, vec!["fresh", "edge"]);
    }
}
