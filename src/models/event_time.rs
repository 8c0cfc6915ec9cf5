//! Event timestamp parsing.
//!
//! The feed reports event times as text like `"Aug 30 2026  9:15pm"`, with
//! irregular runs of internal whitespace. Ingestion stores the text verbatim;
//! read-side consumers (sorting, analytics) parse it here.

use chrono::NaiveDateTime;

/// Upstream timestamp format, after whitespace normalization.
const EVENT_TIME_FORMAT: &str = "%b %d %Y %I:%M%p";

/// Parse an upstream `eventdate` string into a naive local timestamp.
///
/// Returns `None` for anything that does not match the feed's format;
/// callers treat such records as having no usable time.
pub fn parse_event_time(raw: &str) -> Option<NaiveDateTime> {
    let squeezed = normalize_whitespace(raw);
    NaiveDateTime::parse_from_str(&squeezed, EVENT_TIME_FORMAT).ok()
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_standard() {
        let parsed = parse_event_time("Aug 30 2026 9:15pm").unwrap();
        assert_eq!(parsed.hour(), 21);
        assert_eq!(parsed.minute(), 15);
    }

    #[test]
    fn test_parse_irregular_whitespace() {
        let parsed = parse_event_time("  Aug  5  2026   12:03am ").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.minute(), 3);
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_event_time("").is_none());
        assert!(parse_event_time("not a date").is_none());
        assert!(parse_event_time("2026-08-30T21:15:00Z").is_none());
    }
}
