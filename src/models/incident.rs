//! Incident data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw record from the upstream feed, untyped.
///
/// The feed makes no guarantees about which fields are present or whether
/// numeric-looking values arrive as JSON strings or numbers, so records stay
/// untyped until the normalizer has looked at them.
pub type RawIncident = serde_json::Map<String, serde_json::Value>;

/// A police-reported incident, normalized from one upstream record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    /// Feed-assigned unique key (`eventinc`)
    pub event_identifier: String,

    /// Secondary event number (`eventnum`), no uniqueness guarantee
    pub event_number: Option<String>,

    /// Secondary event id (`eventid`), no uniqueness guarantee
    pub event_id: Option<String>,

    /// Upstream timestamp text (`eventdate`), stored verbatim.
    /// Format is "MMM DD YYYY H:MMam/pm" with irregular internal whitespace;
    /// consumers parse it via [`crate::models::parse_event_time`].
    pub event_timestamp_raw: Option<String>,

    /// Longitude in decimal degrees (`x`)
    pub longitude: f64,

    /// Latitude in decimal degrees (`y`)
    pub latitude: f64,

    /// Incident type description (`eventdesc`)
    pub event_description: Option<String>,

    /// Headline text (`eventheadline`)
    pub event_headline: Option<String>,

    /// Street address text (`eventaddress`)
    pub event_address: Option<String>,

    /// Upstream priority/severity code (`ipk`), observed domain "1".."4",
    /// 1 = least severe, 4 = most severe
    pub severity_code: Option<String>,

    /// Assigned by the store at insert time; None until persisted
    pub ingested_at: Option<DateTime<Utc>>,
}

impl Incident {
    /// Format the incident for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{date}`, `{desc}`, `{address}`, `{severity}`
    pub fn format(&self, template: &str) -> String {
        let blank = String::new();
        template
            .replace("{id}", &self.event_identifier)
            .replace("{date}", self.event_timestamp_raw.as_ref().unwrap_or(&blank))
            .replace("{desc}", self.event_description.as_ref().unwrap_or(&blank))
            .replace("{address}", self.event_address.as_ref().unwrap_or(&blank))
            .replace("{severity}", self.severity_code.as_ref().unwrap_or(&blank))
    }
}
