//! Upstream feed client.
//!
//! Fetches the active-incident feed with a single HTTP GET and extracts the
//! record array at the top-level `data` key. Records come back untyped; the
//! normalizer decides what to keep.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{FeedConfig, RawIncident};

/// Trait for incident feed sources.
///
/// The pipeline takes the feed by trait object so tests can substitute a
/// fake without a network.
#[async_trait]
pub trait IncidentFeed: Send + Sync {
    /// Fetch one batch of raw records, in feed order.
    async fn fetch(&self) -> Result<Vec<RawIncident>>;
}

/// HTTP client for the incident feed endpoint.
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a configured feed client.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IncidentFeed for FeedClient {
    async fn fetch(&self) -> Result<Vec<RawIncident>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::feed(
                &self.url,
                format!("unexpected status {status}"),
            ));
        }

        let body: Value = response.json().await?;
        extract_records(&self.url, body)
    }
}

/// Extract the record array at the feed's top-level `data` key.
fn extract_records(url: &str, body: Value) -> Result<Vec<RawIncident>> {
    let Value::Object(mut root) = body else {
        return Err(AppError::feed(url, "response body is not a JSON object"));
    };

    let Some(data) = root.remove("data") else {
        return Err(AppError::feed(url, "response has no top-level 'data' key"));
    };

    let Value::Array(items) = data else {
        return Err(AppError::feed(url, "'data' is not an array"));
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) => records.push(map),
            other => log::debug!("Skipping non-object feed entry: {}", other),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://example.test/feed";

    #[test]
    fn test_extract_records() {
        let body = json!({
            "status": "ok",
            "data": [
                {"eventinc": "A1", "eventdesc": "Theft"},
                {"eventinc": "A2"},
            ]
        });
        let records = extract_records(URL, body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["eventinc"], "A1");
    }

    #[test]
    fn test_extract_empty_data() {
        let records = extract_records(URL, json!({"data": []})).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_extract_skips_non_object_entries() {
        let body = json!({"data": [{"eventinc": "A1"}, 42, "junk", null]});
        let records = extract_records(URL, body).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_data_key_is_error() {
        assert!(extract_records(URL, json!({"rows": []})).is_err());
    }

    #[test]
    fn test_non_object_body_is_error() {
        assert!(extract_records(URL, json!([1, 2, 3])).is_err());
        assert!(extract_records(URL, json!({"data": "nope"})).is_err());
    }
}
