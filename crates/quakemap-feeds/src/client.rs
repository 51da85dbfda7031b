//! HTTP client for the earthquake and plate boundary feeds.
//!
//! One GET per call, no retries, no timeout beyond the client default.

use quakemap_types::FeatureCollection;
use tracing::{debug, info};

use crate::error::FeedError;

/// Fetches GeoJSON `FeatureCollection`s over HTTP.
///
/// Cheap to clone; clones share the underlying connection pool, so the
/// two feed tasks can each hold one.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    /// Create a client that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FeedError::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// GET `url` and decode the body as a `FeatureCollection`.
    pub async fn fetch_collection(&self, url: &str) -> Result<FeatureCollection, FeedError> {
        debug!(url, "fetching feed");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json, application/json")
            .send()
            .await
            .map_err(|e| FeedError::Request {
                url: url.to_owned(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(FeedError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| FeedError::Request {
            url: url.to_owned(),
            message: format!("failed to read body: {e}"),
        })?;

        let collection = parse_collection(url, &bytes)?;
        info!(
            url,
            features = collection.len(),
            bytes = bytes.len(),
            "feed fetched"
        );
        Ok(collection)
    }
}

/// Decode a feed body.
pub fn parse_collection(url: &str, body: &[u8]) -> Result<FeatureCollection, FeedError> {
    serde_json::from_slice(body).map_err(|source| FeedError::Decode {
        url: url.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_collection_accepts_feed_body() {
        let body = br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mag":1.1},"geometry":{"type":"Point","coordinates":[1,2]}}
        ]}"#;
        let collection = parse_collection("http://feed", body);
        assert!(collection.is_ok_and(|c| c.len() == 1));
    }

    #[test]
    fn parse_collection_rejects_non_json() {
        let result = parse_collection("http://feed", b"<html>rate limited</html>");
        assert!(matches!(result, Err(FeedError::Decode { .. })));
    }

    #[test]
    fn unknown_geometry_does_not_reject_the_feed() {
        let body = br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Circle","coordinates":[1,2]}},
            {"type":"Feature","properties":{"mag":2.0},"geometry":{"type":"Point","coordinates":[3,4]}},
            {"type":"Feature","properties":{},"geometry":{"type":"GeometryCollection","geometries":[]}}
        ]}"#;
        let collection = parse_collection("http://feed", body);
        assert!(collection.is_ok());
        let features = collection.map(|c| c.features).unwrap_or_default();
        assert_eq!(features.len(), 3);
        assert!(features.first().is_some_and(|f| f.geometry.is_none()));
        assert_eq!(
            features.get(1).and_then(|f| f.geometry.as_ref()?.point_lng_lat()),
            Some((3.0, 4.0))
        );
        assert!(features.get(2).is_some_and(|f| f.geometry.is_some()));
    }

    #[test]
    fn decode_error_names_the_url() {
        let err = parse_collection("http://feed/quakes", b"[]").err();
        let message = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("http://feed/quakes"));
    }

    #[test]
    fn client_builds_with_user_agent() {
        assert!(FeedClient::new("quakemap-test/0.0").is_ok());
    }

    #[test]
    fn unusable_user_agent_is_a_client_error() {
        let err = FeedClient::new("quakemap\nsecond-line").err();
        assert!(matches!(err, Some(FeedError::Client { .. })));
        let message = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(message.starts_with("failed to build HTTP client: "));
    }
}
