use crate::app::ports::HttpClientPort;
use crate::error::LookupFailure;
use crate::types::{Coordinates, ReverseGeocoder};
use serde::Deserialize;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "bigdatacloud";

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    postcode: Option<String>,
}

/// BigDataCloud's keyless client-side reverse geocoder.
pub struct BigDataCloudClient {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
}

impl BigDataCloudClient {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/data/reverse-geocode-client?latitude={}&longitude={}&localityLanguage=en",
            self.base_url, coordinates.latitude, coordinates.longitude
        )
    }
}

fn parse_postcode(body: &[u8]) -> Result<String, LookupFailure> {
    let response: ReverseResponse = serde_json::from_slice(body)?;
    response
        .postcode
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or(LookupFailure::NoResult)
}

#[async_trait::async_trait]
impl ReverseGeocoder for BigDataCloudClient {
    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn postal_code(&self, coordinates: Coordinates) -> Result<String, LookupFailure> {
        let response = self
            .http
            .get(&self.url(coordinates))
            .await
            .map_err(LookupFailure::Transport)?;
        if !response.is_success() {
            return Err(LookupFailure::Status(response.status));
        }
        parse_postcode(&response.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_postcode() {
        let body = br#"{"latitude": 40.6413, "longitude": -73.7781, "city": "New York City", "postcode": "11430"}"#;
        assert_eq!(parse_postcode(body).unwrap(), "11430");
    }

    #[test]
    fn test_blank_or_absent_postcode_is_no_result() {
        assert_eq!(parse_postcode(br#"{"postcode": ""}"#), Err(LookupFailure::NoResult));
        assert_eq!(parse_postcode(br#"{"city": "Anaa"}"#), Err(LookupFailure::NoResult));
    }

    #[test]
    fn test_non_string_postcode_is_malformed() {
        assert!(matches!(
            parse_postcode(br#"{"postcode": 11430}"#),
            Err(LookupFailure::Malformed(_))
        ));
    }
}
