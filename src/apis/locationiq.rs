use crate::app::ports::HttpClientPort;
use crate::error::LookupFailure;
use crate::types::{Coordinates, ReverseGeocoder};
use serde::Deserialize;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "locationiq";

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    postcode: Option<String>,
}

pub struct LocationIqClient {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    api_key: String,
}

impl LocationIqClient {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/v1/reverse.php?key={}&lat={}&lon={}&format=json",
            self.base_url,
            urlencoding::encode(&self.api_key),
            coordinates.latitude,
            coordinates.longitude
        )
    }
}

fn parse_postcode(body: &[u8]) -> Result<String, LookupFailure> {
    let response: ReverseResponse = serde_json::from_slice(body)?;
    response
        .address
        .and_then(|a| a.postcode)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or(LookupFailure::NoResult)
}

#[async_trait::async_trait]
impl ReverseGeocoder for LocationIqClient {
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
