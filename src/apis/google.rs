use crate::app::ports::HttpClientPort;
use crate::error::LookupFailure;
use crate::types::{Coordinates, ForwardGeocoder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const SERVICE_NAME: &str = "google_geocoding";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Google Geocoding API, searched by free-text address.
pub struct GoogleGeocoder {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, query: &str) -> String {
        format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        )
    }
}

/// First result's location from a geocode response body.
fn parse_location(body: &[u8]) -> Result<Coordinates, LookupFailure> {
    let response: GeocodeResponse = serde_json::from_slice(body)?;
    let first = response.results.first().ok_or(LookupFailure::NoResult)?;
    Ok(Coordinates::new(
        first.geometry.location.lat,
        first.geometry.location.lng,
    ))
}

#[async_trait::async_trait]
impl ForwardGeocoder for GoogleGeocoder {
    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    async fn geocode(&self, query: &str) -> Result<Coordinates, LookupFailure> {
        let response = self
            .http
            .get(&self.url(query))
            .await
            .map_err(LookupFailure::Transport)?;
        if !response.is_success() {
            return Err(LookupFailure::Status(response.status));
        }
        let coords = parse_location(&response.bytes)?;
        debug!("Geocoded '{}' to {}", query, coords);
        Ok(coords)
    }
}
