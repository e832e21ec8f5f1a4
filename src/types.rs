use crate::constants::PLACEHOLDER;
use crate::error::{LookupFailure, Result, ScraperError};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse the `"lat;long"` text carried by a detail page's geo element.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split(';');
        let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => (lat.trim(), lon.trim()),
            _ => return Err(ScraperError::InvalidCoordinates(text.to_string())),
        };
        let latitude = lat
            .parse::<f64>()
            .map_err(|_| ScraperError::InvalidCoordinates(text.to_string()))?;
        let longitude = lon
            .parse::<f64>()
            .map_err(|_| ScraperError::InvalidCoordinates(text.to_string()))?;
        // f64 parsing also accepts NaN and infinities.
        let in_range = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(ScraperError::InvalidCoordinates(text.to_string()));
        }
        Ok(Self::new(latitude, longitude))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.latitude, self.longitude)
    }
}

/// Why a detail page gave no coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum MissReason {
    /// The page answered 404 or 400.
    NotFound(u16),
    NoGeoElement,
    Unparseable(String),
}

impl MissReason {
    pub fn category(&self) -> &'static str {
        match self {
            MissReason::NotFound(_) => "not_found",
            MissReason::NoGeoElement => "no_geo_element",
            MissReason::Unparseable(_) => "unparseable",
        }
    }
}

/// Outcome of the detail-page lookup for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateLookup {
    Found(Coordinates),
    Missing(MissReason),
}

impl CoordinateLookup {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            CoordinateLookup::Found(c) => Some(*c),
            CoordinateLookup::Missing(_) => None,
        }
    }
}

/// One airport in the output table.
///
/// Coordinates are a single optional pair so a row never holds half a position.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub postal_code: Option<String>,
}

impl TableRow {
    pub fn new(name: impl Into<String>, coordinates: Option<Coordinates>) -> Self {
        Self {
            name: name.into(),
            coordinates,
            postal_code: None,
        }
    }

    pub fn lat_field(&self) -> String {
        self.coordinates
            .map(|c| c.latitude.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn long_field(&self) -> String {
        self.coordinates
            .map(|c| c.longitude.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn postal_code_field(&self) -> &str {
        self.postal_code.as_deref().unwrap_or(PLACEHOLDER)
    }
}

/// Address-to-coordinate lookup used when a detail page has no position.
#[async_trait::async_trait]
pub trait ForwardGeocoder: Send + Sync {
    fn service_name(&self) -> &'static str;

    async fn geocode(&self, query: &str) -> std::result::Result<Coordinates, LookupFailure>;
}

/// Coordinate-to-postal-code lookup.
#[async_trait::async_trait]
pub trait ReverseGeocoder: Send + Sync {
    fn service_name(&self) -> &'static str;

    async fn postal_code(
        &self,
        coordinates: Coordinates,
    ) -> std::result::Result<String, LookupFailure>;
}
