// Source and service endpoints used when no override is configured.

// Reference source
pub const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org/wiki";
pub const LISTING_PAGE_PREFIX: &str = "List_of_airports_by_IATA_code:_";

// Listing table layout
pub const LISTING_TABLE_CLASS: &str = "wikitable sortable";
/// The W page wraps its table in a collapsible toggle and carries an extra class.
pub const COLLAPSIBLE_PARTITION: &str = "W";
pub const COLLAPSIBLE_TABLE_CLASS: &str = "wikitable sortable mw-collapsible";
/// Zero-based position of the airport-name cell in each listing row.
pub const AIRPORT_NAME_COLUMN: usize = 2;

// Geocoding services
pub const GOOGLE_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com";
pub const BIGDATACLOUD_BASE_URL: &str = "https://api.bigdatacloud.net";
pub const LOCATIONIQ_BASE_URL: &str = "https://us1.locationiq.com";

// Environment overrides
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_GEOCODING_API_KEY";
pub const LOCATIONIQ_API_KEY_ENV: &str = "LOCATIONIQ_API_KEY";
pub const OUTPUT_PATH_ENV: &str = "AIRPORTS_OUTPUT_PATH";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_OUTPUT_PATH: &str = "output/airport_postal_codes.csv";
pub const DEFAULT_USER_AGENT: &str = "airport_postcodes/0.1 (airport postal code collector)";

/// Text written in place of a missing coordinate or postal code.
pub const PLACEHOLDER: &str = "none";

/// All listing partitions, one page per letter.
pub fn all_partitions() -> Vec<String> {
    ('A'..='Z').map(|c| c.to_string()).collect()
}
