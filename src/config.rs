use crate::constants;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wikipedia: WikipediaConfig,
    pub http: HttpConfig,
    pub geocoding: GeocodingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    pub base_url: String,
    pub listing_prefix: String,
    pub table_class: String,
    /// Partition key -> exact class attribute of the listing table on that page.
    pub table_class_overrides: HashMap<String, String>,
    pub name_column: usize,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        let mut table_class_overrides = HashMap::new();
        table_class_overrides.insert(
            constants::COLLAPSIBLE_PARTITION.to_string(),
            constants::COLLAPSIBLE_TABLE_CLASS.to_string(),
        );
        Self {
            base_url: constants::WIKIPEDIA_BASE_URL.to_string(),
            listing_prefix: constants::LISTING_PAGE_PREFIX.to_string(),
            table_class: constants::LISTING_TABLE_CLASS.to_string(),
            table_class_overrides,
            name_column: constants::AIRPORT_NAME_COLUMN,
        }
    }
}

impl WikipediaConfig {
    pub fn table_class_for(&self, partition: &str) -> &str {
        self.table_class_overrides
            .get(partition)
            .map(String::as_str)
            .unwrap_or(&self.table_class)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// No timeout unless set; the transport default applies.
    pub timeout_seconds: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub google_base_url: String,
    pub google_api_key: Option<String>,
    pub bigdatacloud_base_url: String,
    pub locationiq_base_url: String,
    pub locationiq_api_key: Option<String>,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            google_base_url: constants::GOOGLE_GEOCODING_BASE_URL.to_string(),
            google_api_key: None,
            bigdatacloud_base_url: constants::BIGDATACLOUD_BASE_URL.to_string(),
            locationiq_base_url: constants::LOCATIONIQ_BASE_URL.to_string(),
            locationiq_api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `config.toml` when it exists.
    ///
    /// An explicitly requested file must exist; the default file is optional.
    /// Environment variables are applied on top of whatever the file provides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply credentials and output path from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(constants::GOOGLE_API_KEY_ENV) {
            self.geocoding.google_api_key = Some(key);
        }
        if let Some(key) = non_empty(constants::LOCATIONIQ_API_KEY_ENV) {
            self.geocoding.locationiq_api_key = Some(key);
        }
        if let Some(path) = non_empty(constants::OUTPUT_PATH_ENV) {
            self.output.path = PathBuf::from(path);
        }
    }
}
