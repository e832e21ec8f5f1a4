use thiserror::Error;

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTTP request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("No table with class '{class}' found on listing page for partition {partition}")]
    MissingTable { partition: String, class: String },

    #[error("Cannot assemble table: {names} names but {lookups} coordinate lookups")]
    Misaligned { names: usize, lookups: usize },

    #[error("Invalid coordinate string: '{0}'")]
    InvalidCoordinates(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;

/// Why a single enrichment lookup produced nothing. Never fatal; counted per stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no result")]
    NoResult,
}

impl LookupFailure {
    /// Short label used for log fields and metric labels.
    pub fn category(&self) -> &'static str {
        match self {
            LookupFailure::Transport(_) => "transport",
            LookupFailure::Status(_) => "status",
            LookupFailure::Malformed(_) => "malformed",
            LookupFailure::NoResult => "no_result",
        }
    }
}

impl From<serde_json::Error> for LookupFailure {
    fn from(e: serde_json::Error) -> Self {
        LookupFailure::Malformed(e.to_string())
    }
}
