use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::config::WikipediaConfig;
use crate::error::{Result, ScraperError};
use crate::types::{CoordinateLookup, Coordinates, MissReason};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static GEO_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.geo").unwrap());

/// Listing index page for one partition key.
pub fn listing_url(base_url: &str, prefix: &str, partition: &str) -> String {
    format!("{}/{}{}", base_url.trim_end_matches('/'), prefix, partition)
}

/// Article address guessed from a display name: spaces become underscores and
/// each path segment is percent-encoded.
pub fn detail_url(base_url: &str, name: &str) -> String {
    let slug = name.replace(' ', "_");
    let encoded = slug
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", base_url.trim_end_matches('/'), encoded)
}

/// Cell text at `column` for every row of the first table whose class
/// attribute is exactly `table_class`. `None` when no such table exists.
pub fn extract_listing_names(html: &str, table_class: &str, column: usize) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let table = document.select(&TABLE_SELECTOR).find(|t| {
        t.value()
            .attr("class")
            .map(|c| c.trim() == table_class)
            .unwrap_or(false)
    })?;

    let names = table
        .select(&ROW_SELECTOR)
        .filter_map(|row| {
            row.select(&CELL_SELECTOR)
                .nth(column)
                .map(|cell| cell.text().collect::<String>())
        })
        .collect();
    Some(names)
}

/// Text of the inline geo element on a detail page.
pub fn extract_geo(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&GEO_SELECTOR)
        .next()
        .map(|span| span.text().collect::<String>())
}

pub struct WikipediaClient {
    http: Arc<dyn HttpClientPort>,
    config: WikipediaConfig,
}

impl WikipediaClient {
    pub fn new(http: Arc<dyn HttpClientPort>, config: WikipediaConfig) -> Self {
        Self { http, config }
    }

    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        self.http.get(url).await.map_err(|reason| ScraperError::Fetch {
            url: url.to_string(),
            reason,
        })
    }

    /// Raw name cells of one listing page. Any failure here is fatal.
    #[instrument(skip(self))]
    pub async fn fetch_listing(&self, partition: &str) -> Result<Vec<String>> {
        let url = listing_url(&self.config.base_url, &self.config.listing_prefix, partition);
        let response = self.get(&url).await?;
        if !response.is_success() {
            return Err(ScraperError::Status {
                url,
                status: response.status,
            });
        }

        let table_class = self.config.table_class_for(partition);
        let names = extract_listing_names(&response.text(), table_class, self.config.name_column)
            .ok_or_else(|| ScraperError::MissingTable {
                partition: partition.to_string(),
                class: table_class.to_string(),
            })?;

        debug!("Partition {} yielded {} raw name cells", partition, names.len());
        Ok(names)
    }

    pub async fn fetch_all_listings(&self, partitions: &[String]) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for partition in partitions {
            names.extend(self.fetch_listing(partition).await?);
        }
        info!(
            "Fetched {} raw name cells from {} listing pages",
            names.len(),
            partitions.len()
        );
        Ok(names)
    }

    /// Coordinates from the airport's own article.
    ///
    /// 404 and 400 mean the guessed article does not exist and are recorded as
    /// missing; any other failure aborts the run.
    #[instrument(skip(self))]
    pub async fn fetch_coordinates(&self, name: &str) -> Result<CoordinateLookup> {
        let url = detail_url(&self.config.base_url, name);
        let response = self.get(&url).await?;

        match response.status {
            404 | 400 => {
                debug!("No article at {} (status {})", url, response.status);
                return Ok(CoordinateLookup::Missing(MissReason::NotFound(response.status)));
            }
            _ if !response.is_success() => {
                return Err(ScraperError::Status {
                    url,
                    status: response.status,
                });
            }
            _ => {}
        }

        let lookup = match extract_geo(&response.text()) {
            None => CoordinateLookup::Missing(MissReason::NoGeoElement),
            Some(text) => match Coordinates::parse(&text) {
                Ok(coords) => CoordinateLookup::Found(coords),
                Err(_) => {
                    warn!("Unparseable geo text '{}' at {}", text, url);
                    CoordinateLookup::Missing(MissReason::Unparseable(text))
                }
            },
        };
        Ok(lookup)
    }

    /// One lookup per name, in the same order.
    pub async fn fetch_all_coordinates(&self, names: &[String]) -> Result<Vec<CoordinateLookup>> {
        let mut lookups = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            lookups.push(self.fetch_coordinates(name).await?);
            if (i + 1) % 100 == 0 {
                debug!("Fetched {}/{} detail pages", i + 1, names.len());
            }
        }
        Ok(lookups)
    }
}
