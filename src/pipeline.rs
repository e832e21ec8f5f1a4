use crate::apis::bigdatacloud::BigDataCloudClient;
use crate::apis::google::GoogleGeocoder;
use crate::apis::locationiq::LocationIqClient;
use crate::apis::wikipedia::WikipediaClient;
use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::error::Result;
use crate::types::{CoordinateLookup, ReverseGeocoder};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub mod assemble;
pub mod export;
pub mod fallback;
pub mod normalize;
pub mod postal;
pub mod report;

use report::StageReport;

pub const DETAIL_STAGE: &str = "detail_pages";

/// Result of a complete pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    pub raw_names: usize,
    pub airports: usize,
    pub coordinates_from_pages: usize,
    pub coordinates_from_geocoding: usize,
    pub missing_coordinates: usize,
    pub postal_codes_resolved: usize,
    /// Rows never sent to a postal code service because they have no coordinates.
    pub skipped_without_coordinates: usize,
    pub missing_postal_codes: usize,
    pub reports: Vec<StageReport>,
    pub output_file: PathBuf,
}

pub struct Pipeline {
    config: Config,
    http: Arc<dyn HttpClientPort>,
}

fn coordinate_report(lookups: &[CoordinateLookup]) -> StageReport {
    let mut report = StageReport::new(DETAIL_STAGE);
    for lookup in lookups {
        match lookup {
            CoordinateLookup::Found(_) => report.record_success(),
            CoordinateLookup::Missing(reason) => report.record_miss(reason.category()),
        }
    }
    report
}

impl Pipeline {
    pub fn new(config: Config, http: Arc<dyn HttpClientPort>) -> Self {
        Self { config, http }
    }

    /// Fetch, clean, enrich and export every airport listed under `partitions`.
    #[instrument(skip(self))]
    pub async fn run(&self, partitions: &[String]) -> Result<PipelineResult> {
        let started = Instant::now();
        let wikipedia = WikipediaClient::new(self.http.clone(), self.config.wikipedia.clone());
        let mut reports = Vec::new();

        // Step 1: listing pages
        info!("📡 Fetching {} listing pages...", partitions.len());
        let raw_names = wikipedia.fetch_all_listings(partitions).await?;

        // Step 2: clean names
        let names = normalize::normalize_names(&raw_names);
        info!("🔧 {} airport names after cleaning", names.len());

        // Step 3: coordinates from each airport's own page
        info!("📡 Fetching {} detail pages...", names.len());
        let lookups = wikipedia.fetch_all_coordinates(&names).await?;
        let detail_report = coordinate_report(&lookups);
        detail_report.emit();
        let coordinates_from_pages = detail_report.succeeded;
        reports.push(detail_report);

        // Step 4: one row per airport
        let mut table = assemble::assemble(names, &lookups)?;

        // Step 5: search the rest by name
        let geo = &self.config.geocoding;
        let mut coordinates_from_geocoding = 0;
        match geo.google_api_key.as_deref() {
            Some(key) if !table.missing_indices().is_empty() => {
                info!(
                    "🔎 Geocoding {} airports without coordinates...",
                    table.missing_indices().len()
                );
                let geocoder = GoogleGeocoder::new(self.http.clone(), &geo.google_base_url, key);
                let report = fallback::fill_missing_coordinates(&mut table, &geocoder).await;
                report.emit();
                coordinates_from_geocoding = report.succeeded;
                reports.push(report);
            }
            Some(_) => {}
            None => warn!(
                "No Google geocoding API key configured; {} airports stay without coordinates",
                table.missing_indices().len()
            ),
        }

        // Step 6: postal codes
        info!("📮 Resolving postal codes...");
        let primary = BigDataCloudClient::new(self.http.clone(), &geo.bigdatacloud_base_url);
        let secondary = match geo.locationiq_api_key.as_deref() {
            Some(key) => Some(LocationIqClient::new(
                self.http.clone(),
                &geo.locationiq_base_url,
                key,
            )),
            None => {
                warn!("No LocationIQ API key configured; skipping the secondary postal code lookup");
                None
            }
        };
        let postal_report = postal::resolve_postal_codes(
            &mut table,
            &primary,
            secondary.as_ref().map(|s| s as &dyn ReverseGeocoder),
        )
        .await;
        postal_report.primary.emit();
        reports.push(postal_report.primary.clone());
        if let Some(report) = &postal_report.secondary {
            report.emit();
            reports.push(report.clone());
        }

        // Step 7: export
        let output_file = self.config.output.path.clone();
        export::write_table(&table, &output_file)?;

        let result = PipelineResult {
            raw_names: raw_names.len(),
            airports: table.len(),
            coordinates_from_pages,
            coordinates_from_geocoding,
            missing_coordinates: table.count_without_coordinates(),
            postal_codes_resolved: postal_report.resolved,
            skipped_without_coordinates: postal_report.skipped_without_coordinates,
            missing_postal_codes: table.count_without_postal_code(),
            reports,
            output_file,
        };
        info!(
            airports = result.airports,
            missing_coordinates = result.missing_coordinates,
            missing_postal_codes = result.missing_postal_codes,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "✅ Pipeline finished"
        );
        Ok(result)
    }
}
