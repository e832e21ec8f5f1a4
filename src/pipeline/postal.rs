use crate::pipeline::assemble::Table;
use crate::pipeline::report::StageReport;
use crate::types::{Coordinates, ReverseGeocoder};
use tracing::{debug, info};

/// Counts from both reverse-geocoding passes.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalReport {
    pub primary: StageReport,
    pub secondary: Option<StageReport>,
    /// Rows never queried because they have no coordinates.
    pub skipped_without_coordinates: usize,
    pub resolved: usize,
}

/// First-source priority: the secondary answer only counts where the primary had none.
pub fn merge_postal_codes(primary: Option<String>, secondary: Option<String>) -> Option<String> {
    primary.or(secondary)
}

async fn lookup(
    geocoder: &dyn ReverseGeocoder,
    report: &mut StageReport,
    name: &str,
    coordinates: Coordinates,
) -> Option<String> {
    match geocoder.postal_code(coordinates).await {
        Ok(code) => {
            report.record_success();
            Some(code)
        }
        Err(failure) => {
            debug!(
                service = geocoder.service_name(),
                airport = %name,
                "No postal code: {}",
                failure
            );
            report.record_miss(failure.category());
            None
        }
    }
}

/// Resolve postal codes for every row with coordinates.
///
/// The primary service is asked for every such row; the secondary only for
/// rows the primary left empty. Rows without coordinates keep the placeholder.
pub async fn resolve_postal_codes(
    table: &mut Table,
    primary: &dyn ReverseGeocoder,
    secondary: Option<&dyn ReverseGeocoder>,
) -> PostalReport {
    let mut primary_report = StageReport::new(primary.service_name());
    let mut primary_codes: Vec<Option<String>> = Vec::with_capacity(table.len());
    let mut skipped = 0;

    for row in table.rows() {
        let code = match row.coordinates {
            Some(coords) => lookup(primary, &mut primary_report, &row.name, coords).await,
            None => {
                skipped += 1;
                None
            }
        };
        primary_codes.push(code);
    }
    info!(
        "{} resolved {} of {} postal codes",
        primary.service_name(),
        primary_report.succeeded,
        primary_report.attempted()
    );

    let mut secondary_codes: Vec<Option<String>> = vec![None; table.len()];
    let secondary_report = match secondary {
        Some(service) => {
            let mut report = StageReport::new(service.service_name());
            for (i, row) in table.rows().iter().enumerate() {
                if primary_codes[i].is_some() {
                    continue;
                }
                if let Some(coords) = row.coordinates {
                    secondary_codes[i] = lookup(service, &mut report, &row.name, coords).await;
                }
            }
            info!(
                "{} filled {} of {} remaining postal codes",
                service.service_name(),
                report.succeeded,
                report.attempted()
            );
            Some(report)
        }
        None => None,
    };

    let mut resolved = 0;
    for ((row, a), b) in table
        .rows_mut()
        .iter_mut()
        .zip(primary_codes)
        .zip(secondary_codes)
    {
        row.postal_code = merge_postal_codes(a, b);
        if row.postal_code.is_some() {
            resolved += 1;
        }
    }

    PostalReport {
        primary: primary_report,
        secondary: secondary_report,
        skipped_without_coordinates: skipped,
        resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupFailure;
    use crate::pipeline::assemble::assemble;
    use crate::types::{CoordinateLookup, MissReason};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed latitude -> postcode table and records every query.
    struct FixtureGeocoder {
        name: &'static str,
        answers: HashMap<String, String>,
        queried: Mutex<Vec<f64>>,
    }

    impl FixtureGeocoder {
        fn new(name: &'static str, answers: &[(f64, &str)]) -> Self {
            Self {
                name,
                answers: answers
                    .iter()
                    .map(|(lat, code)| (lat.to_string(), code.to_string()))
                    .collect(),
                queried: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ReverseGeocoder for FixtureGeocoder {
        fn service_name(&self) -> &'static str {
            self.name
        }

        async fn postal_code(&self, coordinates: Coordinates) -> Result<String, LookupFailure> {
            self.queried.lock().unwrap().push(coordinates.latitude);
            self.answers
                .get(&coordinates.latitude.to_string())
                .cloned()
                .ok_or(LookupFailure::NoResult)
        }
    }

    fn table() -> Table {
        let lookups = vec![
            CoordinateLookup::Found(Coordinates::new(1.0, 0.0)),
            CoordinateLookup::Found(Coordinates::new(2.0, 0.0)),
            CoordinateLookup::Missing(MissReason::NotFound(404)),
            CoordinateLookup::Found(Coordinates::new(3.0, 0.0)),
        ];
        let names = vec!["One".into(), "Two".into(), "Nowhere".into(), "Three".into()];
        assemble(names, &lookups).unwrap()
    }

    #[test]
    fn test_merge_prefers_primary() {
        assert_eq!(
            merge_postal_codes(Some("11430".into()), Some("10001".into())).as_deref(),
            Some("11430")
        );
        assert_eq!(
            merge_postal_codes(None, Some("10001".into())).as_deref(),
            Some("10001")
        );
        assert_eq!(merge_postal_codes(None, None), None);
    }

    #[tokio::test]
    async fn test_secondary_fills_gaps_left_by_primary() {
        let mut table = table();
        let primary = FixtureGeocoder::new("a", &[(1.0, "11430")]);
        let secondary = FixtureGeocoder::new("b", &[(1.0, "99999"), (2.0, "10001")]);

        let report = resolve_postal_codes(&mut table, &primary, Some(&secondary)).await;

        let codes: Vec<&str> = table.rows().iter().map(|r| r.postal_code_field()).collect();
        assert_eq!(codes, vec!["11430", "10001", "none", "none"]);

        // Row without coordinates is never sent anywhere.
        assert_eq!(*primary.queried.lock().unwrap(), vec![1.0, 2.0, 3.0]);
        // Secondary is only asked where the primary came back empty.
        assert_eq!(*secondary.queried.lock().unwrap(), vec![2.0, 3.0]);

        assert_eq!(report.skipped_without_coordinates, 1);
        assert_eq!(report.resolved, 2);
        assert_eq!(report.primary.succeeded, 1);
        assert_eq!(report.primary.missed_with("no_result"), 2);
        let secondary_report = report.secondary.unwrap();
        assert_eq!(secondary_report.succeeded, 1);
        assert_eq!(secondary_report.total_missed(), 1);
    }

    #[tokio::test]
    async fn test_without_secondary_primary_only() {
        let mut table = table();
        let primary = FixtureGeocoder::new("a", &[(3.0, "SW1A 1AA")]);

        let report = resolve_postal_codes(&mut table, &primary, None).await;

        assert!(report.secondary.is_none());
        assert_eq!(table.rows()[3].postal_code.as_deref(), Some("SW1A 1AA"));
        assert_eq!(table.count_without_postal_code(), 3);
    }
}
