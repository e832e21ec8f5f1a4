use crate::pipeline::assemble::Table;
use crate::pipeline::report::StageReport;
use crate::types::ForwardGeocoder;
use tracing::debug;

pub const STAGE_NAME: &str = "forward_geocoding";

/// Search the geocoder by name for every row the detail pages left without
/// coordinates. Failures leave the row untouched.
pub async fn fill_missing_coordinates(
    table: &mut Table,
    geocoder: &dyn ForwardGeocoder,
) -> StageReport {
    let mut report = StageReport::new(STAGE_NAME);
    let missing = table.missing_indices().to_vec();

    for index in missing {
        let row = &mut table.rows_mut()[index];
        let outcome = geocoder.geocode(&row.name).await;
        match outcome {
            Ok(coords) => {
                row.coordinates = Some(coords);
                report.record_success();
            }
            Err(failure) => {
                debug!(
                    service = geocoder.service_name(),
                    airport = %row.name,
                    "No coordinates from geocoder: {}",
                    failure
                );
                report.record_miss(failure.category());
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupFailure;
    use crate::pipeline::assemble::assemble;
    use crate::types::{CoordinateLookup, Coordinates, MissReason};
    use std::sync::Mutex;

    struct ScriptedGeocoder {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ForwardGeocoder for ScriptedGeocoder {
        fn service_name(&self) -> &'static str {
            "scripted"
        }

        async fn geocode(&self, query: &str) -> Result<Coordinates, LookupFailure> {
            self.queries.lock().unwrap().push(query.to_string());
            match query {
                "Ghost Airport" => Ok(Coordinates::new(10.5, -20.25)),
                "Broken Airport" => Err(LookupFailure::Malformed("eof".into())),
                _ => Err(LookupFailure::NoResult),
            }
        }
    }

    #[tokio::test]
    async fn test_only_missing_rows_are_queried_and_filled() {
        let lookups = vec![
            CoordinateLookup::Found(Coordinates::new(1.0, 1.0)),
            CoordinateLookup::Missing(MissReason::NotFound(404)),
            CoordinateLookup::Missing(MissReason::NoGeoElement),
            CoordinateLookup::Missing(MissReason::NoGeoElement),
        ];
        let names = vec![
            "Real Airport".to_string(),
            "Ghost Airport".to_string(),
            "Broken Airport".to_string(),
            "Lost Airport".to_string(),
        ];
        let mut table = assemble(names, &lookups).unwrap();
        let geocoder = ScriptedGeocoder {
            queries: Mutex::new(Vec::new()),
        };

        let report = fill_missing_coordinates(&mut table, &geocoder).await;

        assert_eq!(
            *geocoder.queries.lock().unwrap(),
            vec!["Ghost Airport", "Broken Airport", "Lost Airport"]
        );
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.missed_with("malformed"), 1);
        assert_eq!(report.missed_with("no_result"), 1);

        let rows = table.rows();
        assert_eq!(rows[0].coordinates, Some(Coordinates::new(1.0, 1.0)));
        assert_eq!(rows[1].coordinates, Some(Coordinates::new(10.5, -20.25)));
        assert_eq!(rows[2].coordinates, None);
        assert_eq!(rows[3].coordinates, None);
        // The missing set still records what the detail pages could not provide.
        assert_eq!(table.missing_indices(), &[1, 2, 3]);
    }
}
