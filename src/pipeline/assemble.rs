use crate::error::{Result, ScraperError};
use crate::types::{CoordinateLookup, TableRow};

/// The working table threaded through enrichment and export.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<TableRow>,
    /// Rows whose detail page gave no coordinates, ascending.
    missing: Vec<usize>,
}

impl Table {
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [TableRow] {
        &mut self.rows
    }

    pub fn missing_indices(&self) -> &[usize] {
        &self.missing
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count_without_coordinates(&self) -> usize {
        self.rows.iter().filter(|r| r.coordinates.is_none()).count()
    }

    pub fn count_without_postal_code(&self) -> usize {
        self.rows.iter().filter(|r| r.postal_code.is_none()).count()
    }
}

/// Pair each name with its own lookup in one zipped pass.
pub fn assemble(names: Vec<String>, lookups: &[CoordinateLookup]) -> Result<Table> {
    if names.len() != lookups.len() {
        return Err(ScraperError::Misaligned {
            names: names.len(),
            lookups: lookups.len(),
        });
    }

    let mut missing = Vec::new();
    let rows = names
        .into_iter()
        .zip(lookups)
        .enumerate()
        .map(|(i, (name, lookup))| {
            if let CoordinateLookup::Missing(_) = lookup {
                missing.push(i);
            }
            TableRow::new(name, lookup.coordinates())
        })
        .collect();

    Ok(Table { rows, missing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coordinates, MissReason};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rows_follow_their_own_lookup() {
        let lookups = vec![
            CoordinateLookup::Found(Coordinates::parse("40.6413;-73.7781").unwrap()),
            CoordinateLookup::Missing(MissReason::NotFound(404)),
            CoordinateLookup::Missing(MissReason::NoGeoElement),
            CoordinateLookup::Found(Coordinates::new(51.47, -0.4543)),
        ];
        let table = assemble(names(&["JFK", "Ghost", "Stub", "Heathrow"]), &lookups).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.missing_indices(), &[1, 2]);

        let rows = table.rows();
        assert_eq!(rows[0].lat_field(), "40.6413");
        assert_eq!(rows[0].long_field(), "-73.7781");
        assert_eq!(rows[1].lat_field(), "none");
        assert_eq!(rows[1].long_field(), "none");
        assert_eq!(rows[3].name, "Heathrow");
        assert_eq!(rows[3].coordinates, Some(Coordinates::new(51.47, -0.4543)));
    }

    #[test]
    fn test_no_mixed_pairs() {
        let lookups = vec![
            CoordinateLookup::Missing(MissReason::Unparseable("x".into())),
            CoordinateLookup::Found(Coordinates::new(1.0, 2.0)),
        ];
        let table = assemble(names(&["A", "B"]), &lookups).unwrap();
        for row in table.rows() {
            let lat_missing = row.lat_field() == "none";
            let long_missing = row.long_field() == "none";
            assert_eq!(lat_missing, long_missing);
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let lookups = vec![CoordinateLookup::Found(Coordinates::new(1.0, 2.0))];
        let result = assemble(names(&["A", "B"]), &lookups);
        assert!(matches!(
            result,
            Err(ScraperError::Misaligned { names: 2, lookups: 1 })
        ));
    }
}
