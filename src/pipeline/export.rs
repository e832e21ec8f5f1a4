use crate::error::Result;
use crate::pipeline::assemble::Table;
use crate::types::TableRow;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

pub const COLUMNS: [&str; 4] = ["name", "lat", "long", "postalcode"];

/// One line of the exported file, placeholders already rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub name: String,
    pub lat: String,
    pub long: String,
    pub postalcode: String,
}

impl From<&TableRow> for ExportRecord {
    fn from(row: &TableRow) -> Self {
        Self {
            name: row.name.clone(),
            lat: row.lat_field(),
            long: row.long_field(),
            postalcode: row.postal_code_field().to_string(),
        }
    }
}

/// Write the table as CSV with a header row and no index column.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(COLUMNS)?;
    for row in table.rows() {
        writer.serialize(ExportRecord::from(row))?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

pub fn read_table(path: &Path) -> Result<Vec<ExportRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ExportRecord>, csv::Error>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::assemble::assemble;
    use crate::types::{CoordinateLookup, Coordinates, MissReason};
    use tempfile::tempdir;

    fn sample_table() -> Table {
        let lookups = vec![
            CoordinateLookup::Found(Coordinates::new(40.6413, -73.7781)),
            CoordinateLookup::Missing(MissReason::NotFound(404)),
            CoordinateLookup::Found(Coordinates::new(-33.9399, 151.1753)),
        ];
        let names = vec![
            "John F. Kennedy International Airport".to_string(),
            "Ghost Strip".to_string(),
            "Sydney Airport, Mascot".to_string(),
        ];
        let mut table = assemble(names, &lookups).unwrap();
        table.rows_mut()[0].postal_code = Some("11430".to_string());
        table
    }

    #[test]
    fn test_export_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("airports.csv");
        let table = sample_table();

        write_table(&table, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMNS.to_vec());

        let records = read_table(&path).unwrap();
        assert_eq!(records.len(), table.len());
        assert_eq!(
            records[0],
            ExportRecord {
                name: "John F. Kennedy International Airport".into(),
                lat: "40.6413".into(),
                long: "-73.7781".into(),
                postalcode: "11430".into(),
            }
        );
        assert_eq!(records[1].lat, "none");
        assert_eq!(records[1].long, "none");
        assert_eq!(records[1].postalcode, "none");
        // Commas in names survive quoting.
        assert_eq!(records[2].name, "Sydney Airport, Mascot");
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_table(&Table::default(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "name,lat,long,postalcode");
        assert!(read_table(&path).unwrap().is_empty());
    }
}
