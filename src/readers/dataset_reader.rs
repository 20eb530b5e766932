use crate::error::{QueryError, Result};
use crate::models::{DistrictDataset, DistrictRecord};
use crate::readers::require_column;
use crate::utils::constants::{DISTRICT_COLUMN, LAT_COLUMNS, LON_COLUMNS, MISSING_MARKERS};
use crate::utils::coordinates::parse_coordinate;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Loads a district dataset from delimited text.
///
/// The header must name a district column plus latitude and longitude
/// columns; every other column is a metal column, kept in file order.
pub struct DatasetReader {
    delimiter: u8,
}

impl DatasetReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn read_dataset(&self, path: &Path) -> Result<DistrictDataset> {
        let file = File::open(path)?;
        let dataset = self.read_from(file)?;

        info!(
            "Loaded {} districts with {} metal columns from {}",
            dataset.len(),
            dataset.metal_columns().len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn read_from<R: Read>(&self, input: R) -> Result<DistrictDataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(input);
        let headers = reader.headers()?.clone();

        let district_col = require_column(&headers, &[DISTRICT_COLUMN])?;
        let lat_col = require_column(&headers, LAT_COLUMNS)?;
        let lon_col = require_column(&headers, LON_COLUMNS)?;

        let metal_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| ![district_col, lat_col, lon_col].contains(i))
            .map(|(i, name)| (i, name.to_string()))
            .collect();
        debug!(
            "Metal columns: {:?}",
            metal_cols.iter().map(|(_, n)| n).collect::<Vec<_>>()
        );

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let field = |col: usize| row.get(col).unwrap_or_default();

            let latitude = parse_coordinate(field(lat_col))
                .map_err(|e| QueryError::InvalidFormat(format!("Line {}: {}", line, e)))?;
            let longitude = parse_coordinate(field(lon_col))
                .map_err(|e| QueryError::InvalidFormat(format!("Line {}: {}", line, e)))?;

            let readings = metal_cols
                .iter()
                .map(|(col, name)| {
                    parse_reading(field(*col)).ok_or_else(|| {
                        QueryError::InvalidFormat(format!(
                            "Line {}: invalid {} reading '{}'",
                            line,
                            name,
                            field(*col)
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            records.push(DistrictRecord::new(
                field(district_col),
                latitude,
                longitude,
                readings,
            ));
        }

        let metal_columns = metal_cols.into_iter().map(|(_, name)| name).collect();
        DistrictDataset::new(metal_columns, records)
    }
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A finite concentration, `NaN` for a missing-value marker, `None` otherwise.
fn parse_reading(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if MISSING_MARKERS
        .iter()
        .any(|m| trimmed.eq_ignore_ascii_case(m))
    {
        return Some(f64::NAN);
    }

    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading("5.25"), Some(5.25));
        assert_eq!(parse_reading(" 0 "), Some(0.0));
        assert!(parse_reading("").unwrap().is_nan());
        assert!(parse_reading("NA").unwrap().is_nan());
        assert!(parse_reading("null").unwrap().is_nan());
        assert_eq!(parse_reading("inf"), None);
        assert_eq!(parse_reading("high"), None);
    }

    #[test]
    fn test_read_dataset_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "district,lat,lon,lead,arsenic")?;
        writeln!(temp_file, "A,18.52,73.85,5,2")?;
        writeln!(temp_file, "B,18.53,73.86,7,4")?;
        writeln!(temp_file, "C,19.00,74.00,1,1")?;

        let dataset = DatasetReader::new().read_dataset(temp_file.path())?;

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.metal_columns(), ["lead", "arsenic"]);
        assert_eq!(dataset.records()[1].district, "B");
        assert_eq!(dataset.records()[1].readings, vec![7.0, 4.0]);

        Ok(())
    }

    #[test]
    fn test_column_aliases_and_order() -> Result<()> {
        let csv = "Mercury; Latitude; District; Longitude; Lead\n\
                   0.1; 18:31:12; Pune; 73:51:00; NA\n";

        let dataset = DatasetReader::with_delimiter(b';').read_from(csv.as_bytes())?;

        assert_eq!(dataset.metal_columns(), ["Mercury", "Lead"]);
        let record = &dataset.records()[0];
        assert_eq!(record.district, "Pune");
        assert!((record.latitude - 18.52).abs() < 1e-9);
        assert!((record.longitude - 73.85).abs() < 1e-9);
        assert_eq!(record.reading(0), Some(0.1));
        assert_eq!(record.reading(1), None);

        Ok(())
    }

    #[test]
    fn test_header_only_is_empty_dataset() -> Result<()> {
        let dataset = DatasetReader::new().read_from("district,lat,lon,lead\n".as_bytes())?;
        assert!(dataset.is_empty());
        assert_eq!(dataset.metal_columns(), ["lead"]);
        Ok(())
    }

    #[test]
    fn test_read_errors() {
        let reader = DatasetReader::new();

        let no_lat = "district,lon,lead\nA,73.85,5\n";
        assert!(matches!(
            reader.read_from(no_lat.as_bytes()),
            Err(QueryError::InvalidFormat(msg)) if msg.contains("'lat'")
        ));

        let bad_reading = "district,lat,lon,lead\nA,18.52,73.85,5\nB,18.53,73.86,lots\n";
        assert!(matches!(
            reader.read_from(bad_reading.as_bytes()),
            Err(QueryError::InvalidFormat(msg)) if msg.starts_with("Line 3") && msg.contains("lead")
        ));

        let off_globe = "district,lat,lon,lead\nA,98.52,73.85,5\n";
        assert!(reader.read_from(off_globe.as_bytes()).is_err());

        let ragged = "district,lat,lon,lead\nA,18.52,73.85\n";
        assert!(matches!(
            reader.read_from(ragged.as_bytes()),
            Err(QueryError::Csv(_))
        ));
    }
}
