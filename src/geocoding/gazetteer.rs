use crate::error::{QueryError, Result};
use crate::geocoding::{GeocodedLocation, Geocoder};
use crate::models::GeoPoint;
use crate::readers::require_column;
use crate::utils::constants::{GAZETTEER_NAME_COLUMNS, LAT_COLUMNS, LON_COLUMNS};
use crate::utils::coordinates::parse_coordinate;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Offline geocoder backed by a fixed table of place names.
///
/// Lookups ignore case and collapse runs of whitespace. Inserting a name
/// that already exists replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    places: HashMap<String, GeocodedLocation>,
}

impl GazetteerGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, latitude: f64, longitude: f64) -> Result<Self> {
        self.insert(name, GeoPoint::new(latitude, longitude)?);
        Ok(self)
    }

    pub fn insert(&mut self, name: &str, point: GeoPoint) {
        self.places.insert(
            normalize(name),
            GeocodedLocation {
                point,
                display_name: Some(name.trim().to_string()),
            },
        );
    }

    /// Load `name,lat,lon` rows from a CSV file with a header.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        let headers = reader.headers()?.clone();

        let name_col = require_column(&headers, GAZETTEER_NAME_COLUMNS)?;
        let lat_col = require_column(&headers, LAT_COLUMNS)?;
        let lon_col = require_column(&headers, LON_COLUMNS)?;

        let mut gazetteer = Self::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let field = |col: usize| row.get(col).unwrap_or_default();

            let name = field(name_col);
            if name.is_empty() {
                return Err(QueryError::InvalidFormat(format!(
                    "Line {}: gazetteer entry has no name",
                    line
                )));
            }

            let point = parse_coordinate(field(lat_col))
                .and_then(|lat| GeoPoint::new(lat, parse_coordinate(field(lon_col))?))
                .map_err(|e| QueryError::InvalidFormat(format!("Line {}: {}", line, e)))?;
            gazetteer.insert(name, point);
        }

        info!(
            "Loaded {} gazetteer places from {}",
            gazetteer.len(),
            path.display()
        );
        Ok(gazetteer)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Geocoder for GazetteerGeocoder {
    fn resolve(&self, text: &str) -> Result<Option<GeocodedLocation>> {
        Ok(self.places.get(&normalize(text)).cloned())
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_case_insensitive_lookup() {
        let gazetteer = GazetteerGeocoder::new()
            .with_place("Pune", 18.5204, 73.8567)
            .unwrap();

        let found = gazetteer.resolve("  pUNE ").unwrap().unwrap();
        assert_eq!(found.point.latitude, 18.5204);
        assert_eq!(found.display_name.as_deref(), Some("Pune"));
        assert!(gazetteer.resolve("Mumbai").unwrap().is_none());
    }

    #[test]
    fn test_later_entry_replaces_earlier() {
        let gazetteer = GazetteerGeocoder::new()
            .with_place("Aurangabad", 19.88, 75.34)
            .unwrap()
            .with_place("aurangabad", 24.75, 84.37)
            .unwrap();

        assert_eq!(gazetteer.len(), 1);
        let found = gazetteer.resolve("Aurangabad").unwrap().unwrap();
        assert_eq!(found.point.latitude, 24.75);
    }

    #[test]
    fn test_rejects_invalid_place() {
        assert!(GazetteerGeocoder::new().with_place("Bad", 91.0, 0.0).is_err());
    }

    #[test]
    fn test_from_csv() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Name, Latitude, Longitude")?;
        writeln!(file, "Pune, 18.5204, 73.8567")?;
        writeln!(file, "Shirur Village, 18:49:30, 74:22:30")?;

        let gazetteer = GazetteerGeocoder::from_csv(file.path())?;
        assert_eq!(gazetteer.len(), 2);

        let village = gazetteer.resolve("shirur   village")?.unwrap();
        assert!((village.point.latitude - 18.825).abs() < 1e-9);
        assert!((village.point.longitude - 74.375).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_from_csv_errors() -> Result<()> {
        let mut missing_column = NamedTempFile::new()?;
        writeln!(missing_column, "name,lat")?;
        writeln!(missing_column, "Pune,18.5")?;
        assert!(GazetteerGeocoder::from_csv(missing_column.path()).is_err());

        let mut bad_value = NamedTempFile::new()?;
        writeln!(bad_value, "name,lat,lon")?;
        writeln!(bad_value, "Pune,north,73.8")?;
        assert!(matches!(
            GazetteerGeocoder::from_csv(bad_value.path()),
            Err(QueryError::InvalidFormat(msg)) if msg.starts_with("Line 2")
        ));

        Ok(())
    }
}
