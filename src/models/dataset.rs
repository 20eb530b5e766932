use crate::error::{QueryError, Result};
use crate::models::{DistrictRecord, GeoPoint};
use std::collections::HashSet;
use validator::Validate;

/// Ordered district rows sharing one metal-column schema.
///
/// Rows are kept exactly as supplied: duplicate district names and duplicate
/// coordinates are allowed and never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictDataset {
    metal_columns: Vec<String>,
    records: Vec<DistrictRecord>,
}

impl DistrictDataset {
    pub fn new(metal_columns: Vec<String>, records: Vec<DistrictRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(metal_columns.len());
        for column in &metal_columns {
            if column.trim().is_empty() {
                return Err(QueryError::InvalidFormat(
                    "Metal column names must not be empty".to_string(),
                ));
            }
            if !seen.insert(column.as_str()) {
                return Err(QueryError::InvalidFormat(format!(
                    "Duplicate metal column '{}'",
                    column
                )));
            }
        }

        for (row, record) in records.iter().enumerate() {
            if record.readings.len() != metal_columns.len() {
                return Err(QueryError::InvalidFormat(format!(
                    "Row {} ({}) has {} readings, expected {}",
                    row,
                    record.district,
                    record.readings.len(),
                    metal_columns.len()
                )));
            }
            record.validate()?;
            record.location()?;
        }

        Ok(Self {
            metal_columns,
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn metal_columns(&self) -> &[String] {
        &self.metal_columns
    }

    pub fn records(&self) -> &[DistrictRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Result<&DistrictRecord> {
        self.records.get(index).ok_or(QueryError::RowOutOfRange {
            index,
            rows: self.records.len(),
        })
    }

    /// Position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.metal_columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| QueryError::UnknownColumn {
                column: name.to_string(),
            })
    }

    /// Coordinates of every row, in row order.
    pub fn coordinates(&self) -> Vec<GeoPoint> {
        self.records
            .iter()
            .map(|r| GeoPoint {
                latitude: r.latitude,
                longitude: r.longitude,
            })
            .collect()
    }
}
