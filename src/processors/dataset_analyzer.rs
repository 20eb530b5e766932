use crate::error::{QueryError, Result};
use crate::models::DistrictDataset;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub unique_districts: usize,
    /// District names that appear on more than one row, sorted
    pub duplicate_districts: Vec<String>,
    pub bounds: GeographicBounds,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub missing: usize,
}

impl DatasetSummary {
    pub fn detailed_summary(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Dataset Summary");
        let _ = writeln!(out, "===============");
        let _ = writeln!(out, "Rows: {}", self.total_rows);
        let _ = writeln!(out, "Unique districts: {}", self.unique_districts);
        if !self.duplicate_districts.is_empty() {
            let _ = writeln!(
                out,
                "Repeated district names: {}",
                self.duplicate_districts.join(", ")
            );
        }
        let _ = writeln!(
            out,
            "Latitude range: {:.4} to {:.4}",
            self.bounds.min_lat, self.bounds.max_lat
        );
        let _ = writeln!(
            out,
            "Longitude range: {:.4} to {:.4}",
            self.bounds.min_lon, self.bounds.max_lon
        );

        let _ = writeln!(out, "\nMetal columns:");
        for column in &self.columns {
            match (column.min, column.max, column.mean) {
                (Some(min), Some(max), Some(mean)) => {
                    let _ = writeln!(
                        out,
                        "  {}: min {:.4}, max {:.4}, mean {:.4}, missing {}",
                        column.name, min, max, mean, column.missing
                    );
                }
                _ => {
                    let _ = writeln!(out, "  {}: no readings", column.name);
                }
            }
        }

        out
    }
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, dataset: &DistrictDataset) -> Result<DatasetSummary> {
        if dataset.is_empty() {
            return Err(QueryError::EmptyDataset);
        }

        let records = dataset.records();

        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *name_counts.entry(record.district.as_str()).or_default() += 1;
        }
        let mut duplicate_districts: Vec<String> = name_counts
            .iter()
            .filter(|&(_, &count)| count > 1)
            .map(|(name, _)| name.to_string())
            .collect();
        duplicate_districts.sort();

        let mut bounds = GeographicBounds {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for record in records {
            bounds.min_lat = bounds.min_lat.min(record.latitude);
            bounds.max_lat = bounds.max_lat.max(record.latitude);
            bounds.min_lon = bounds.min_lon.min(record.longitude);
            bounds.max_lon = bounds.max_lon.max(record.longitude);
        }

        let columns = dataset
            .metal_columns()
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let values: Vec<f64> = records.iter().filter_map(|r| r.reading(index)).collect();
                let mean = if values.is_empty() {
                    None
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                };

                ColumnSummary {
                    name: name.clone(),
                    min: values.iter().copied().reduce(f64::min),
                    max: values.iter().copied().reduce(f64::max),
                    mean,
                    missing: records.len() - values.len(),
                }
            })
            .collect();

        Ok(DatasetSummary {
            total_rows: records.len(),
            unique_districts: name_counts.len(),
            duplicate_districts,
            bounds,
            columns,
        })
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
