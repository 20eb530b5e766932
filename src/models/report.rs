use crate::models::GeoPoint;
use crate::utils::constants::EARTH_RADIUS_KM;
use serde::Serialize;
use std::fmt::Write;

/// A row selected by a neighbor query.
///
/// `distance` is the central angle to the query point in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

impl Neighbor {
    pub fn distance_km(&self) -> f64 {
        self.distance * EARTH_RADIUS_KM
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: String,
    /// `NaN` when every selected reading is missing
    pub mean: f64,
    /// Number of non-missing readings that went into `mean`
    pub samples: usize,
}

/// Column means over the selected rows plus their district names, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageResult {
    pub averages: Vec<ColumnMean>,
    pub districts: Vec<String>,
}

impl AverageResult {
    pub fn mean(&self, column: &str) -> Option<f64> {
        self.averages
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.mean)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedDistrict {
    pub row: usize,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
}

/// Everything one proximity request produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityReport {
    pub location: Option<String>,
    pub resolved_name: Option<String>,
    pub query: GeoPoint,
    pub neighbors: usize,
    pub selected: Vec<SelectedDistrict>,
    pub result: AverageResult,
}

impl ProximityReport {
    pub fn summary(&self) -> String {
        let mut out = String::new();

        let _ = match (&self.location, &self.resolved_name) {
            (Some(location), Some(name)) => writeln!(out, "Location: {} ({})", location, name),
            (Some(location), None) => writeln!(out, "Location: {}", location),
            _ => writeln!(out, "Location: query point"),
        };
        let _ = writeln!(
            out,
            "Coordinates: {:.5}, {:.5}",
            self.query.latitude, self.query.longitude
        );

        let _ = writeln!(out, "\nNearest {} districts:", self.neighbors);
        for (i, selected) in self.selected.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({:.4}, {:.4}) - {:.2} km",
                i + 1,
                selected.district,
                selected.latitude,
                selected.longitude,
                selected.distance_km
            );
        }

        let _ = writeln!(out, "\nAverage concentrations:");
        for column in &self.result.averages {
            if column.mean.is_nan() {
                let _ = writeln!(out, "  {}: no readings", column.column);
            } else {
                let _ = writeln!(
                    out,
                    "  {}: {:.4} ({} readings)",
                    column.column, column.mean, column.samples
                );
            }
        }

        out
    }
}
