use crate::error::Result;
use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One dataset row: a district, where it is, and one reading per metal column.
///
/// Missing readings are stored as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DistrictRecord {
    #[validate(length(min = 1))]
    pub district: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub readings: Vec<f64>,
}

impl DistrictRecord {
    pub fn new(
        district: impl Into<String>,
        latitude: f64,
        longitude: f64,
        readings: Vec<f64>,
    ) -> Self {
        Self {
            district: district.into(),
            latitude,
            longitude,
            readings,
        }
    }

    pub fn location(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn reading(&self, column: usize) -> Option<f64> {
        self.readings.get(column).copied().filter(|v| !v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_district_validation() {
        let record = DistrictRecord::new("Pune", 18.52, 73.85, vec![5.0, 2.0]);
        assert!(record.validate().is_ok());
        assert_eq!(record.location().unwrap().latitude, 18.52);
    }

    #[test]
    fn test_invalid_district() {
        let unnamed = DistrictRecord::new("", 18.52, 73.85, vec![]);
        assert!(unnamed.validate().is_err());

        let off_globe = DistrictRecord::new("Nowhere", 18.52, 190.0, vec![]);
        assert!(off_globe.validate().is_err());
        assert!(off_globe.location().is_err());
    }

    #[test]
    fn test_missing_reading() {
        let record = DistrictRecord::new("Pune", 18.52, 73.85, vec![5.0, f64::NAN]);
        assert_eq!(record.reading(0), Some(5.0));
        assert_eq!(record.reading(1), None);
        assert_eq!(record.reading(2), None);
    }
}
