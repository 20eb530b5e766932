use crate::error::Result;
use crate::utils::coordinates::validate_coordinates;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// `[lat, lon]` in radians, the form every distance computation takes.
    pub fn to_radians(&self) -> [f64; 2] {
        [self.latitude.to_radians(), self.longitude.to_radians()]
    }
}
