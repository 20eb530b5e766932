use crate::error::{QueryError, Result};
use crate::utils::constants::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Convert DMS (Degrees:Minutes:Seconds) format to decimal degrees
///
/// # Examples
/// ```
/// use district_metals::utils::dms_to_decimal;
///
/// let decimal = dms_to_decimal("18:31:12").unwrap();
/// assert!((decimal - 18.52).abs() < 0.000001);
/// ```
pub fn dms_to_decimal(dms: &str) -> Result<f64> {
    let parts: Vec<&str> = dms.split(':').collect();

    if parts.len() != 3 {
        return Err(QueryError::InvalidCoordinate(format!(
            "Invalid DMS format: '{}'. Expected format: 'DD:MM:SS'",
            dms
        )));
    }

    // "-0:07:39" has no sign on the degrees value itself
    let is_negative = dms.trim_start().starts_with('-');

    let [degrees, minutes, seconds] = [parts[0], parts[1], parts[2]].map(|part| {
        part.trim().parse::<f64>().map_err(|_| {
            QueryError::InvalidCoordinate(format!("Invalid DMS component '{}' in '{}'", part, dms))
        })
    });
    let (degrees, minutes, seconds) = (degrees?, minutes?, seconds?);

    if !(0.0..60.0).contains(&minutes) {
        return Err(QueryError::InvalidCoordinate(format!(
            "Minutes must be between 0 and 60, got: {}",
            minutes
        )));
    }

    if !(0.0..60.0).contains(&seconds) {
        return Err(QueryError::InvalidCoordinate(format!(
            "Seconds must be between 0 and 60, got: {}",
            seconds
        )));
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    if is_negative {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

/// Parse coordinate that might be in DMS or decimal format
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();

    let value = if trimmed.contains(':') {
        dms_to_decimal(trimmed)?
    } else {
        trimmed.parse::<f64>().map_err(|_| {
            QueryError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
        })?
    };

    if !value.is_finite() {
        return Err(QueryError::InvalidCoordinate(format!(
            "Coordinate must be finite, got: '{}'",
            coord_str
        )));
    }

    Ok(value)
}

/// Validate that a latitude/longitude pair lies on the globe
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
        return Err(QueryError::InvalidCoordinate(format!(
            "Latitude {} is outside [{}, {}]",
            latitude, MIN_LAT, MAX_LAT
        )));
    }

    if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
        return Err(QueryError::InvalidCoordinate(format!(
            "Longitude {} is outside [{}, {}]",
            longitude, MIN_LON, MAX_LON
        )));
    }

    Ok(())
}
