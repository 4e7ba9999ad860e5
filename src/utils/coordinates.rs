use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MAX_VALID_LAT, MAX_VALID_LON, MIN_VALID_LAT, MIN_VALID_LON};

/// Latitude within [-90, 90], inclusive. NaN is never valid.
pub fn is_valid_latitude(latitude: f64) -> bool {
    (MIN_VALID_LAT..=MAX_VALID_LAT).contains(&latitude)
}

/// Longitude within [-180, 180], inclusive. NaN is never valid.
pub fn is_valid_longitude(longitude: f64) -> bool {
    (MIN_VALID_LON..=MAX_VALID_LON).contains(&longitude)
}

/// Parse a decimal-degree coordinate cell
///
/// # Examples
/// ```
/// use grow_locations::utils::coordinates::parse_coordinate;
///
/// assert!((parse_coordinate(" -0.1278 ").unwrap() + 0.1278).abs() < 1e-9);
/// assert!(parse_coordinate("north").is_err());
/// ```
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();

    let value = trimmed.parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
    })?;

    if !value.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Coordinate is not a finite number: '{}'",
            coord_str
        )));
    }

    Ok(value)
}

/// Great-circle distance in kilometres between two (lat, lon) points
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let a = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
