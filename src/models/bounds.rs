use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{ProcessingError, Result};
use crate::models::SensorReading;
use crate::utils::constants::{UK_MAX_LAT, UK_MAX_LON, UK_MIN_LAT, UK_MIN_LON};

/// Rectangular lat/lon region. Used both as the cleaning filter and as the
/// plot axis limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Result<Self> {
        let bbox = Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        };
        bbox.check()?;
        Ok(bbox)
    }

    /// The extent of the UK basemap
    pub const fn uk() -> Self {
        Self {
            lon_min: UK_MIN_LON,
            lon_max: UK_MAX_LON,
            lat_min: UK_MIN_LAT,
            lat_max: UK_MAX_LAT,
        }
    }

    pub fn check(&self) -> Result<()> {
        let corners = [self.lon_min, self.lon_max, self.lat_min, self.lat_max];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(ProcessingError::Config(format!(
                "Bounding box has non-finite corners: {:?}",
                corners
            )));
        }
        if self.lon_min >= self.lon_max || self.lat_min >= self.lat_max {
            return Err(ProcessingError::Config(format!(
                "Bounding box minimums must be below maximums: lon [{}, {}], lat [{}, {}]",
                self.lon_min, self.lon_max, self.lat_min, self.lat_max
            )));
        }
        Ok(())
    }

    /// Inclusive membership test
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }

    pub fn contains_reading(&self, reading: &SensorReading) -> bool {
        self.contains(reading.latitude, reading.longitude)
    }

    /// Keep only readings inside the box. Applying it twice changes nothing.
    pub fn filter(&self, readings: Vec<SensorReading>) -> Vec<SensorReading> {
        readings
            .into_iter()
            .filter(|r| self.contains_reading(r))
            .collect()
    }

    /// `[lon_min, lon_max, lat_min, lat_max]`
    pub fn extent(&self) -> [f64; 4] {
        [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
    }

    pub fn lon_range(&self) -> Range<f64> {
        self.lon_min..self.lon_max
    }

    pub fn lat_range(&self) -> Range<f64> {
        self.lat_min..self.lat_max
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::uk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(lat: f64, lon: f64) -> SensorReading {
        SensorReading::new("S", lat, lon, None, "")
    }

    #[test]
    fn test_uk_box_contains_london() {
        let bbox = BoundingBox::uk();
        assert!(bbox.contains(51.5074, -0.1278));
        assert!(bbox.contains(55.9533, -3.1883));
        assert!(!bbox.contains(48.0, 0.0));
        assert!(!bbox.contains(-0.05, 51.5));
    }

    #[test]
    fn test_edges_are_inside() {
        let bbox = BoundingBox::uk();
        assert!(bbox.contains(50.681, -10.592));
        assert!(bbox.contains(57.985, 1.6848));
        assert!(!bbox.contains(57.9851, 0.0));
        assert!(!bbox.contains(f64::NAN, 0.0));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let bbox = BoundingBox::uk();
        let readings = vec![
            reading(51.4, -0.2),
            reading(999.0, 0.0),
            reading(-0.05, 51.5),
            reading(57.985, 1.6848),
            reading(f64::NAN, f64::NAN),
        ];

        let once = bbox.filter(readings);
        let twice = bbox.filter(once.clone());

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inverted_box_is_rejected() {
        assert!(BoundingBox::new(1.0, -1.0, 50.0, 51.0).is_err());
        assert!(BoundingBox::new(-1.0, 1.0, 51.0, 51.0).is_err());
        assert!(BoundingBox::new(f64::NAN, 1.0, 50.0, 51.0).is_err());
        assert!(BoundingBox::new(-1.0, 1.0, 50.0, 51.0).is_ok());
    }

    #[test]
    fn test_extent_order() {
        assert_eq!(
            BoundingBox::uk().extent(),
            [-10.592, 1.6848, 50.681, 57.985]
        );
    }
}
