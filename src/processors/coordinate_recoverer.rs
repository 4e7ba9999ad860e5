use crate::models::SensorReading;
use crate::utils::constants::EMBEDDED_COORDINATE_PATTERN;
use crate::utils::coordinates::parse_coordinate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static EMBEDDED_COORDINATES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(EMBEDDED_COORDINATE_PATTERN).expect("embedded coordinate pattern is valid")
});

/// Extract `(latitude, longitude)` from text such as
/// `"...Latitude:51.5,Longitude:-0.1,..."`.
///
/// Returns `None` when the pattern is absent or either number is malformed.
pub fn extract_embedded_coordinates(text: &str) -> Option<(f64, f64)> {
    let captures = EMBEDDED_COORDINATES.captures(text)?;
    let latitude = parse_coordinate(captures.get(1)?.as_str()).ok()?;
    let longitude = parse_coordinate(captures.get(2)?.as_str()).ok()?;
    Some((latitude, longitude))
}

/// Replaces structured coordinates with ones some devices wrote into a
/// free-text field instead.
#[derive(Debug, Default)]
pub struct CoordinateRecoverer;

impl CoordinateRecoverer {
    pub fn new() -> Self {
        Self
    }

    /// Recover a single reading. Readings without a usable embedded pair are
    /// returned unchanged.
    pub fn recover(&self, reading: SensorReading) -> (SensorReading, bool) {
        match extract_embedded_coordinates(&reading.auxiliary) {
            Some((latitude, longitude)) => {
                debug!(
                    serial = %reading.serial,
                    from = ?reading.position(),
                    to = ?(latitude, longitude),
                    "recovered embedded coordinates"
                );
                (reading.with_coordinates(latitude, longitude), true)
            }
            None => (reading, false),
        }
    }

    /// Recover every reading; returns the readings and how many changed
    pub fn recover_all(&self, readings: Vec<SensorReading>) -> (Vec<SensorReading>, usize) {
        let mut recovered = 0;
        let readings = readings
            .into_iter()
            .map(|reading| {
                let (reading, changed) = self.recover(reading);
                if changed {
                    recovered += 1;
                }
                reading
            })
            .collect();

        info!(recovered, "embedded coordinate recovery complete");
        (readings, recovered)
    }

    /// Count readings that carry a usable embedded pair
    pub fn count_recoverable(&self, readings: &[SensorReading]) -> usize {
        readings
            .iter()
            .filter(|r| extract_embedded_coordinates(&r.auxiliary).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reading(lat: f64, lon: f64, aux: &str) -> SensorReading {
        SensorReading::new("S", lat, lon, None, aux)
    }

    #[test]
    fn test_extract_well_formed() {
        assert_eq!(
            extract_embedded_coordinates("Latitude:48.1,Longitude:-2.3,"),
            Some((48.1, -2.3))
        );
        assert_eq!(
            extract_embedded_coordinates("device 7 Latitude: 52.0 ,Longitude:-1.5,rest"),
            Some((52.0, -1.5))
        );
    }

    #[test]
    fn test_extract_malformed() {
        assert_eq!(extract_embedded_coordinates(""), None);
        assert_eq!(extract_embedded_coordinates("PI040297AA3I001108"), None);
        // No trailing comma after the longitude
        assert_eq!(extract_embedded_coordinates("Latitude:48.1,Longitude:-2.3"), None);
        assert_eq!(extract_embedded_coordinates("Latitude:abc,Longitude:-2.3,"), None);
        assert_eq!(extract_embedded_coordinates("Latitude:48.1,Longitude:,"), None);
    }

    #[test]
    fn test_recovery_overrides_original_values() {
        let recoverer = CoordinateRecoverer::new();
        for (lat, lon) in [(999.0, 0.0), (0.0, 0.0), (f64::NAN, f64::NAN), (51.0, -1.0)] {
            let (recovered, changed) =
                recoverer.recover(reading(lat, lon, "Latitude:48.1,Longitude:-2.3,"));
            assert!(changed);
            assert_eq!(recovered.position(), (48.1, -2.3));
        }
    }

    #[test]
    fn test_recovery_is_identity_without_match() {
        let recoverer = CoordinateRecoverer::new();
        for aux in ["", "PI040297AA3I001108", "Latitude:x,Longitude:y,", "Latitude:1"] {
            let original = reading(999.0, 12.0, aux);
            let (recovered, changed) = recoverer.recover(original.clone());
            assert!(!changed);
            assert_eq!(recovered, original);
        }
    }

    #[test]
    fn test_recover_all_counts_changes() {
        let recoverer = CoordinateRecoverer::new();
        let readings = vec![
            reading(999.0, 0.0, "Latitude:51.5,Longitude:-0.1,"),
            reading(51.4, -0.2, ""),
            reading(0.0, 0.0, "Latitude:oops,Longitude:-0.1,"),
        ];

        assert_eq!(recoverer.count_recoverable(&readings), 1);

        let (recovered, count) = recoverer.recover_all(readings);
        assert_eq!(count, 1);
        assert_eq!(recovered[0].position(), (51.5, -0.1));
        assert_eq!(recovered[1].position(), (51.4, -0.2));
        assert_eq!(recovered[2].position(), (0.0, 0.0));
    }
}
