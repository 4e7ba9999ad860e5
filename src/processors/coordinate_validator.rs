use crate::models::{BoundingBox, SensorReading};
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of the two independent range checks on one reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoordinateStatus {
    /// Latitude in [-90, 90] and longitude in [-180, 180]
    pub physically_valid: bool,
    /// Inside the target bounding box
    pub in_bounds: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub total_records: usize,
    pub physically_valid: usize,
    pub in_bounds: usize,
    pub invalid_records: usize,
    /// Serials with at least one physically invalid reading, sorted
    pub invalid_serials: BTreeSet<String>,
}

impl ValidationReport {
    pub fn out_of_bounds(&self) -> usize {
        self.total_records - self.in_bounds
    }
}

/// Classifies readings; never repairs or drops them
pub struct CoordinateValidator {
    bounds: BoundingBox,
}

impl CoordinateValidator {
    pub fn new(bounds: BoundingBox) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn classify(&self, reading: &SensorReading) -> CoordinateStatus {
        CoordinateStatus {
            physically_valid: reading.is_physically_valid(),
            in_bounds: self.bounds.contains_reading(reading),
        }
    }

    pub fn classify_all(&self, readings: &[SensorReading]) -> Vec<CoordinateStatus> {
        readings.iter().map(|r| self.classify(r)).collect()
    }

    pub fn check(&self, readings: &[SensorReading]) -> ValidationReport {
        let mut report = ValidationReport {
            total_records: readings.len(),
            ..Default::default()
        };

        for reading in readings {
            let status = self.classify(reading);

            if status.physically_valid {
                report.physically_valid += 1;
            } else {
                report.invalid_records += 1;
                report.invalid_serials.insert(reading.serial.clone());
            }

            if status.in_bounds {
                report.in_bounds += 1;
            }
        }

        report
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &ValidationReport) -> String {
        let pct = |n: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_records as f64
            }
        };

        let mut summary = String::new();
        summary.push_str("=== Coordinate Validation Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Physically Valid: {} ({:.1}%)\n",
            report.physically_valid,
            pct(report.physically_valid)
        ));
        summary.push_str(&format!(
            "Invalid: {} ({:.1}%) across {} serials\n",
            report.invalid_records,
            pct(report.invalid_records),
            report.invalid_serials.len()
        ));
        summary.push_str(&format!(
            "Inside Bounding Box: {} ({:.1}%)\n",
            report.in_bounds,
            pct(report.in_bounds)
        ));
        summary
    }
}

impl Default for CoordinateValidator {
    fn default() -> Self {
        Self::new(BoundingBox::uk())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(serial: &str, lat: f64, lon: f64) -> SensorReading {
        SensorReading::new(serial, lat, lon, None, "")
    }

    #[test]
    fn test_classification_matches_range_checks() {
        let validator = CoordinateValidator::default();
        let samples = [
            (0.0, 0.0),
            (90.0, 180.0),
            (-90.0, -180.0),
            (90.1, 0.0),
            (0.0, -180.1),
            (999.0, 0.0),
            (51.5, -0.1),
            (f64::NAN, 1.0),
        ];

        for (lat, lon) in samples {
            let status = validator.classify(&reading("S", lat, lon));
            let expected = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
            assert_eq!(status.physically_valid, expected, "({}, {})", lat, lon);
        }
    }

    #[test]
    fn test_checks_are_independent() {
        let validator = CoordinateValidator::default();

        // Valid on Earth but not in the UK
        let status = validator.classify(&reading("S", -33.9, 151.2));
        assert!(status.physically_valid);
        assert!(!status.in_bounds);

        let status = validator.classify(&reading("S", 51.5, -0.1));
        assert!(status.physically_valid);
        assert!(status.in_bounds);
    }

    #[test]
    fn test_report_counts() {
        let validator = CoordinateValidator::default();
        let readings = vec![
            reading("A", 51.5, -0.1),
            reading("B", 999.0, 0.0),
            reading("B", 998.0, 0.0),
            reading("C", -33.9, 151.2),
        ];

        let report = validator.check(&readings);

        assert_eq!(report.total_records, 4);
        assert_eq!(report.physically_valid, 2);
        assert_eq!(report.invalid_records, 2);
        assert_eq!(report.in_bounds, 1);
        assert_eq!(report.out_of_bounds(), 3);
        assert_eq!(report.invalid_serials.len(), 1);
        assert!(report.invalid_serials.contains("B"));

        let summary = validator.generate_summary(&report);
        assert!(summary.contains("Total Records: 4"));
        assert!(summary.contains("across 1 serials"));
    }

    #[test]
    fn test_empty_report_summary() {
        let validator = CoordinateValidator::default();
        let report = validator.check(&[]);
        assert!(validator.generate_summary(&report).contains("(0.0%)"));
    }
}
