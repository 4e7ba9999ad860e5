use crate::models::{BoundingBox, LocationTable, SensorReading};
use crate::processors::{
    extract_embedded_coordinates, CoordinateRecoverer, CoordinateValidator, ValidationReport,
};
use crate::utils::coordinates::haversine_km;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Coordinate range reported by one serial
#[derive(Debug, Clone, Serialize)]
pub struct SerialSpread {
    pub serial: String,
    pub readings: usize,
    pub lat_diff: f64,
    pub lon_diff: f64,
    /// Distance between the extreme corners; None if any position is invalid
    pub span_km: Option<f64>,
}

/// How many rows land in the bounding box under each labelling
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SwapDiagnosis {
    pub total_records: usize,
    pub nominal_in_bounds: usize,
    pub swapped_in_bounds: usize,
}

impl SwapDiagnosis {
    /// More rows fall in the box with latitude and longitude exchanged
    pub fn favours_swap(&self) -> bool {
        self.swapped_in_bounds > self.nominal_in_bounds
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatistics {
    pub total_records: usize,
    pub unique_serials: usize,
    pub validation: ValidationReport,
    /// Distinct (serial, lat, lon) rows with impossible coordinates
    pub invalid_examples: Vec<(String, f64, f64)>,
    pub recoverable_records: usize,
    /// Distinct (serial, lat, lon) pairs extracted from the auxiliary text
    pub recovered_examples: Vec<(String, f64, f64)>,
    pub multi_position_serials: usize,
    pub largest_spreads: Vec<SerialSpread>,
    pub swap: SwapDiagnosis,
}

impl DatasetStatistics {
    pub fn detailed_summary(&self) -> String {
        let mut s = String::new();
        s.push_str("=== GROW Locations Dataset ===\n");
        s.push_str(&format!("Rows: {}\n", self.total_records));
        s.push_str(&format!("Unique serials: {}\n", self.unique_serials));
        s.push_str(&format!(
            "Impossible coordinates: {} rows across {} serials\n",
            self.validation.invalid_records,
            self.validation.invalid_serials.len()
        ));
        for (serial, lat, lon) in &self.invalid_examples {
            s.push_str(&format!("  {} lat={} lon={}\n", serial, lat, lon));
        }
        s.push_str(&format!(
            "Rows with embedded coordinates: {}\n",
            self.recoverable_records
        ));
        for (serial, lat, lon) in &self.recovered_examples {
            s.push_str(&format!("  {} -> lat={} lon={}\n", serial, lat, lon));
        }
        s.push_str(&format!(
            "Serials reporting more than one position: {}\n",
            self.multi_position_serials
        ));

        if !self.largest_spreads.is_empty() {
            s.push_str("\nLargest latitude spreads:\n");
            for spread in &self.largest_spreads {
                let span = spread
                    .span_km
                    .map(|km| format!("{:.1} km", km))
                    .unwrap_or_else(|| "n/a".to_string());
                s.push_str(&format!(
                    "  {} ({} rows): dlat={:.4}, dlon={:.4}, span={}\n",
                    spread.serial, spread.readings, spread.lat_diff, spread.lon_diff, span
                ));
            }
        }

        s.push_str("\nColumn swap check (rows inside bounding box):\n");
        s.push_str(&format!(
            "  As labelled: {} / {}\n",
            self.swap.nominal_in_bounds, self.swap.total_records
        ));
        s.push_str(&format!(
            "  Swapped:     {} / {}\n",
            self.swap.swapped_in_bounds, self.swap.total_records
        ));
        if self.swap.favours_swap() {
            s.push_str("  Swapped labels place more sensors on the map\n");
        }
        s
    }
}

/// Exploratory checks on a loaded table; no rows are modified
pub struct DatasetAnalyzer {
    bounds: BoundingBox,
    top_n: usize,
}

impl DatasetAnalyzer {
    pub fn new(bounds: BoundingBox) -> Self {
        Self { bounds, top_n: 10 }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn analyze(&self, table: &LocationTable) -> DatasetStatistics {
        let readings = table.readings();
        let validation = CoordinateValidator::new(self.bounds).check(readings);

        DatasetStatistics {
            total_records: readings.len(),
            unique_serials: table.unique_serials(),
            invalid_examples: self.invalid_examples(readings),
            validation,
            recoverable_records: CoordinateRecoverer::new().count_recoverable(readings),
            recovered_examples: self.recovered_examples(readings),
            multi_position_serials: self.multi_position_serials(readings),
            largest_spreads: self.largest_spreads(readings),
            swap: self.swap_diagnosis(readings),
        }
    }

    fn invalid_examples(&self, readings: &[SensorReading]) -> Vec<(String, f64, f64)> {
        let mut seen = HashSet::new();
        readings
            .iter()
            .filter(|r| !r.is_physically_valid())
            .filter(|r| {
                seen.insert((
                    r.serial.clone(),
                    r.latitude.to_bits(),
                    r.longitude.to_bits(),
                ))
            })
            .take(self.top_n)
            .map(|r| (r.serial.clone(), r.latitude, r.longitude))
            .collect()
    }

    fn recovered_examples(&self, readings: &[SensorReading]) -> Vec<(String, f64, f64)> {
        let mut seen = HashSet::new();
        readings
            .iter()
            .filter_map(|r| {
                extract_embedded_coordinates(&r.auxiliary).map(|(lat, lon)| (r, lat, lon))
            })
            .filter(|(r, lat, lon)| seen.insert((r.serial.clone(), lat.to_bits(), lon.to_bits())))
            .take(self.top_n)
            .map(|(r, lat, lon)| (r.serial.clone(), lat, lon))
            .collect()
    }

    fn multi_position_serials(&self, readings: &[SensorReading]) -> usize {
        let mut positions: BTreeMap<&str, HashSet<(u64, u64)>> = BTreeMap::new();
        for r in readings {
            positions
                .entry(r.serial.as_str())
                .or_default()
                .insert((r.latitude.to_bits(), r.longitude.to_bits()));
        }
        positions.values().filter(|p| p.len() > 1).count()
    }

    fn largest_spreads(&self, readings: &[SensorReading]) -> Vec<SerialSpread> {
        let mut groups: BTreeMap<&str, Vec<&SensorReading>> = BTreeMap::new();
        for r in readings {
            groups.entry(r.serial.as_str()).or_default().push(r);
        }

        let mut spreads: Vec<SerialSpread> = groups
            .into_iter()
            .filter(|(_, group)| group.len() > 1)
            .map(|(serial, group)| {
                let fold = |f: fn(&SensorReading) -> f64| {
                    group.iter().map(|&r| f(r)).fold((f64::MAX, f64::MIN), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    })
                };
                let (lat_min, lat_max) = fold(|r: &SensorReading| r.latitude);
                let (lon_min, lon_max) = fold(|r: &SensorReading| r.longitude);

                let all_valid = group.iter().all(|r| r.is_physically_valid());
                SerialSpread {
                    serial: serial.to_string(),
                    readings: group.len(),
                    lat_diff: lat_max - lat_min,
                    lon_diff: lon_max - lon_min,
                    span_km: all_valid
                        .then(|| haversine_km((lat_min, lon_min), (lat_max, lon_max))),
                }
            })
            .filter(|s| s.lat_diff > 0.0 || s.lon_diff > 0.0)
            .collect();

        spreads.sort_by(|a, b| b.lat_diff.total_cmp(&a.lat_diff));
        spreads.truncate(self.top_n);
        spreads
    }

    fn swap_diagnosis(&self, readings: &[SensorReading]) -> SwapDiagnosis {
        SwapDiagnosis {
            total_records: readings.len(),
            nominal_in_bounds: readings
                .iter()
                .filter(|r| self.bounds.contains(r.latitude, r.longitude))
                .count(),
            swapped_in_bounds: readings
                .iter()
                .filter(|r| self.bounds.contains(r.longitude, r.latitude))
                .count(),
        }
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new(BoundingBox::uk())
    }
}
