use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::SensorReading;
use crate::utils::constants::{
    AUXILIARY_COLUMN, END_TIME_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN, SERIAL_COLUMN,
};

/// Names of the source columns feeding each role of a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub serial: String,
    pub latitude: String,
    pub longitude: String,
    pub end_time: String,
    pub auxiliary: String,
}

impl ColumnMapping {
    /// Exchange which source columns are read as latitude and longitude
    pub fn swap_coordinates(&mut self) {
        std::mem::swap(&mut self.latitude, &mut self.longitude);
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            serial: SERIAL_COLUMN.to_string(),
            latitude: LATITUDE_COLUMN.to_string(),
            longitude: LONGITUDE_COLUMN.to_string(),
            end_time: END_TIME_COLUMN.to_string(),
            auxiliary: AUXILIARY_COLUMN.to_string(),
        }
    }
}

/// In-memory locations table with the provenance of its coordinate columns
#[derive(Debug, Clone, PartialEq)]
pub struct LocationTable {
    mapping: ColumnMapping,
    readings: Vec<SensorReading>,
    coordinates_swapped: bool,
}

impl LocationTable {
    pub fn new(mapping: ColumnMapping, readings: Vec<SensorReading>) -> Self {
        Self {
            mapping,
            readings,
            coordinates_swapped: false,
        }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn into_readings(self) -> Vec<SensorReading> {
        self.readings
    }

    /// Move the rows out, leaving the table empty but its provenance intact
    pub fn take_readings(&mut self) -> Vec<SensorReading> {
        std::mem::take(&mut self.readings)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn coordinates_swapped(&self) -> bool {
        self.coordinates_swapped
    }

    /// Relabel the coordinate columns: the column read as latitude becomes
    /// longitude and vice versa. Rows, order and every other field are kept.
    pub fn swap_coordinate_columns(&mut self) {
        self.mapping.swap_coordinates();
        for reading in &mut self.readings {
            reading.swap_coordinates();
        }
        self.coordinates_swapped = !self.coordinates_swapped;
    }

    /// Replace the rows, keeping the column provenance
    pub fn with_readings(self, readings: Vec<SensorReading>) -> Self {
        Self { readings, ..self }
    }

    pub fn unique_serials(&self) -> usize {
        self.readings
            .iter()
            .map(|r| r.serial.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}
