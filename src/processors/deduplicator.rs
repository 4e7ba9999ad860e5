use crate::models::SensorReading;
use std::collections::HashMap;
use tracing::info;

/// Collapses the readings of each serial to the most recent one.
///
/// Readings are ranked by end time, newest first; a missing end time ranks
/// below any present one. Among equal end times the earliest row wins, so
/// the output is reproducible for a given input order.
#[derive(Debug, Default)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }

    /// Keep one reading per serial. Survivors stay in their original row order.
    pub fn deduplicate(&self, readings: Vec<SensorReading>) -> Vec<SensorReading> {
        let total = readings.len();
        let winners = self.select_latest(&readings);

        let mut keep = vec![false; total];
        for index in winners.values() {
            keep[*index] = true;
        }

        let deduplicated: Vec<SensorReading> = readings
            .into_iter()
            .zip(keep)
            .filter_map(|(reading, kept)| kept.then_some(reading))
            .collect();

        info!(
            before = total,
            after = deduplicated.len(),
            "deduplicated readings by serial"
        );

        deduplicated
    }

    /// Index of the winning reading for each serial
    fn select_latest<'a>(&self, readings: &'a [SensorReading]) -> HashMap<&'a str, usize> {
        let mut winners: HashMap<&str, usize> = HashMap::new();

        for (index, reading) in readings.iter().enumerate() {
            winners
                .entry(reading.serial.as_str())
                .and_modify(|best| {
                    // Strictly newer only: ties keep the first-seen row
                    if reading.end_time > readings[*best].end_time {
                        *best = index;
                    }
                })
                .or_insert(index);
        }

        winners
    }
}
