use crate::models::{BoundingBox, LocationTable, PipelineMode, SensorReading};
use crate::processors::{
    CoordinateRecoverer, CoordinateValidator, Deduplicator, ValidationReport,
};
use serde::Serialize;
use tracing::{info, warn};

/// Row counts through each cleaning stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningCounts {
    pub input_records: usize,
    pub recovered_records: usize,
    pub in_bounds_records: usize,
    pub output_records: usize,
}

/// What a pipeline run did, including which interpretation was chosen
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub mode: PipelineMode,
    pub coordinates_swapped: bool,
    /// Source column read as latitude
    pub latitude_column: String,
    /// Source column read as longitude
    pub longitude_column: String,
    pub loaded_records: usize,
    pub loaded_serials: usize,
    /// Classification of the loaded rows under the chosen labels
    pub validation: ValidationReport,
    /// Absent when the mode skips cleaning
    pub cleaning: Option<CleaningCounts>,
    pub output_records: usize,
    pub output_serials: usize,
}

/// Recover, filter and deduplicate readings. Order matters: recovery runs
/// first so repaired rows can survive the filter, and deduplication runs last
/// so only in-bounds rows compete for recency.
pub fn clean_readings(
    readings: Vec<SensorReading>,
    bounds: &BoundingBox,
) -> (Vec<SensorReading>, CleaningCounts) {
    let input_records = readings.len();

    let (recovered, recovered_records) = CoordinateRecoverer::new().recover_all(readings);

    let in_bounds: Vec<SensorReading> = recovered
        .into_iter()
        .filter(|r| r.is_physically_valid() && bounds.contains_reading(r))
        .collect();
    let in_bounds_records = in_bounds.len();
    info!(
        kept = in_bounds_records,
        dropped = input_records - in_bounds_records,
        "filtered readings to bounding box"
    );

    let deduplicated = Deduplicator::new().deduplicate(in_bounds);

    let counts = CleaningCounts {
        input_records,
        recovered_records,
        in_bounds_records,
        output_records: deduplicated.len(),
    };

    (deduplicated, counts)
}

/// Runs one pipeline mode over a loaded table
pub struct CleaningPipeline {
    mode: PipelineMode,
    bounds: BoundingBox,
}

impl CleaningPipeline {
    pub fn new(mode: PipelineMode) -> Self {
        Self {
            mode,
            bounds: BoundingBox::uk(),
        }
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    pub fn run(&self, mut table: LocationTable) -> (LocationTable, PipelineReport) {
        info!(mode = %self.mode, "running location pipeline");

        let loaded_records = table.len();
        let loaded_serials = table.unique_serials();

        if self.mode.swaps_columns() {
            warn!(
                "treating the latitude column as longitude and vice versa for every record; \
                 records exported with correct labels would be swapped too"
            );
            table.swap_coordinate_columns();
        }

        let validator = CoordinateValidator::new(self.bounds);
        let validation = validator.check(table.readings());
        info!(
            valid = validation.physically_valid,
            invalid = validation.invalid_records,
            in_bounds = validation.in_bounds,
            "classified coordinates"
        );

        let cleaning = if self.mode.cleans() {
            let (cleaned, counts) = clean_readings(table.take_readings(), &self.bounds);
            table = table.with_readings(cleaned);
            Some(counts)
        } else {
            info!("cleaning skipped; plotting rows as loaded");
            None
        };

        let report = PipelineReport {
            mode: self.mode,
            coordinates_swapped: table.coordinates_swapped(),
            latitude_column: table.mapping().latitude.clone(),
            longitude_column: table.mapping().longitude.clone(),
            loaded_records,
            loaded_serials,
            validation,
            cleaning,
            output_records: table.len(),
            output_serials: table.unique_serials(),
        };

        (table, report)
    }
}
