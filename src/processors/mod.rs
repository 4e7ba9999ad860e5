pub mod cleaning_pipeline;
pub mod coordinate_recoverer;
pub mod coordinate_validator;
pub mod deduplicator;

pub use cleaning_pipeline::{clean_readings, CleaningCounts, CleaningPipeline, PipelineReport};
pub use coordinate_recoverer::{extract_embedded_coordinates, CoordinateRecoverer};
pub use coordinate_validator::{CoordinateStatus, CoordinateValidator, ValidationReport};
pub use deduplicator::Deduplicator;
