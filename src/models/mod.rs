pub mod bounds;
pub mod mode;
pub mod reading;
pub mod table;

pub use bounds::BoundingBox;
pub use mode::PipelineMode;
pub use reading::{EndTime, SensorReading};
pub use table::{ColumnMapping, LocationTable};
