pub mod basemap_reader;
pub mod location_reader;

pub use basemap_reader::{Basemap, BasemapReader};
pub use location_reader::LocationReader;
