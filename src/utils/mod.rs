pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{haversine_km, is_valid_latitude, is_valid_longitude, parse_coordinate};
pub use filename::{generate_default_plot_filename, summary_path_for};
pub use progress::ProgressReporter;
