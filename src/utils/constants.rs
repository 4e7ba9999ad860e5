/// Default column names in the GROW locations export
pub const SERIAL_COLUMN: &str = "Serial";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";
pub const END_TIME_COLUMN: &str = "EndTime";

/// The GROW export embeds corrected coordinates in the serial field
pub const AUXILIARY_COLUMN: &str = SERIAL_COLUMN;

/// Physical coordinate limits
pub const MIN_VALID_LAT: f64 = -90.0;
pub const MAX_VALID_LAT: f64 = 90.0;
pub const MIN_VALID_LON: f64 = -180.0;
pub const MAX_VALID_LON: f64 = 180.0;

/// UK basemap extent (map7.png)
pub const UK_MIN_LON: f64 = -10.592;
pub const UK_MAX_LON: f64 = 1.6848;
pub const UK_MIN_LAT: f64 = 50.681;
pub const UK_MAX_LAT: f64 = 57.985;

/// Embedded coordinate pattern, e.g. "Latitude:51.5,Longitude:-0.1,"
pub const EMBEDDED_COORDINATE_PATTERN: &str = r"Latitude:(.*?),Longitude:(.*?),";

/// Rendering defaults
pub const DEFAULT_CANVAS_WIDTH: u32 = 1024;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1024;
pub const DEFAULT_MARKER_SIZE: u32 = 3;
pub const DEFAULT_CAPTION: &str = "GROW sensor locations";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "GROW";
