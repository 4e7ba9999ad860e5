use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use validator::Validate;

// `%.f` also matches when there is no fractional part
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// A sortable end timestamp.
///
/// Cells are interpreted as a number first, then as a calendar datetime, and
/// otherwise kept as text. Across kinds the order is numeric, then datetime,
/// then text, so a column of one consistent kind sorts naturally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EndTime {
    Numeric(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl EndTime {
    /// Interpret a raw cell. Empty cells have no end time.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(value) = trimmed.parse::<f64>() {
            if value.is_finite() {
                return Some(EndTime::Numeric(value));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(EndTime::DateTime(dt.naive_utc()));
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(EndTime::DateTime(dt));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Some(EndTime::DateTime(dt));
            }
        }

        Some(EndTime::Text(trimmed.to_string()))
    }

    fn kind_rank(&self) -> u8 {
        match self {
            EndTime::Numeric(_) => 0,
            EndTime::DateTime(_) => 1,
            EndTime::Text(_) => 2,
        }
    }
}

impl Ord for EndTime {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (EndTime::Numeric(a), EndTime::Numeric(b)) => a.total_cmp(b),
            (EndTime::DateTime(a), EndTime::DateTime(b)) => a.cmp(b),
            (EndTime::Text(a), EndTime::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for EndTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for EndTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EndTime {}

impl fmt::Display for EndTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndTime::Numeric(value) => write!(f, "{}", value),
            EndTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            EndTime::Text(text) => f.write_str(text),
        }
    }
}

/// One row of the locations table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SensorReading {
    pub serial: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub end_time: Option<EndTime>,

    /// Free text that may carry corrected coordinates
    pub auxiliary: String,
}

impl SensorReading {
    pub fn new(
        serial: impl Into<String>,
        latitude: f64,
        longitude: f64,
        end_time: Option<EndTime>,
        auxiliary: impl Into<String>,
    ) -> Self {
        Self {
            serial: serial.into(),
            latitude,
            longitude,
            end_time,
            auxiliary: auxiliary.into(),
        }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180], bounds inclusive
    pub fn is_physically_valid(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.validate().is_ok()
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Exchange latitude and longitude
    pub fn swap_coordinates(&mut self) {
        std::mem::swap(&mut self.latitude, &mut self.longitude);
    }

    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
