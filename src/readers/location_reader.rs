use crate::error::{ProcessingError, Result};
use crate::models::{ColumnMapping, EndTime, LocationTable, SensorReading};
use crate::utils::coordinates::parse_coordinate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Header positions of the columns a reading is built from
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    serial: usize,
    latitude: usize,
    longitude: usize,
    end_time: usize,
    auxiliary: usize,
}

impl ColumnIndices {
    fn resolve(headers: &StringRecord, mapping: &ColumnMapping) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| {
                    ProcessingError::MissingData(format!(
                        "column '{}' not found in header [{}]",
                        name,
                        headers.iter().collect::<Vec<_>>().join(", ")
                    ))
                })
        };

        Ok(Self {
            serial: find(mapping.serial.as_str())?,
            latitude: find(mapping.latitude.as_str())?,
            longitude: find(mapping.longitude.as_str())?,
            end_time: find(mapping.end_time.as_str())?,
            auxiliary: find(mapping.auxiliary.as_str())?,
        })
    }
}

/// Reads the sensor locations table from delimited text
pub struct LocationReader {
    mapping: ColumnMapping,
    delimiter: u8,
}

impl LocationReader {
    pub fn new() -> Self {
        Self {
            mapping: ColumnMapping::default(),
            delimiter: b',',
        }
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read the locations table from a file
    pub fn read_table(&self, path: &Path) -> Result<LocationTable> {
        let file = File::open(path)?;
        let table = self.read_from(BufReader::new(file))?;

        info!(
            path = %path.display(),
            rows = table.len(),
            serials = table.unique_serials(),
            "loaded locations table"
        );

        Ok(table)
    }

    /// Read the locations table from any reader
    pub fn read_from<R: Read>(&self, reader: R) -> Result<LocationTable> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndices::resolve(&headers, &self.mapping)?;

        let mut readings = Vec::new();
        let mut unparseable = 0usize;

        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;

            // Skip blank lines
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let (reading, bad_cells) = self.parse_record(&record, &columns, row);
            unparseable += bad_cells;
            readings.push(reading);
        }

        if unparseable > 0 {
            warn!(
                cells = unparseable,
                "coordinate cells could not be parsed and were read as NaN"
            );
        }

        Ok(LocationTable::new(self.mapping.clone(), readings))
    }

    /// Build a reading from one row. Bad coordinate cells become NaN so the
    /// row is classified as invalid later instead of aborting the load.
    fn parse_record(
        &self,
        record: &StringRecord,
        columns: &ColumnIndices,
        row: usize,
    ) -> (SensorReading, usize) {
        let cell = |index: usize| record.get(index).unwrap_or("");
        let mut bad_cells = 0;

        let mut coordinate = |index: usize, name: &str| match parse_coordinate(cell(index)) {
            Ok(value) => value,
            Err(e) => {
                debug!(row, column = name, error = %e, "unparseable coordinate");
                bad_cells += 1;
                f64::NAN
            }
        };

        let latitude = coordinate(columns.latitude, self.mapping.latitude.as_str());
        let longitude = coordinate(columns.longitude, self.mapping.longitude.as_str());

        let reading = SensorReading::new(
            cell(columns.serial).trim(),
            latitude,
            longitude,
            EndTime::parse(cell(columns.end_time)),
            cell(columns.auxiliary),
        );

        (reading, bad_cells)
    }
}

impl Default for LocationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Serial,Latitude,Longitude,Type,SensorType,Code,BeginTime,EndTime
PI040297AA3I001108,-1.92,52.49,Grow,Soil,001,2018-01-01 00:00:00,2018-06-01 00:00:00
PI040297AA3I001108,-1.93,52.49,Grow,Soil,001,2018-06-01 00:00:00,2019-01-01 00:00:00
\"Latitude:51.5,Longitude:-0.1,\",999,0,Grow,Soil,002,2018-01-01 00:00:00,2018-02-01 00:00:00
";

    #[test]
    fn test_read_sample_table() {
        let table = LocationReader::new().read_from(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.unique_serials(), 2);

        let first = &table.readings()[0];
        assert_eq!(first.serial, "PI040297AA3I001108");
        assert_eq!(first.position(), (-1.92, 52.49));
        assert_eq!(first.end_time, EndTime::parse("2018-06-01 00:00:00"));
        // The default auxiliary column is the serial itself
        assert_eq!(first.auxiliary, first.serial);

        let third = &table.readings()[2];
        assert_eq!(third.latitude, 999.0);
        assert_eq!(third.auxiliary, "Latitude:51.5,Longitude:-0.1,");
    }

    #[test]
    fn test_unparseable_coordinates_become_nan() {
        let data = "Serial,Latitude,Longitude,EndTime\nA,north,1.0,5\nB,,2.0,\n";
        let table = LocationReader::new().read_from(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.readings()[0].latitude.is_nan());
        assert_eq!(table.readings()[0].longitude, 1.0);
        assert!(table.readings()[1].latitude.is_nan());
        assert_eq!(table.readings()[1].end_time, None);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let data = "Serial,Lat,Longitude,EndTime\nA,1,2,3\n";
        let err = LocationReader::new().read_from(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingData(_)));
    }

    #[test]
    fn test_custom_mapping_and_delimiter() {
        let data = "id;y;x;finished;notes\nA;51.0;-1.0;3;hello\n";
        let mapping = ColumnMapping {
            serial: "id".to_string(),
            latitude: "y".to_string(),
            longitude: "x".to_string(),
            end_time: "finished".to_string(),
            auxiliary: "notes".to_string(),
        };
        let table = LocationReader::new()
            .with_mapping(mapping.clone())
            .with_delimiter(b';')
            .read_from(data.as_bytes())
            .unwrap();

        assert_eq!(table.mapping(), &mapping);
        assert_eq!(table.readings()[0].auxiliary, "hello");
        assert_eq!(table.readings()[0].end_time, Some(EndTime::Numeric(3.0)));
    }

    #[test]
    fn test_read_table_from_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", SAMPLE)?;

        let table = LocationReader::new().read_table(temp_file.path())?;
        assert_eq!(table.len(), 3);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LocationReader::new()
            .read_table(Path::new("does/not/exist.csv"))
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Io(_)));
    }
}
