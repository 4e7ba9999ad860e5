use grow_locations::cli::commands::{run_plot, PlotPaths};
use grow_locations::models::{
    BoundingBox, ColumnMapping, EndTime, LocationTable, PipelineMode, SensorReading,
};
use grow_locations::processors::{clean_readings, CleaningPipeline};
use grow_locations::readers::LocationReader;
use grow_locations::utils::ProgressReporter;
use grow_locations::writers::RenderOptions;
use grow_locations::{AppConfig, ProcessingError};
use image::{GenericImageView, ImageBuffer, Rgb};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LOCATIONS_CSV: &str = "\
Serial,Latitude,Longitude,Type,SensorType,Code,BeginTime,EndTime
PI040297AA3I001108,-1.92,52.49,Grow,Soil,001,2018-01-01 00:00:00,2018-06-01 00:00:00
PI040297AA3I001108,-1.93,52.49,Grow,Soil,001,2018-06-01 00:00:00,2019-01-01 00:00:00
PI040298AA3I002001,-3.19,55.95,Grow,Soil,002,2018-01-01 00:00:00,2018-03-01 00:00:00
\"Latitude:51.5,Longitude:-0.1,\",999,0,Grow,Soil,003,2018-01-01 00:00:00,2018-02-01 00:00:00
PI040299AA3I003003,0,0,Grow,Soil,004,2018-01-01 00:00:00,2018-02-01 00:00:00
";

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let csv = dir.join("GrowLocations.csv");
    fs::write(&csv, LOCATIONS_CSV).unwrap();

    let map = dir.join("map7.png");
    ImageBuffer::from_pixel(120, 90, Rgb([170u8, 211, 223]))
        .save(&map)
        .unwrap();

    (csv, map)
}

fn test_config(mode: PipelineMode) -> AppConfig {
    AppConfig {
        mode,
        render: RenderOptions {
            width: 300,
            height: 300,
            draw_axes: false,
            ..RenderOptions::default()
        },
        ..AppConfig::default()
    }
}

#[test]
fn test_recovery_then_deduplication_prefers_newer_row() {
    let readings = vec![
        SensorReading::new(
            "A",
            999.0,
            0.0,
            Some(EndTime::Numeric(1.0)),
            "Latitude:51.5,Longitude:-0.1,",
        ),
        SensorReading::new("A", 51.4, -0.2, Some(EndTime::Numeric(2.0)), ""),
    ];

    let (cleaned, _) = clean_readings(readings, &BoundingBox::uk());

    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].serial, "A");
    assert_eq!(cleaned[0].end_time, Some(EndTime::Numeric(2.0)));
    assert_eq!(cleaned[0].position(), (51.4, -0.2));
}

#[test]
fn test_column_swap_moves_point_into_uk() {
    let readings = vec![SensorReading::new("S", -0.05, 51.5, None, "")];
    let mut table = LocationTable::new(ColumnMapping::default(), readings);
    let bbox = BoundingBox::uk();

    assert!(!bbox.contains_reading(&table.readings()[0]));
    table.swap_coordinate_columns();

    assert_eq!(table.readings()[0].position(), (51.5, -0.05));
    assert!(bbox.contains_reading(&table.readings()[0]));
}

#[test]
fn test_pipeline_modes_on_file_data() {
    let table = LocationReader::new()
        .read_from(LOCATIONS_CSV.as_bytes())
        .unwrap();

    // As labelled, only the recovered row lands in the UK
    let (cleaned, report) = CleaningPipeline::new(PipelineMode::Cleaned).run(table.clone());
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned.readings()[0].position(), (51.5, -0.1));
    assert_eq!(report.cleaning.unwrap().recovered_records, 1);

    // Swapped, every row is kept for plotting
    let (raw, report) = CleaningPipeline::new(PipelineMode::RawSwapped).run(table.clone());
    assert_eq!(raw.len(), 5);
    assert!(report.cleaning.is_none());
    assert_eq!(report.latitude_column, "Longitude");

    // Swapped then cleaned: one row per serial inside the box. Embedded
    // coordinates carry their own labels, so recovery still applies.
    let (swapped, _) = CleaningPipeline::new(PipelineMode::SwappedCleaned).run(table);
    let serials: Vec<&str> = swapped.readings().iter().map(|r| r.serial.as_str()).collect();
    assert_eq!(
        serials,
        vec![
            "PI040297AA3I001108",
            "PI040298AA3I002001",
            "Latitude:51.5,Longitude:-0.1,"
        ]
    );
    assert_eq!(swapped.readings()[0].position(), (52.49, -1.93));
    assert_eq!(swapped.readings()[2].position(), (51.5, -0.1));
}

#[test]
fn test_run_plot_end_to_end() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let (csv, map) = write_inputs(dir.path());

    let paths = PlotPaths {
        input: csv,
        basemap: map,
        output: dir.path().join("output").join("output.png"),
        summary: Some(dir.path().join("output").join("output.json")),
    };

    let summary = run_plot(
        &test_config(PipelineMode::RawSwapped),
        &paths,
        &ProgressReporter::silent(),
    )
    .unwrap();

    assert_eq!(summary.pipeline.mode, PipelineMode::RawSwapped);
    assert!(summary.pipeline.coordinates_swapped);
    assert_eq!(summary.render.plotted_points, 3);
    assert_eq!(summary.render.hidden_points, 2);

    let rendered = image::open(&paths.output).unwrap();
    assert_eq!(rendered.dimensions(), (300, 300));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(paths.summary.unwrap()).unwrap()).unwrap();
    assert_eq!(json["pipeline"]["mode"], "raw-swapped");
}

#[test]
fn test_run_plot_cleaned_mode() {
    let dir = TempDir::new().unwrap();
    let (csv, map) = write_inputs(dir.path());

    let paths = PlotPaths {
        input: csv,
        basemap: map,
        output: dir.path().join("cleaned.png"),
        summary: None,
    };

    let summary = run_plot(
        &test_config(PipelineMode::Cleaned),
        &paths,
        &ProgressReporter::silent(),
    )
    .unwrap();

    assert!(!summary.pipeline.coordinates_swapped);
    assert_eq!(summary.pipeline.output_records, 1);
    assert_eq!(summary.render.plotted_points, 1);
    assert!(paths.output.exists());
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let (_, map) = write_inputs(dir.path());

    let paths = PlotPaths {
        input: dir.path().join("missing.csv"),
        basemap: map,
        output: dir.path().join("never.png"),
        summary: None,
    };

    let err = run_plot(
        &test_config(PipelineMode::Cleaned),
        &paths,
        &ProgressReporter::silent(),
    )
    .unwrap_err();

    assert!(matches!(err, ProcessingError::Io(_)));
    assert!(!paths.output.exists());
}
