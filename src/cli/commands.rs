use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::models::LocationTable;
use crate::processors::{CleaningPipeline, CoordinateValidator};
use crate::readers::{BasemapReader, LocationReader};
use crate::utils::filename::{generate_default_plot_filename, summary_path_for};
use crate::utils::progress::ProgressReporter;
use crate::writers::{MapRenderer, RunSummary, SummaryWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// `--verbose`.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("grow_locations={}", level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| ProcessingError::Config(format!("logging: {}", e)))
}

/// File locations for one plot run
#[derive(Debug, Clone)]
pub struct PlotPaths {
    pub input: PathBuf,
    pub basemap: PathBuf,
    pub output: PathBuf,
    pub summary: Option<PathBuf>,
}

fn load_table(config: &AppConfig, input: &Path) -> Result<LocationTable> {
    LocationReader::new()
        .with_mapping(config.columns.clone())
        .with_delimiter(config.delimiter_byte()?)
        .read_table(input)
}

/// Load, clean (per the configured mode), render and optionally record the run
pub fn run_plot(
    config: &AppConfig,
    paths: &PlotPaths,
    progress: &ProgressReporter,
) -> Result<RunSummary> {
    info!(
        mode = %config.mode,
        input = %paths.input.display(),
        output = %paths.output.display(),
        "starting plot run"
    );

    progress.set_message("Reading locations...");
    let table = load_table(config, &paths.input)?;

    progress.set_message("Reading basemap...");
    let basemap = BasemapReader::new(config.bounds).read_basemap(&paths.basemap)?;

    progress.set_message(&format!("Running {} pipeline...", config.mode));
    let pipeline = CleaningPipeline::new(config.mode).with_bounds(config.bounds);
    let (table, report) = pipeline.run(table);

    progress.println(&CoordinateValidator::new(config.bounds).generate_summary(&report.validation));

    progress.set_message("Rendering map...");
    let render = MapRenderer::new(config.bounds)
        .with_options(config.render.clone())
        .render(table.readings(), &basemap, &paths.output)?;

    let summary = RunSummary::new(&paths.input, &paths.basemap, &paths.output, report, render);
    if let Some(path) = &paths.summary {
        SummaryWriter::write(&summary, path)?;
    }

    progress.finish_with_message(&format!(
        "Plotted {} sensors to {}",
        render.plotted_points,
        paths.output.display()
    ));

    Ok(summary)
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Plot {
            input,
            basemap,
            output,
            mode,
            summary,
            write_summary,
            no_axes,
        } => {
            if let Some(mode) = mode {
                config.mode = mode;
            }
            if no_axes {
                config.render.draw_axes = false;
            }

            let input = input.or_else(|| config.input.clone()).ok_or_else(|| {
                ProcessingError::MissingData("input CSV (--input or `input` in config)".to_string())
            })?;
            let basemap = basemap.or_else(|| config.basemap.clone()).ok_or_else(|| {
                ProcessingError::MissingData("basemap image (--basemap or `basemap` in config)".to_string())
            })?;
            let output = output
                .or_else(|| config.output.clone())
                .unwrap_or_else(generate_default_plot_filename);
            let summary = summary
                .or_else(|| config.summary.clone())
                .or_else(|| write_summary.then(|| summary_path_for(&output)));

            println!("Plotting sensor locations ({} mode)", config.mode);
            println!("Input: {}", input.display());
            println!("Basemap: {}", basemap.display());

            let paths = PlotPaths {
                input,
                basemap,
                output,
                summary,
            };
            let progress = ProgressReporter::new_spinner("Starting...", false);
            let run_summary = run_plot(&config, &paths, &progress)?;

            println!("\n{}", run_summary.summary());
        }

        Commands::Inspect { input, top } => {
            let input = input.or_else(|| config.input.clone()).ok_or_else(|| {
                ProcessingError::MissingData("input CSV (--input or `input` in config)".to_string())
            })?;

            println!("Inspecting locations table: {}", input.display());
            let table = load_table(&config, &input)?;

            let stats = DatasetAnalyzer::new(config.bounds)
                .with_top_n(top)
                .analyze(&table);
            println!("\n{}", stats.detailed_summary());
        }
    }

    Ok(())
}
