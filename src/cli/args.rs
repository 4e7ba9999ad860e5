use crate::models::PipelineMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grow-locations")]
#[command(about = "Clean the GROW sensor locations dataset and plot it over a UK basemap")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean the locations table and render it over the basemap
    Plot {
        #[arg(short, long, help = "Input locations CSV (e.g. GrowLocations.csv)")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Basemap image covering the bounding box")]
        basemap: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output PNG path [default: output/grow-locations-{YYMMDD}.png]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, help = "Pipeline mode [default: raw-swapped]")]
        mode: Option<PipelineMode>,

        #[arg(long, help = "Write a JSON run summary to this path")]
        summary: Option<PathBuf>,

        #[arg(long, help = "Write the JSON run summary next to the output PNG")]
        write_summary: bool,

        #[arg(long, help = "Render without caption and axis labels")]
        no_axes: bool,
    },

    /// Print data-quality diagnostics for the locations table
    Inspect {
        #[arg(short, long, help = "Input locations CSV")]
        input: Option<PathBuf>,

        #[arg(long, default_value = "10", help = "Rows to list per diagnostic")]
        top: usize,
    },
}
