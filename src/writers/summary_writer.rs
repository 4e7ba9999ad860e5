use crate::error::Result;
use crate::processors::PipelineReport;
use crate::writers::RenderStats;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Record of one plot run: inputs, the chosen pipeline mode and its counts
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Local>,
    pub input: PathBuf,
    pub basemap: PathBuf,
    pub output: PathBuf,
    pub pipeline: PipelineReport,
    pub render: RenderStats,
}

impl RunSummary {
    pub fn new(
        input: &Path,
        basemap: &Path,
        output: &Path,
        pipeline: PipelineReport,
        render: RenderStats,
    ) -> Self {
        Self {
            generated_at: Local::now(),
            input: input.to_path_buf(),
            basemap: basemap.to_path_buf(),
            output: output.to_path_buf(),
            pipeline,
            render,
        }
    }

    pub fn summary(&self) -> String {
        let mut text = String::new();
        text.push_str("=== Plot Run Summary ===\n");
        text.push_str(&format!("Mode: {}\n", self.pipeline.mode));
        text.push_str(&format!(
            "Latitude read from '{}', longitude read from '{}'\n",
            self.pipeline.latitude_column, self.pipeline.longitude_column
        ));
        text.push_str(&format!(
            "Loaded: {} rows, {} serials\n",
            self.pipeline.loaded_records, self.pipeline.loaded_serials
        ));
        match &self.pipeline.cleaning {
            Some(counts) => text.push_str(&format!(
                "Cleaning: {} recovered, {} in bounds, {} after deduplication\n",
                counts.recovered_records, counts.in_bounds_records, counts.output_records
            )),
            None => text.push_str("Cleaning: skipped\n"),
        }
        text.push_str(&format!(
            "Plotted: {} points ({} outside the axes)\n",
            self.render.plotted_points, self.render.hidden_points
        ));
        text.push_str(&format!("Output: {}\n", self.output.display()));
        text
    }
}

pub struct SummaryWriter;

impl SummaryWriter {
    pub fn write(summary: &RunSummary, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, summary)?;

        info!(path = %path.display(), mode = %summary.pipeline.mode, "wrote run summary");
        Ok(())
    }
}
