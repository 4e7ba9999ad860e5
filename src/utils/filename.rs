use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Generate default plot filename with format: grow-locations-{YYMMDD}.png
pub fn generate_default_plot_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100;

    let filename = format!(
        "grow-locations-{:02}{:02}{:02}.png",
        year,
        now.month(),
        now.day()
    );
    PathBuf::from("output").join(filename)
}

/// Sidecar path for the JSON run summary next to a rendered plot
pub fn summary_path_for(plot: &Path) -> PathBuf {
    plot.with_extension("json")
}
