use crate::error::{ProcessingError, Result};
use crate::models::{BoundingBox, SensorReading};
use crate::readers::Basemap;
use crate::utils::constants::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_CAPTION, DEFAULT_MARKER_SIZE,
};
use image::imageops::FilterType;
use plotters::element::BitMapElement;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use validator::{Validate, ValidationError};

/// matplotlib's default scatter colour
const MARKER_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Text needs a font backend, which only the `ttf` feature compiles in
const FONTS_AVAILABLE: bool = cfg!(feature = "ttf");

fn render_error<E: std::fmt::Display>(err: E) -> ProcessingError {
    ProcessingError::Render(err.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_margin"))]
pub struct RenderOptions {
    #[validate(range(min = 16, max = 16384))]
    pub width: u32,

    #[validate(range(min = 16, max = 16384))]
    pub height: u32,

    #[validate(range(min = 1, max = 50))]
    pub marker_size: u32,

    #[validate(range(max = 8192))]
    pub margin: u32,

    /// Caption, axis ticks and axis labels. Ignored without the `ttf` feature.
    pub draw_axes: bool,

    pub caption: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            marker_size: DEFAULT_MARKER_SIZE,
            margin: 10,
            draw_axes: true,
            caption: DEFAULT_CAPTION.to_string(),
        }
    }
}

/// Margins on both sides must leave room for the plot area
fn validate_margin(options: &RenderOptions) -> std::result::Result<(), ValidationError> {
    let shortest = options.width.min(options.height);
    if options.margin.saturating_mul(2) >= shortest {
        let mut err = ValidationError::new("margin_exceeds_canvas");
        err.message = Some(
            format!(
                "margin {} leaves no plot area on a {}x{} canvas",
                options.margin, options.width, options.height
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub plotted_points: usize,
    /// Points outside the axis limits; not drawn
    pub hidden_points: usize,
}

/// Draws sensor positions over a basemap with axes pinned to a bounding box
pub struct MapRenderer {
    bounds: BoundingBox,
    options: RenderOptions,
}

impl MapRenderer {
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn render(
        &self,
        readings: &[SensorReading],
        basemap: &Basemap,
        output: &Path,
    ) -> Result<RenderStats> {
        self.options.validate()?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        if basemap.extent != self.bounds {
            warn!(
                basemap = ?basemap.extent.extent(),
                axes = ?self.bounds.extent(),
                "basemap extent differs from axis limits"
            );
        }

        let (visible, hidden): (Vec<&SensorReading>, Vec<&SensorReading>) = readings
            .iter()
            .partition(|r| self.bounds.contains_reading(r));

        let root = BitMapBackend::new(output, (self.options.width, self.options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let draw_text = self.options.draw_axes && FONTS_AVAILABLE;
        if self.options.draw_axes && !FONTS_AVAILABLE {
            warn!("built without the `ttf` feature, drawing the map without caption or axis labels");
        }

        let mut builder = ChartBuilder::on(&root);
        builder.margin(self.options.margin);
        if draw_text {
            builder
                .caption(&self.options.caption, ("sans-serif", 24))
                .x_label_area_size(40)
                .y_label_area_size(50);
        }

        let mut chart = builder
            .build_cartesian_2d(self.bounds.lon_range(), self.bounds.lat_range())
            .map_err(render_error)?;

        if draw_text {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("Longitude")
                .y_desc("Latitude")
                .draw()
                .map_err(render_error)?;
        }

        // Stretch the basemap over its geographic extent
        let extent = basemap.extent;
        let (left, top) = chart.backend_coord(&(extent.lon_min, extent.lat_max));
        let (right, bottom) = chart.backend_coord(&(extent.lon_max, extent.lat_min));
        let pixel_width = (right - left).max(1) as u32;
        let pixel_height = (bottom - top).max(1) as u32;

        let stretched = basemap
            .image
            .resize_exact(pixel_width, pixel_height, FilterType::Triangle);
        let background: BitMapElement<_> = ((extent.lon_min, extent.lat_max), stretched).into();
        chart
            .draw_series(std::iter::once(background))
            .map_err(render_error)?;

        let marker_size = self.options.marker_size;
        chart
            .draw_series(visible.iter().map(|r| {
                Circle::new((r.longitude, r.latitude), marker_size, MARKER_COLOR.filled())
            }))
            .map_err(render_error)?;

        root.present().map_err(render_error)?;

        let stats = RenderStats {
            plotted_points: visible.len(),
            hidden_points: hidden.len(),
        };
        info!(
            path = %output.display(),
            plotted = stats.plotted_points,
            hidden = stats.hidden_points,
            "rendered location map"
        );

        Ok(stats)
    }
}
