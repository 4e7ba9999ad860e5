use crate::error::Result;
use crate::models::BoundingBox;
use image::{DynamicImage, GenericImageView};
use std::path::Path;
use tracing::info;

/// A raster reference map and the geographic extent it covers
#[derive(Debug, Clone)]
pub struct Basemap {
    pub image: DynamicImage,
    pub extent: BoundingBox,
}

impl Basemap {
    pub fn new(image: DynamicImage, extent: BoundingBox) -> Self {
        Self { image, extent }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Loads basemap images in any format the `image` crate can decode
pub struct BasemapReader {
    extent: BoundingBox,
}

impl BasemapReader {
    pub fn new(extent: BoundingBox) -> Self {
        Self { extent }
    }

    pub fn read_basemap(&self, path: &Path) -> Result<Basemap> {
        let reader = image::io::Reader::open(path)?.with_guessed_format()?;
        let image = reader.decode()?;

        let (width, height) = image.dimensions();
        info!(
            path = %path.display(),
            width,
            height,
            extent = ?self.extent.extent(),
            "loaded basemap"
        );

        Ok(Basemap::new(image, self.extent))
    }
}

impl Default for BasemapReader {
    fn default() -> Self {
        Self::new(BoundingBox::uk())
    }
}
