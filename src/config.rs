use crate::error::{ProcessingError, Result};
use crate::models::{BoundingBox, ColumnMapping, PipelineMode};
use crate::utils::constants::ENV_PREFIX;
use crate::writers::RenderOptions;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Settings for a run, layered from defaults, an optional TOML file and
/// `GROW_*` environment variables (nested keys use `__`, e.g.
/// `GROW_BOUNDS__LON_MIN`). Command-line flags are applied on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    pub input: Option<PathBuf>,
    pub basemap: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub summary: Option<PathBuf>,

    pub mode: PipelineMode,

    #[validate(length(equal = 1))]
    pub delimiter: String,

    pub columns: ColumnMapping,

    pub bounds: BoundingBox,

    #[validate(nested)]
    pub render: RenderOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: None,
            basemap: None,
            output: None,
            summary: None,
            mode: PipelineMode::default(),
            delimiter: ",".to_string(),
            columns: ColumnMapping::default(),
            bounds: BoundingBox::uk(),
            render: RenderOptions::default(),
        }
    }
}

impl AppConfig {
    /// Layer defaults, the optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ProcessingError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.check()?;

        debug!(?config, "loaded configuration");
        Ok(config)
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.bounds.check()?;
        self.delimiter_byte()?;
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ProcessingError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}
