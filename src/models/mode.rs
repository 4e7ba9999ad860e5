use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which interpretation of the locations table gets plotted.
///
/// The column labels in the GROW export are unreliable. Comparing plots
/// against the reference map showed that reading "Latitude" as longitude
/// (and vice versa) gives the expected distribution, so `RawSwapped` is the
/// default. That the swap affects every row is an assumption; batches that
/// were exported correctly would be swapped too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineMode {
    /// Nominal labels; recover, filter to the bounding box, deduplicate
    Cleaned,
    /// Swap latitude/longitude labels and plot every row as loaded
    #[default]
    RawSwapped,
    /// Swap latitude/longitude labels, then recover, filter and deduplicate
    SwappedCleaned,
}

impl PipelineMode {
    pub fn swaps_columns(&self) -> bool {
        matches!(self, PipelineMode::RawSwapped | PipelineMode::SwappedCleaned)
    }

    pub fn cleans(&self) -> bool {
        matches!(self, PipelineMode::Cleaned | PipelineMode::SwappedCleaned)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::Cleaned => "cleaned",
            PipelineMode::RawSwapped => "raw-swapped",
            PipelineMode::SwappedCleaned => "swapped-cleaned",
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
