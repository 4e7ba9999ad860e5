pub mod map_renderer;
pub mod summary_writer;

pub use map_renderer::{MapRenderer, RenderOptions, RenderStats};
pub use summary_writer::{RunSummary, SummaryWriter};
