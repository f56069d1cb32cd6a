pub mod debounce;
pub mod filter;
pub mod pipeline;

pub use filter::filter_stocks;
pub use pipeline::{PipelineSettings, SearchPipeline};
