pub mod adjudication_pipeline;
pub mod time_pipeline;

pub use adjudication_pipeline::{AdjudicationPipeline, ReportOptions};
pub use time_pipeline::TimeSumPipeline;
