pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::run_pipeline;
pub use types::{
    FrameOutcome, FrameReport, NoOpReporter, PipelineStage, ProgressReporter, RunReport,
};
