use std::path::PathBuf;

use crate::frame::PixelOffset;
use crate::stack::StackMode;
use crate::time::Timestamp;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug)]
pub enum PipelineStage {
    Fetching,
    Normalizing,
    Cropping,
    Stacking,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetching => write!(f, "Fetching frames"),
            Self::Normalizing => write!(f, "Normalizing frames"),
            Self::Cropping => write!(f, "Locating body and cropping"),
            Self::Stacking => write!(f, "Stacking"),
            Self::Writing => write!(f, "Writing results"),
        }
    }
}

/// Progress reporting for the pipeline.
///
/// Implementors can drive progress bars or any other UI feedback. All
/// methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// How a single frame fared. Per-frame failures never abort the batch; they
/// are collected here and reported after the run.
#[derive(Clone, Debug)]
pub enum FrameOutcome {
    /// The frame's crop made it into the stack, centered on this pixel of
    /// the upsampled grid.
    Stacked { center: PixelOffset },
    /// The frame was dropped; the reason identifies the failing phase.
    Skipped { reason: String },
}

#[derive(Clone, Debug)]
pub struct FrameReport {
    pub timestamp: Timestamp,
    pub outcome: FrameOutcome,
}

/// Aggregated result of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub frames: Vec<FrameReport>,
    /// One output per stacking mode.
    pub outputs: Vec<(StackMode, PathBuf)>,
}

impl RunReport {
    pub fn stacked_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f.outcome, FrameOutcome::Stacked { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.frames.len() - self.stacked_count()
    }
}
