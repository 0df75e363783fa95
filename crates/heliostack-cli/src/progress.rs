use std::sync::Mutex;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use heliostack_core::pipeline::{PipelineStage, ProgressReporter};

/// Drives one indicatif bar per pipeline stage.
pub struct CliReporter {
    style: ProgressStyle,
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Result<Self> {
        let style = ProgressStyle::default_bar()
            .template("{msg:28} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> ");
        Ok(Self {
            style,
            bar: Mutex::new(None),
        })
    }
}

impl ProgressReporter for CliReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        let pb = match total_items {
            Some(total) => ProgressBar::new(total as u64),
            None => ProgressBar::new_spinner(),
        };
        pb.set_style(self.style.clone());
        pb.set_message(stage.to_string());
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(pb);
        }
    }

    fn advance(&self, items_done: usize) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.set_position(items_done as u64);
            }
        }
    }

    fn finish_stage(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish();
            }
        }
    }
}
