pub mod mean;
pub mod median;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{HeliostackError, Result};

pub use mean::mean_stack;
pub use median::median_stack;

/// Pixel combination mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackMode {
    Mean,
    Median,
}

impl std::fmt::Display for StackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Median => write!(f, "median"),
        }
    }
}

/// Combine aligned crops into one raster.
///
/// All crops must share one shape; mismatches are a caller error (the
/// orchestrator drops undersized edge crops before they get here). An empty
/// sequence is fatal.
pub fn combine(crops: &[Array2<f32>], mode: StackMode) -> Result<Array2<f32>> {
    validate_shapes(crops)?;
    match mode {
        StackMode::Mean => mean_stack(crops),
        StackMode::Median => median_stack(crops),
    }
}

pub(crate) fn validate_shapes(crops: &[Array2<f32>]) -> Result<()> {
    let first = match crops.first() {
        Some(c) => c.dim(),
        None => return Err(HeliostackError::EmptySequence),
    };
    for crop in &crops[1..] {
        let dim = crop.dim();
        if dim != first {
            return Err(HeliostackError::ShapeMismatch {
                expected_h: first.0,
                expected_w: first.1,
                got_h: dim.0,
                got_w: dim.1,
            });
        }
    }
    Ok(())
}
