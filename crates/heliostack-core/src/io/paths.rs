use std::path::{Path, PathBuf};

use crate::time::Timestamp;

/// Subdirectory of the data dir holding normalized images.
pub const FIXED_SUBDIR: &str = "Fixed";

/// Prefix marking a normalized image.
pub const FIXED_PREFIX: &str = "Fixed_";

/// Subdirectory of the data dir holding body-marked images.
pub const MARKED_SUBDIR: &str = "Marked";

/// Prefix marking a body-marked image.
pub const MARKED_PREFIX: &str = "Marked_";

/// Raw image path: `<dir>/<instrument>_<stamp>.png`.
pub fn raw_image_path(dir: &Path, instrument: &str, ts: &Timestamp) -> PathBuf {
    dir.join(format!("{}_{}.png", instrument, ts.file_stamp()))
}

/// Normalized image path: `<dir>/Fixed/Fixed_<instrument>_<stamp>.png`.
pub fn fixed_image_path(dir: &Path, instrument: &str, ts: &Timestamp) -> PathBuf {
    dir.join(FIXED_SUBDIR).join(format!(
        "{}{}_{}.png",
        FIXED_PREFIX,
        instrument,
        ts.file_stamp()
    ))
}

/// Body-marked image path: `<dir>/Marked/Marked_<instrument>_<stamp>.png`.
pub fn marked_image_path(dir: &Path, instrument: &str, ts: &Timestamp) -> PathBuf {
    dir.join(MARKED_SUBDIR).join(format!(
        "{}{}_{}.png",
        MARKED_PREFIX,
        instrument,
        ts.file_stamp()
    ))
}

/// Stacked output path: `<results_dir>/<mode>_stack.png`.
pub fn stack_result_path(results_dir: &Path, mode: crate::stack::StackMode) -> PathBuf {
    results_dir.join(format!("{mode}_stack.png"))
}
