use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Full configuration for one stacking run.
///
/// The pixel scale is explicit configuration rather than a baked-in
/// constant: a different instrument or archive resolution would silently
/// produce wrong body offsets otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// First sampling instant.
    pub start: Timestamp,
    /// Last sampling instant (inclusive).
    pub end: Timestamp,
    /// Sampling interval in hours; fractional values allowed.
    #[serde(default = "default_interval_hours")]
    pub interval_hours: f64,
    /// Tracked solar-system body, e.g. "C/2025 N1".
    pub body: String,
    /// Instrument identifier used in filenames.
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// Directory for raw and normalized images.
    pub data_dir: PathBuf,
    /// Directory for stacked outputs.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Side length of the square crop around the body, in upsampled pixels.
    #[serde(default = "default_crop_size")]
    pub crop_size: usize,
    /// Side length of the upsampled working grid.
    #[serde(default = "default_upsample_size")]
    pub upsample_size: u32,
    /// Angular pixel scale of the source instrument at original resolution,
    /// arcsec/pixel. LASCO C3 archive images are ~56"/px at 1024x1024.
    #[serde(default = "default_pixel_scale")]
    pub pixel_scale: f64,
}

fn default_interval_hours() -> f64 {
    1.0
}

fn default_instrument() -> String {
    "LASCO_C3".to_string()
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("stack_results")
}

fn default_crop_size() -> usize {
    200
}

fn default_upsample_size() -> u32 {
    4096
}

fn default_pixel_scale() -> f64 {
    56.0
}
