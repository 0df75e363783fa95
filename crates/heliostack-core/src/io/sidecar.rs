use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::frame::SkyFrame;

/// Sidecar path for a raster: same name with `.json` appended
/// (`Fixed_LASCO_C3_2025-10-17_00h00m.png.json`).
pub fn sidecar_path(raster_path: &Path) -> PathBuf {
    let mut os = raster_path.as_os_str().to_owned();
    os.push(".json");
    PathBuf::from(os)
}

/// Write the coordinate metadata for a persisted raster.
pub fn save_sidecar(raster_path: &Path, wcs: &SkyFrame) -> Result<()> {
    let json = serde_json::to_string_pretty(wcs)?;
    fs::write(sidecar_path(raster_path), json)?;
    Ok(())
}

/// Read the coordinate metadata for a persisted raster.
pub fn load_sidecar(raster_path: &Path) -> Result<SkyFrame> {
    let json = fs::read_to_string(sidecar_path(raster_path))?;
    Ok(serde_json::from_str(&json)?)
}
