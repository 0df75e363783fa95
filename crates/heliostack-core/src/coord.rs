use crate::error::{HeliostackError, Result};
use crate::frame::{AngularOffset, PixelOffset};

/// Convert a body's angular offset from the Sun into pixel coordinates
/// within an upsampled, north-up, Sun-centered image.
///
/// `pixel_scale` is the instrument's angular pixel scale (arcsec/pixel) at
/// the *original* resolution; `upsample_ratio` is target/original size, so
/// the effective scale of the upsampled grid is `pixel_scale / ratio`.
/// `center` is the Sun-center pixel of the upsampled grid.
///
/// The vertical sign flip converts "north is positive-up" angular convention
/// into "row index increases downward" raster convention.
pub fn project(
    offset: AngularOffset,
    pixel_scale: f64,
    upsample_ratio: f64,
    center: (i64, i64),
) -> Result<PixelOffset> {
    if pixel_scale == 0.0 || !pixel_scale.is_finite() {
        return Err(HeliostackError::InvalidScale(format!(
            "pixel scale must be finite and non-zero, got {pixel_scale}"
        )));
    }
    if !offset.tx_arcsec.is_finite() || !offset.ty_arcsec.is_finite() {
        return Err(HeliostackError::InvalidScale(format!(
            "non-finite angular offset ({}, {})",
            offset.tx_arcsec, offset.ty_arcsec
        )));
    }

    let x = (offset.tx_arcsec * upsample_ratio / pixel_scale).round() as i64 + center.0;
    let y = (-offset.ty_arcsec * upsample_ratio / pixel_scale).round() as i64 + center.1;
    Ok(PixelOffset { x, y })
}
