use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use ndarray::Array2;
use tracing::info;

use crate::error::Result;

/// Gap between the image and the colorbar, in pixels.
const COLORBAR_MARGIN: u32 = 12;

/// Width of the colorbar strip, in pixels.
const COLORBAR_WIDTH: u32 = 16;

/// Half-width of the hollow marker square, in pixels.
const MARKER_HALF: i64 = 12;

/// Rescale a combined raster to [0, 255] using its own min/max and truncate
/// to 8 bits. A flat raster comes back all zero rather than erroring.
pub fn normalize_to_display(raster: &Array2<f32>) -> Array2<u8> {
    let min = raster.iter().copied().fold(f32::INFINITY, f32::min);
    let max = raster.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    if max - min <= 0.0 {
        return Array2::<u8>::zeros(raster.dim());
    }
    raster.mapv(|v| ((v - min) / (max - min) * 255.0) as u8)
}

/// Persist a stacked raster as an 8-bit PNG with a brightness colorbar
/// strip along the right edge. The label is presentation metadata only; it
/// goes to the log, not into the pixels.
pub fn export(raster: &Array2<f32>, path: &Path, label: &str) -> Result<()> {
    let display = normalize_to_display(raster);
    let (h, w) = display.dim();

    let out_w = w as u32 + COLORBAR_MARGIN + COLORBAR_WIDTH;
    let mut img = GrayImage::new(out_w, h as u32);

    for row in 0..h {
        for col in 0..w {
            img.put_pixel(col as u32, row as u32, Luma([display[[row, col]]]));
        }
    }

    // Brightness legend: full display range, brightest at the top.
    for row in 0..h as u32 {
        let val = (255.0 * (1.0 - row as f32 / (h as f32 - 1.0).max(1.0))) as u8;
        for col in 0..COLORBAR_WIDTH {
            img.put_pixel(w as u32 + COLORBAR_MARGIN + col, row, Luma([val]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    info!(path = %path.display(), label, "stack result exported");
    Ok(())
}

/// Persist a full-FOV frame as an 8-bit PNG with a hollow square marking
/// the body's predicted pixel position.
///
/// Only the outline is drawn, at the display maximum; pixels inside the
/// square keep their values so the body itself stays visible. A marker
/// partly or fully outside the field is clipped.
pub fn export_marked(raster: &Array2<f32>, mark: (i64, i64), path: &Path) -> Result<()> {
    let mut display = normalize_to_display(raster);
    let (h, w) = display.dim();
    let (mx, my) = mark;

    {
        let mut put = |x: i64, y: i64| {
            if x >= 0 && x < w as i64 && y >= 0 && y < h as i64 {
                display[[y as usize, x as usize]] = 255;
            }
        };
        for d in -MARKER_HALF..=MARKER_HALF {
            put(mx + d, my - MARKER_HALF);
            put(mx + d, my + MARKER_HALF);
            put(mx - MARKER_HALF, my + d);
            put(mx + MARKER_HALF, my + d);
        }
    }

    let mut img = GrayImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            img.put_pixel(col as u32, row as u32, Luma([display[[row, col]]]));
        }
    }
    img.save_with_format(path, ImageFormat::Png)?;
    info!(path = %path.display(), x = mx, y = my, "marked frame exported");
    Ok(())
}
