use std::path::Path;

use image::imageops::FilterType;
use image::GrayImage;
use ndarray::Array2;

use crate::error::{HeliostackError, Result};

/// A raster upsampled to the working grid, with the ratio the coordinate
/// projector needs to rescale angular offsets.
#[derive(Clone, Debug)]
pub struct UpsampledRaster {
    pub data: Array2<f32>,
    /// target_size / original_size.
    pub ratio: f64,
}

/// Load the intensity band of `path` as f32 and upsample it to
/// `target_size` x `target_size` with Lanczos interpolation.
///
/// The float data is linearly quantized to u8 for the resampling pass (a
/// small quantization error in exchange for a proper windowed-sinc filter;
/// bilinear or nearest resampling aliases badly enough to corrupt
/// faint-signal stacks) and mapped back to the original min/max afterwards,
/// so stacked results stay comparable across frames. A flat image (max ==
/// min) yields an all-zero upsampled raster rather than a division by zero.
pub fn load_and_upsample(path: &Path, target_size: u32) -> Result<UpsampledRaster> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    if w != h || w == 0 {
        return Err(HeliostackError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        });
    }

    let raw: Vec<f32> = gray.pixels().map(|p| p.0[0] as f32 / 65535.0).collect();
    let min = raw.iter().copied().fold(f32::INFINITY, f32::min);
    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let ratio = target_size as f64 / w as f64;

    let size = target_size as usize;
    if max - min <= 0.0 {
        return Ok(UpsampledRaster {
            data: Array2::<f32>::zeros((size, size)),
            ratio,
        });
    }

    let quantized: Vec<u8> = raw
        .iter()
        .map(|&v| ((v - min) / (max - min) * 255.0).round() as u8)
        .collect();
    let small = GrayImage::from_raw(w, h, quantized).expect("buffer size matches dimensions");
    let up = image::imageops::resize(&small, target_size, target_size, FilterType::Lanczos3);

    let mut data = Array2::<f32>::zeros((size, size));
    for (col, row, pixel) in up.enumerate_pixels() {
        data[[row as usize, col as usize]] = pixel.0[0] as f32 / 255.0 * (max - min) + min;
    }

    Ok(UpsampledRaster { data, ratio })
}
