use std::path::Path;

use image::{ImageFormat, Luma};
use ndarray::Array2;

use crate::error::Result;
use crate::frame::Frame;

/// Save a frame as 16-bit grayscale PNG.
///
/// 16 bits keeps the requantization of interpolated values well below the
/// 8-bit source's step size.
pub fn save_png16(frame: &Frame, path: &Path) -> Result<()> {
    let h = frame.height();
    let w = frame.width();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            let val = (frame.data[[row, col]].clamp(0.0, 1.0) * 65535.0) as u16;
            pixels.push(val);
        }
    }

    let img = image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .expect("buffer size matches dimensions");
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load a grayscale image file into a Frame, mapping to [0, 1].
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32 / 65535.0;
        }
    }

    Ok(Frame::new(data))
}
