use ndarray::Array2;

use heliostack_core::frame::{Frame, Observer, SkyFrame, SkyImage};
use heliostack_core::time::Timestamp;

/// Default acquisition time used by fixtures.
pub fn test_time() -> Timestamp {
    Timestamp::parse("2025-10-17 00:00").expect("valid fixture timestamp")
}

/// SkyFrame with the Sun at the reference pixel.
pub fn test_skyframe(rotation_deg: f64, ref_pixel: (f64, f64)) -> SkyFrame {
    SkyFrame {
        obstime: test_time(),
        observer: Some(Observer {
            lon_deg: 0.12,
            lat_deg: 5.3,
            dsun_m: 1.48e11,
        }),
        scale: 56.0,
        rotation_deg,
        ref_pixel,
        ref_coord: (0.0, 0.0),
    }
}

/// Dark square raster with one bright pixel planted at (row, col).
pub fn frame_with_blob(size: usize, row: usize, col: usize) -> Frame {
    let mut data = Array2::from_elem((size, size), 0.1f32);
    data[[row, col]] = 0.9;
    Frame::new(data)
}

/// SkyImage fixture: blob at (row, col), Sun at `ref_pixel`.
pub fn sky_image_with_blob(
    size: usize,
    row: usize,
    col: usize,
    rotation_deg: f64,
    ref_pixel: (f64, f64),
) -> SkyImage {
    SkyImage {
        frame: frame_with_blob(size, row, col),
        wcs: test_skyframe(rotation_deg, ref_pixel),
    }
}

/// Index of the brightest pixel, (row, col).
pub fn argmax(data: &Array2<f32>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f32::NEG_INFINITY;
    for ((r, c), &v) in data.indexed_iter() {
        if v > best_val {
            best_val = v;
            best = (r, c);
        }
    }
    best
}
