use ndarray::Array2;

/// Extract a `size`x`size` window centered on (`center_x`, `center_y`).
///
/// The window is `[c - size/2, c - size/2 + size)` on each axis, clipped to
/// the image bounds ("trim" policy: crops near an edge come back smaller on
/// that side, never padded). For odd `size` the integer half-width biases
/// the window by one pixel; this matches the observed behavior of the
/// instrument pipeline and is left as-is.
///
/// Callers that need exactly `size`x`size` output (stacking does) must check
/// the returned shape.
pub fn crop_region(image: &Array2<f32>, center_x: i64, center_y: i64, size: usize) -> Array2<f32> {
    let (h, w) = image.dim();
    let half = (size / 2) as i64;

    let x_start = (center_x - half).clamp(0, w as i64);
    let x_end = (center_x - half + size as i64).clamp(x_start, w as i64);
    let y_start = (center_y - half).clamp(0, h as i64);
    let y_end = (center_y - half + size as i64).clamp(y_start, h as i64);

    image
        .slice(ndarray::s![
            y_start as usize..y_end as usize,
            x_start as usize..x_end as usize
        ])
        .to_owned()
}
