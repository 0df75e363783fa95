use ndarray::Array2;
use tracing::debug;

use crate::error::{HeliostackError, Result};
use crate::frame::{Frame, SkyFrame, SkyImage};

/// Geometric transform seam: rotation to north-up and reprojection onto a
/// target coordinate grid. The pipeline only needs these two operations;
/// anything fancier (flux-conserving resampling, distortion models) can be
/// slotted in behind this trait.
pub trait Reprojector {
    /// Rotate so celestial north aligns with the image up-axis.
    ///
    /// The rotation pivots on the reference pixel, so the reference
    /// coordinate does not drift from its pre-rotation pixel location.
    fn rotate_north_up(&self, img: &SkyImage) -> Result<SkyImage>;

    /// Resample onto `target`, which must be north-up. Output shape is
    /// (height, width).
    fn reproject(&self, img: &SkyImage, target: &SkyFrame, out_shape: (usize, usize))
        -> Result<Frame>;
}

/// Rotate + resample with bilinear interpolation, sampling 0 outside the
/// source grid.
pub struct BilinearReprojector;

impl Reprojector for BilinearReprojector {
    fn rotate_north_up(&self, img: &SkyImage) -> Result<SkyImage> {
        let theta = img.wcs.rotation_deg.to_radians();
        if theta.abs() < 1e-12 {
            let mut out = img.clone();
            out.wcs.rotation_deg = 0.0;
            return Ok(out);
        }

        let (h, w) = img.frame.data.dim();
        let (cx, cy) = img.wcs.ref_pixel;
        let (sin_t, cos_t) = theta.sin_cos();

        // Inverse rotation about the reference pixel: for each output pixel
        // in the north-up grid, sample the source pixel it came from. The
        // y axis points down, so the raster-space angle is negated.
        let mut data = Array2::<f32>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let dx = col as f64 - cx;
                let dy = row as f64 - cy;
                let sx = cx + dx * cos_t + dy * sin_t;
                let sy = cy - dx * sin_t + dy * cos_t;
                data[[row, col]] = bilinear_sample(&img.frame.data, sy, sx);
            }
        }

        let mut wcs = img.wcs.clone();
        wcs.rotation_deg = 0.0;
        Ok(SkyImage {
            frame: Frame::new(data),
            wcs,
        })
    }

    fn reproject(
        &self,
        img: &SkyImage,
        target: &SkyFrame,
        out_shape: (usize, usize),
    ) -> Result<Frame> {
        if img.wcs.rotation_deg != 0.0 || target.rotation_deg != 0.0 {
            return Err(HeliostackError::Pipeline(
                "reproject requires north-up source and target frames".into(),
            ));
        }

        let (h, w) = out_shape;
        let mut data = Array2::<f32>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let (tx, ty) = target.pixel_to_world(col as f64, row as f64);
                let (sx, sy) = img.wcs.world_to_pixel(tx, ty);
                data[[row, col]] = bilinear_sample(&img.frame.data, sy, sx);
            }
        }
        Ok(Frame::new(data))
    }
}

/// Build the canonical target frame for a rotated image: same pixel scale,
/// Sun center (0,0) as reference coordinate, reference pixel at the exact
/// image center, acquisition time and observer inherited.
pub fn build_target_frame(rotated: &SkyImage) -> SkyFrame {
    let (h, w) = rotated.frame.data.dim();
    SkyFrame {
        obstime: rotated.wcs.obstime,
        observer: rotated.wcs.observer,
        scale: rotated.wcs.scale,
        rotation_deg: 0.0,
        ref_pixel: (w as f64 / 2.0, h as f64 / 2.0),
        ref_coord: (0.0, 0.0),
    }
}

/// Normalize a raw frame: rotate north-up, then reproject so the Sun sits at
/// the image center pixel. Only the spatial grid and metadata change; the
/// intensity range passes through untouched.
///
/// Fails with `MissingMetadata` when the source frame has no observer
/// position, since the result would be silently misaligned.
pub fn normalize(img: &SkyImage, reprojector: &dyn Reprojector) -> Result<SkyImage> {
    img.wcs.observer()?;

    let rotated = reprojector.rotate_north_up(img)?;
    let target = build_target_frame(&rotated);
    let (h, w) = rotated.frame.data.dim();
    debug!(
        obstime = %rotated.wcs.obstime,
        rotation = img.wcs.rotation_deg,
        "normalizing frame to north-up, Sun-centered"
    );
    let frame = reprojector.reproject(&rotated, &target, (h, w))?;

    Ok(SkyImage { frame, wcs: target })
}

fn bilinear_sample(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let sample = |r: i64, c: i64| -> f32 {
        if r >= 0 && r < h as i64 && c >= 0 && c < w as i64 {
            data[[r as usize, c as usize]]
        } else {
            0.0
        }
    };

    let v00 = sample(y0, x0);
    let v10 = sample(y0, x1);
    let v01 = sample(y1, x0);
    let v11 = sample(y1, x1);

    v00 * (1.0 - fx) * (1.0 - fy)
        + v10 * fx * (1.0 - fy)
        + v01 * (1.0 - fx) * fy
        + v11 * fx * fy
}
