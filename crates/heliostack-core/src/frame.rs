use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{HeliostackError, Result};
use crate::time::Timestamp;

/// A single grayscale raster.
///
/// Pixel data is row-major, shape = (height, width). Values are f32 in
/// [0.0, 1.0]; sources convert from their native bit depth on read and the
/// 16-bit persistence path converts back on write, so every frame in a run
/// shares one fixed linear intensity map.
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Array2<f32>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// Observer position attached to a frame: heliographic longitude/latitude
/// and distance from the Sun.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub dsun_m: f64,
}

/// Coordinate system attached to a raster.
///
/// Angular coordinates are helioprojective offsets in arcseconds: Tx grows
/// east (image right), Ty grows north (image up). Pixel coordinates are
/// (x right, y down) with origin at the top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyFrame {
    /// Acquisition time.
    pub obstime: Timestamp,
    /// Observer position. Helioviewer-style sources omit these fields; a
    /// frame without them cannot be normalized or projected.
    pub observer: Option<Observer>,
    /// Angular size of one pixel in arcseconds (both axes).
    pub scale: f64,
    /// Rotation of the image up-axis relative to celestial north, degrees.
    pub rotation_deg: f64,
    /// Pixel corresponding to `ref_coord`, (x, y).
    pub ref_pixel: (f64, f64),
    /// Angular coordinate at `ref_pixel`, (Tx, Ty) arcsec.
    pub ref_coord: (f64, f64),
}

impl SkyFrame {
    /// Observer position, or `MissingMetadata` if the source did not carry it.
    pub fn observer(&self) -> Result<Observer> {
        self.observer.ok_or_else(|| {
            HeliostackError::MissingMetadata(format!(
                "frame at {} has no observer position (lon/lat/dsun)",
                self.obstime
            ))
        })
    }

    /// Map an angular coordinate to fractional pixel coordinates.
    ///
    /// Only valid for north-up frames (`rotation_deg` = 0); rotation is
    /// resolved before any reprojection uses this mapping. The Ty sign flip
    /// converts north-up angular convention to row-down raster convention.
    pub fn world_to_pixel(&self, tx: f64, ty: f64) -> (f64, f64) {
        let x = (tx - self.ref_coord.0) / self.scale + self.ref_pixel.0;
        let y = -(ty - self.ref_coord.1) / self.scale + self.ref_pixel.1;
        (x, y)
    }

    /// Inverse of [`world_to_pixel`](Self::world_to_pixel).
    pub fn pixel_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let tx = (x - self.ref_pixel.0) * self.scale + self.ref_coord.0;
        let ty = -(y - self.ref_pixel.1) * self.scale + self.ref_coord.1;
        (tx, ty)
    }
}

/// A raster together with its coordinate system.
#[derive(Clone, Debug)]
pub struct SkyImage {
    pub frame: Frame,
    pub wcs: SkyFrame,
}

/// Angular offset of a tracked body from the frame origin (the Sun),
/// as seen by one observer at one instant. Arcseconds, Tx east / Ty north.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngularOffset {
    pub tx_arcsec: f64,
    pub ty_arcsec: f64,
}

/// Integer pixel coordinates of the body in an upsampled normalized image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelOffset {
    pub x: i64,
    pub y: i64,
}
