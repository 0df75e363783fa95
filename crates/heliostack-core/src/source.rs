use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{HeliostackError, Result};
use crate::frame::{AngularOffset, Observer, SkyImage};
use crate::io::image_io::load_frame;
use crate::io::paths::raw_image_path;
use crate::io::sidecar::load_sidecar;
use crate::time::Timestamp;

/// Supplier of raw frames with coordinate metadata, one per timestamp.
///
/// The production source behind this seam is a coronagraph archive fetch;
/// this crate ships a directory-backed implementation over pre-fetched
/// files.
pub trait ImageSource {
    fn fetch(&self, ts: &Timestamp) -> Result<SkyImage>;

    /// Instrument identifier used in persisted filenames.
    fn instrument(&self) -> &str;
}

/// Supplier of a body's angular position on the sky for a given observer
/// and instant.
pub trait Ephemeris {
    fn locate(&self, body: &str, ts: &Timestamp, observer: &Observer) -> Result<AngularOffset>;
}

/// Reads pre-fetched frames from a directory, one
/// `<instrument>_<stamp>.png` plus `.json` sidecar per timestamp.
pub struct DirectorySource {
    dir: PathBuf,
    instrument: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, instrument: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            instrument: instrument.into(),
        }
    }
}

impl ImageSource for DirectorySource {
    fn fetch(&self, ts: &Timestamp) -> Result<SkyImage> {
        let path = raw_image_path(&self.dir, &self.instrument, ts);
        let frame = load_frame(&path)?;
        let wcs = load_sidecar(&path)?;
        Ok(SkyImage { frame, wcs })
    }

    fn instrument(&self) -> &str {
        &self.instrument
    }
}

#[derive(Deserialize)]
struct EphemerisEntry {
    time: Timestamp,
    tx_arcsec: f64,
    ty_arcsec: f64,
}

#[derive(Deserialize)]
struct EphemerisTable {
    body: String,
    positions: Vec<EphemerisEntry>,
}

/// Ephemeris backed by a JSON table of precomputed positions for one body,
/// already evaluated for the observing spacecraft. The observer argument is
/// therefore unused here; a live Horizons-backed implementation would need
/// it.
pub struct TableEphemeris {
    body: String,
    positions: HashMap<Timestamp, AngularOffset>,
}

impl TableEphemeris {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let table: EphemerisTable = serde_json::from_str(&json)?;
        let positions = table
            .positions
            .into_iter()
            .map(|e| {
                (
                    e.time,
                    AngularOffset {
                        tx_arcsec: e.tx_arcsec,
                        ty_arcsec: e.ty_arcsec,
                    },
                )
            })
            .collect();
        Ok(Self {
            body: table.body,
            positions,
        })
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Ephemeris for TableEphemeris {
    fn locate(&self, body: &str, ts: &Timestamp, _observer: &Observer) -> Result<AngularOffset> {
        if body != self.body {
            return Err(HeliostackError::Pipeline(format!(
                "ephemeris table covers '{}', not '{body}'",
                self.body
            )));
        }
        self.positions.get(ts).copied().ok_or_else(|| {
            HeliostackError::Pipeline(format!("no ephemeris entry for {body} at {ts}"))
        })
    }
}
