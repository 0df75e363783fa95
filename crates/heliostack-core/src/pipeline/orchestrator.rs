use std::collections::BTreeMap;
use std::fs;

use ndarray::Array2;
use tracing::{info, warn};

use crate::coord::project;
use crate::crop::crop_region;
use crate::error::{HeliostackError, Result};
use crate::frame::{PixelOffset, SkyImage};
use crate::io::export::{export, export_marked};
use crate::io::image_io::{load_frame, save_png16};
use crate::io::paths::{
    fixed_image_path, marked_image_path, raw_image_path, stack_result_path, FIXED_SUBDIR,
    MARKED_SUBDIR,
};
use crate::io::raster::load_and_upsample;
use crate::io::sidecar::{load_sidecar, save_sidecar};
use crate::normalize::{normalize, Reprojector};
use crate::source::{Ephemeris, ImageSource};
use crate::stack::{combine, StackMode};
use crate::time::{time_range, Timestamp};

use super::config::RunConfig;
use super::types::{FrameOutcome, FrameReport, PipelineStage, ProgressReporter, RunReport};

/// Run the full stacking pipeline: fetch, normalize, locate/crop, stack,
/// export.
///
/// Frames are processed one at a time; a failure in any per-frame phase
/// skips that frame and is recorded in the returned report. The run itself
/// fails only when zero frames survive to stacking.
pub fn run_pipeline(
    config: &RunConfig,
    source: &dyn ImageSource,
    ephemeris: &dyn Ephemeris,
    reprojector: &dyn Reprojector,
    reporter: &dyn ProgressReporter,
) -> Result<RunReport> {
    fs::create_dir_all(&config.data_dir)?;
    fs::create_dir_all(config.data_dir.join(FIXED_SUBDIR))?;
    fs::create_dir_all(config.data_dir.join(MARKED_SUBDIR))?;
    fs::create_dir_all(&config.results_dir)?;

    let times = time_range(config.start, config.end, config.interval_hours)?;
    info!(
        frames = times.len(),
        body = %config.body,
        "starting stacking run"
    );

    let mut outcomes: BTreeMap<Timestamp, FrameOutcome> = BTreeMap::new();
    let skip = |outcomes: &mut BTreeMap<Timestamp, FrameOutcome>,
                ts: Timestamp,
                phase: &str,
                err: HeliostackError| {
        warn!(timestamp = %ts, error = %err, "frame skipped during {phase}");
        outcomes.insert(
            ts,
            FrameOutcome::Skipped {
                reason: format!("{phase}: {err}"),
            },
        );
    };

    // Phase 1: fetch raw frames and persist them with their metadata.
    reporter.begin_stage(PipelineStage::Fetching, Some(times.len()));
    let mut fetched = Vec::new();
    for (i, ts) in times.iter().enumerate() {
        match fetch_one(config, source, ts) {
            Ok(()) => fetched.push(*ts),
            Err(e) => skip(&mut outcomes, *ts, "fetch", e),
        }
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    // Phase 2: rotate north-up and reproject Sun-centered.
    reporter.begin_stage(PipelineStage::Normalizing, Some(fetched.len()));
    let mut normalized = Vec::new();
    for (i, ts) in fetched.iter().enumerate() {
        match normalize_one(config, source.instrument(), reprojector, ts) {
            Ok(()) => normalized.push(*ts),
            Err(e) => skip(&mut outcomes, *ts, "normalize", e),
        }
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    // Phase 3: evaluate the ephemeris, project to pixels, crop.
    reporter.begin_stage(PipelineStage::Cropping, Some(normalized.len()));
    let mut crops: Vec<Array2<f32>> = Vec::new();
    for (i, ts) in normalized.iter().enumerate() {
        match crop_one(config, source.instrument(), ephemeris, ts) {
            Ok((center, crop)) => {
                outcomes.insert(*ts, FrameOutcome::Stacked { center });
                crops.push(crop);
            }
            Err(e) => skip(&mut outcomes, *ts, "crop", e),
        }
        reporter.advance(i + 1);
        // upsampled raster and crop source dropped here
    }
    reporter.finish_stage();

    if crops.is_empty() {
        return Err(HeliostackError::EmptySequence);
    }
    info!(stacked = crops.len(), total = times.len(), "crops collected");

    // Phase 4: combine and export, one output per mode.
    let mut outputs = Vec::new();
    let modes = [StackMode::Mean, StackMode::Median];
    reporter.begin_stage(PipelineStage::Stacking, Some(modes.len()));
    let mut results = Vec::new();
    for (i, mode) in modes.iter().enumerate() {
        results.push((*mode, combine(&crops, *mode)?));
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Writing, Some(results.len()));
    for (i, (mode, raster)) in results.iter().enumerate() {
        let path = stack_result_path(&config.results_dir, *mode);
        let label = format!("{mode} ({} frames)", crops.len());
        export(raster, &path, &label)?;
        outputs.push((*mode, path));
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    let frames = times
        .iter()
        .map(|ts| FrameReport {
            timestamp: *ts,
            outcome: outcomes
                .remove(ts)
                .unwrap_or_else(|| FrameOutcome::Skipped {
                    reason: "unprocessed".into(),
                }),
        })
        .collect();

    Ok(RunReport { frames, outputs })
}

fn fetch_one(config: &RunConfig, source: &dyn ImageSource, ts: &Timestamp) -> Result<()> {
    let img = source.fetch(ts)?;
    let raw_path = raw_image_path(&config.data_dir, source.instrument(), ts);
    save_png16(&img.frame, &raw_path)?;
    save_sidecar(&raw_path, &img.wcs)?;
    Ok(())
}

fn normalize_one(
    config: &RunConfig,
    instrument: &str,
    reprojector: &dyn Reprojector,
    ts: &Timestamp,
) -> Result<()> {
    let raw_path = raw_image_path(&config.data_dir, instrument, ts);
    let img = SkyImage {
        frame: load_frame(&raw_path)?,
        wcs: load_sidecar(&raw_path)?,
    };

    let fixed = normalize(&img, reprojector)?;
    let fixed_path = fixed_image_path(&config.data_dir, instrument, ts);
    save_png16(&fixed.frame, &fixed_path)?;
    save_sidecar(&fixed_path, &fixed.wcs)?;
    Ok(())
}

fn crop_one(
    config: &RunConfig,
    instrument: &str,
    ephemeris: &dyn Ephemeris,
    ts: &Timestamp,
) -> Result<(PixelOffset, Array2<f32>)> {
    let fixed_path = fixed_image_path(&config.data_dir, instrument, ts);
    let wcs = load_sidecar(&fixed_path)?;
    let observer = wcs.observer()?;

    let offset = ephemeris.locate(&config.body, ts, &observer)?;

    // Full-FOV check image: the predicted body position marked on the
    // normalized frame at its native resolution.
    let (mx, my) = wcs.world_to_pixel(offset.tx_arcsec, offset.ty_arcsec);
    let frame = load_frame(&fixed_path)?;
    export_marked(
        &frame.data,
        (mx.round() as i64, my.round() as i64),
        &marked_image_path(&config.data_dir, instrument, ts),
    )?;

    let up = load_and_upsample(&fixed_path, config.upsample_size)?;

    let center = (
        config.upsample_size as i64 / 2,
        config.upsample_size as i64 / 2,
    );
    let px = project(offset, config.pixel_scale, up.ratio, center)?;

    let crop = crop_region(&up.data, px.x, px.y, config.crop_size);
    let (h, w) = crop.dim();
    if (h, w) != (config.crop_size, config.crop_size) {
        // Body too close to the field edge for a full window; the stacker
        // requires uniform shapes, so the frame is dropped here.
        return Err(HeliostackError::ShapeMismatch {
            expected_h: config.crop_size,
            expected_w: config.crop_size,
            got_h: h,
            got_w: w,
        });
    }

    Ok((px, crop))
}
