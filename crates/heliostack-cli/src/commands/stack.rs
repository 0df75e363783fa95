use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;

use heliostack_core::coord::project;
use heliostack_core::crop::crop_region;
use heliostack_core::io::export::export;
use heliostack_core::io::paths::{fixed_image_path, stack_result_path};
use heliostack_core::io::raster::load_and_upsample;
use heliostack_core::io::sidecar::load_sidecar;
use heliostack_core::source::{Ephemeris, TableEphemeris};
use heliostack_core::stack::{combine, StackMode};
use heliostack_core::time::{time_range, Timestamp};

#[derive(Args)]
pub struct StackArgs {
    /// Directory containing the Fixed/ subdir of normalized frames
    pub data_dir: PathBuf,

    /// JSON ephemeris table for the tracked body
    #[arg(long)]
    pub ephemeris: PathBuf,

    /// Tracked body name (must match the ephemeris table)
    #[arg(long)]
    pub body: String,

    /// First sampling instant (YYYY-MM-DD HH:MM)
    #[arg(long)]
    pub start: String,

    /// Last sampling instant (YYYY-MM-DD HH:MM)
    #[arg(long)]
    pub end: String,

    /// Sampling interval in hours (fractional allowed)
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    /// Instrument identifier used in filenames
    #[arg(long, default_value = "LASCO_C3")]
    pub instrument: String,

    /// Crop window side length, upsampled pixels
    #[arg(long, default_value_t = 200)]
    pub crop_size: usize,

    /// Upsampled working grid side length
    #[arg(long, default_value_t = 4096)]
    pub upsample_size: u32,

    /// Instrument pixel scale at original resolution, arcsec/px
    #[arg(long, default_value_t = 56.0)]
    pub pixel_scale: f64,

    /// Output directory
    #[arg(short, long, default_value = "stack_results")]
    pub output: PathBuf,
}

pub fn run(args: &StackArgs) -> Result<()> {
    let start = Timestamp::parse(&args.start)?;
    let end = Timestamp::parse(&args.end)?;
    let times = time_range(start, end, args.interval)?;
    let ephemeris = TableEphemeris::load(&args.ephemeris)?;
    ensure!(
        ephemeris.body() == args.body,
        "ephemeris table covers '{}', not '{}'",
        ephemeris.body(),
        args.body
    );

    let pb = ProgressBar::new(times.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Cropping [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let center = (
        args.upsample_size as i64 / 2,
        args.upsample_size as i64 / 2,
    );
    let mut crops: Vec<Array2<f32>> = Vec::new();
    for ts in &times {
        let fixed = fixed_image_path(&args.data_dir, &args.instrument, ts);
        let result = load_sidecar(&fixed)
            .and_then(|wcs| wcs.observer())
            .and_then(|observer| ephemeris.locate(&args.body, ts, &observer))
            .and_then(|offset| {
                let up = load_and_upsample(&fixed, args.upsample_size)?;
                let px = project(offset, args.pixel_scale, up.ratio, center)?;
                Ok(crop_region(&up.data, px.x, px.y, args.crop_size))
            });

        match result {
            Ok(crop) if crop.dim() == (args.crop_size, args.crop_size) => crops.push(crop),
            Ok(crop) => pb.println(format!(
                "skipped {ts}: crop trimmed to {}x{} at the field edge",
                crop.dim().0,
                crop.dim().1
            )),
            Err(e) => pb.println(format!("skipped {ts}: {e}")),
        }
        pb.inc(1);
    }
    pb.finish();

    println!("Stacking {} crops...", crops.len());
    fs::create_dir_all(&args.output)?;
    for mode in [StackMode::Mean, StackMode::Median] {
        let result = combine(&crops, mode)?;
        let path = stack_result_path(&args.output, mode);
        export(&result, &path, &format!("{mode} ({} frames)", crops.len()))?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}
