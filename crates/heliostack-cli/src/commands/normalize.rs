use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use heliostack_core::frame::SkyImage;
use heliostack_core::io::image_io::{load_frame, save_png16};
use heliostack_core::io::paths::{fixed_image_path, raw_image_path, FIXED_SUBDIR};
use heliostack_core::io::sidecar::{load_sidecar, save_sidecar};
use heliostack_core::normalize::{normalize, BilinearReprojector};
use heliostack_core::time::{time_range, Timestamp};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Directory of raw frames; normalized output goes to its Fixed/ subdir
    pub data_dir: PathBuf,

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
}

pub fn run(args: &NormalizeArgs) -> Result<()> {
    let start = Timestamp::parse(&args.start)?;
    let end = Timestamp::parse(&args.end)?;
    let times = time_range(start, end, args.interval)?;

    fs::create_dir_all(args.data_dir.join(FIXED_SUBDIR))?;

    let pb = ProgressBar::new(times.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Normalizing [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let reprojector = BilinearReprojector;
    let mut done = 0usize;
    for ts in &times {
        let raw_path = raw_image_path(&args.data_dir, &args.instrument, ts);
        let result = load_frame(&raw_path)
            .and_then(|frame| {
                let wcs = load_sidecar(&raw_path)?;
                normalize(&SkyImage { frame, wcs }, &reprojector)
            })
            .and_then(|fixed| {
                let fixed_path = fixed_image_path(&args.data_dir, &args.instrument, ts);
                save_png16(&fixed.frame, &fixed_path)?;
                save_sidecar(&fixed_path, &fixed.wcs)
            });

        match result {
            Ok(()) => done += 1,
            Err(e) => pb.println(format!("skipped {ts}: {e}")),
        }
        pb.inc(1);
    }
    pb.finish();

    println!("Normalized {}/{} frames", done, times.len());
    Ok(())
}
