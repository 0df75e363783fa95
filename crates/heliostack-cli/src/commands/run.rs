use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Args;

use heliostack_core::normalize::BilinearReprojector;
use heliostack_core::pipeline::config::RunConfig;
use heliostack_core::pipeline::run_pipeline;
use heliostack_core::source::{DirectorySource, TableEphemeris};
use heliostack_core::time::Timestamp;

use crate::progress::CliReporter;
use crate::summary::{print_report, print_run_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Run config file (TOML); overrides the individual flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// First sampling instant (YYYY-MM-DD HH:MM)
    #[arg(long, required_unless_present = "config")]
    pub start: Option<String>,

    /// Last sampling instant (YYYY-MM-DD HH:MM)
    #[arg(long, required_unless_present = "config")]
    pub end: Option<String>,

    /// Tracked body name, e.g. "C/2025 N1"
    #[arg(long, required_unless_present = "config")]
    pub body: Option<String>,

    /// Directory for raw and normalized images
    #[arg(long, required_unless_present = "config")]
    pub data_dir: Option<PathBuf>,

    /// Sampling interval in hours (fractional allowed)
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    /// Instrument identifier used in filenames
    #[arg(long, default_value = "LASCO_C3")]
    pub instrument: String,

    /// Output directory for stacked results
    #[arg(long, default_value = "stack_results")]
    pub results_dir: PathBuf,

    /// Crop window side length, upsampled pixels
    #[arg(long, default_value_t = 200)]
    pub crop_size: usize,

    /// Upsampled working grid side length
    #[arg(long, default_value_t = 4096)]
    pub upsample_size: u32,

    /// Instrument pixel scale at original resolution, arcsec/px
    #[arg(long, default_value_t = 56.0)]
    pub pixel_scale: f64,

    /// JSON ephemeris table for the tracked body
    #[arg(long)]
    pub ephemeris: PathBuf,

    /// Directory of pre-fetched raw frames (defaults to the data dir)
    #[arg(long)]
    pub source_dir: Option<PathBuf>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid run config")?
    } else {
        build_config_from_args(args)?
    };

    print_run_summary(&config);

    let source_dir = args
        .source_dir
        .clone()
        .unwrap_or_else(|| config.data_dir.clone());
    let source = DirectorySource::new(source_dir, config.instrument.clone());
    let ephemeris = TableEphemeris::load(&args.ephemeris)?;
    ensure!(
        ephemeris.body() == config.body,
        "ephemeris table covers '{}', not '{}'",
        ephemeris.body(),
        config.body
    );
    let reprojector = BilinearReprojector;
    let reporter = CliReporter::new()?;

    let report = run_pipeline(&config, &source, &ephemeris, &reprojector, &reporter)?;

    print_report(&report);
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> Result<RunConfig> {
    // required_unless_present guarantees these when --config is absent
    let start = args.start.as_deref().context("--start is required")?;
    let end = args.end.as_deref().context("--end is required")?;
    let body = args.body.clone().context("--body is required")?;
    let data_dir = args.data_dir.clone().context("--data-dir is required")?;

    Ok(RunConfig {
        start: Timestamp::parse(start)?,
        end: Timestamp::parse(end)?,
        interval_hours: args.interval,
        body,
        instrument: args.instrument.clone(),
        data_dir,
        results_dir: args.results_dir.clone(),
        crop_size: args.crop_size,
        upsample_size: args.upsample_size,
        pixel_scale: args.pixel_scale,
    })
}
