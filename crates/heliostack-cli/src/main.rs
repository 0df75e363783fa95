mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "heliostack", about = "Coronagraph comet-stacking tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the coordinate metadata of a persisted image
    Info(commands::info::InfoArgs),
    /// Rotate north-up and reproject Sun-centered over a time range
    Normalize(commands::normalize::NormalizeArgs),
    /// Crop around the tracked body and stack existing normalized images
    Stack(commands::stack::StackArgs),
    /// Run the full fetch/normalize/crop/stack pipeline
    Run(commands::run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Normalize(args) => commands::normalize::run(args),
        Commands::Stack(args) => commands::stack::run(args),
        Commands::Run(args) => commands::run::run(args),
    }
}
