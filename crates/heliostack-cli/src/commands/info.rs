use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use heliostack_core::io::sidecar::load_sidecar;

#[derive(Args)]
pub struct InfoArgs {
    /// Persisted image file (the .json sidecar is read alongside it)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let wcs = load_sidecar(&args.file)?;

    println!("File:        {}", args.file.display());
    println!("Obstime:     {}", wcs.obstime);
    println!("Scale:       {:.3} arcsec/px", wcs.scale);
    println!("Rotation:    {:.3} deg", wcs.rotation_deg);
    println!(
        "Ref pixel:   ({:.1}, {:.1})",
        wcs.ref_pixel.0, wcs.ref_pixel.1
    );
    println!(
        "Ref coord:   ({:.1}\", {:.1}\")",
        wcs.ref_coord.0, wcs.ref_coord.1
    );

    match wcs.observer {
        Some(obs) => {
            println!(
                "Observer:    lon {:.3} deg, lat {:.3} deg, dsun {:.3e} m",
                obs.lon_deg, obs.lat_deg, obs.dsun_m
            );
        }
        None => println!("Observer:    missing (frame cannot be normalized)"),
    }

    Ok(())
}
