//! Water surface detection from a DEM raster.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use water_detect::{
    array_to_rasterfile, detect_water_with_report, rasterfile_to_array, to_codes, DetectParams,
    GeoMeta,
};

#[derive(Parser)]
#[command(name = "water-detect")]
#[command(author, version, about = "Detect water surfaces in a DEM", long_about = None)]
struct Cli {
    /// Input DEM file (band 1 is used)
    input: PathBuf,

    /// Output file, GeoTIFF; ".tif" is appended when no extension is given
    output: PathBuf,

    /// Least count of pixels to be water (larger than 0)
    #[arg(long, default_value = "5")]
    water_pixel_count: usize,

    /// Equal tolerance (larger than 0.0)
    #[arg(long, default_value = "0.1")]
    equal_tolerance: f64,

    /// Outlet rate above which a flat area is land, in (0.0, 1.0]
    #[arg(long, default_value = "0.05")]
    outlet_rate: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn output_path(output: &Path) -> PathBuf {
    if output.extension().is_some() {
        output.to_path_buf()
    } else {
        output.with_extension("tif")
    }
}

fn print_band_info(dem: &Array2<f32>, meta: &GeoMeta) {
    let (rows, cols) = dem.dim();
    info!("Size: {} x {}", cols, rows);
    let (min, max) = dem
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min <= max {
        info!("Min: {}", min);
        info!("Max: {}", max);
    }
    if let Some(epsg) = meta.epsg() {
        info!("EPSG: {}", epsg);
    }
    if let Some(proj) = meta.projection() {
        info!("Projection: {}", proj);
    }
    if let Some(nd) = meta.nodata.as_deref() {
        warn!("Band declares nodata {}; nodata cells are compared as ordinary elevations", nd);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let params = DetectParams::new(cli.equal_tolerance, cli.water_pixel_count, cli.outlet_rate);
    params.validate().context("Invalid parameters")?;

    let pb = spinner("Reading raster...");
    let (dem, meta) = rasterfile_to_array::<f32>(&cli.input)
        .with_context(|| format!("Failed to read raster {}", cli.input.display()))?;
    pb.finish_and_clear();
    info!("Opened {}", cli.input.display());
    print_band_info(&dem, &meta);

    let start = Instant::now();
    let pb = spinner("Detecting water surfaces...");
    let (result, report) = detect_water_with_report(&dem, &params).context("Detection failed")?;
    pb.finish_and_clear();
    let elapsed = start.elapsed();

    let out = output_path(&cli.output);
    let pb = spinner("Writing output...");
    array_to_rasterfile(&to_codes(&result), &meta, &out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    pb.finish_and_clear();

    println!("All done. With parameters:");
    println!("Water Pixel Count Threshold: {}", params.min_water_pixels);
    println!("Equal Tolerance: {}", params.equal_tolerance);
    println!("Outlet Rate Threshold: {}", params.outlet_rate);
    println!("Flood fills: {} ({} kept as water)", report.fills, report.water_regions);
    println!("Output file as: {}", out.display());
    println!("  Processing time: {:.2?}", elapsed);

    Ok(())
}
