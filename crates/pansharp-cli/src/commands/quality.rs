use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pansharp_core::config::BandSource;
use pansharp_core::engine::CpuEngine;
use pansharp_core::io::band_io::load_scene;
use pansharp_core::quality::{evaluate, validate_pair, QualityConfig, QualityMetric};

#[derive(Args)]
pub struct QualityArgs {
    /// Reference band files, one per band
    #[arg(long, required = true, num_args = 1..)]
    pub reference: Vec<PathBuf>,

    /// Assessment band files, in the same order as the reference bands
    #[arg(long, required = true, num_args = 1..)]
    pub assessment: Vec<PathBuf>,

    /// Pixel size of every band in projection units
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Sample reductions at this coarser pixel size
    #[arg(long)]
    pub sample_scale: Option<f64>,

    /// Maximum number of pixels a reduction may sample
    #[arg(long)]
    pub max_pixels: Option<u64>,

    /// Report one value per band instead of the aggregate
    #[arg(long)]
    pub per_band: bool,
}

pub fn run(args: &QualityArgs) -> Result<()> {
    let reference = load_scene(&sources(&args.reference, args.scale))
        .context("Failed to load reference bands")?;
    let assessment = load_scene(&sources(&args.assessment, args.scale))
        .context("Failed to load assessment bands")?;
    validate_pair(&reference, &assessment)?;

    let options = QualityConfig {
        per_band: Some(args.per_band),
        region: None,
        scale: args.sample_scale,
        max_pixels: args.max_pixels,
    }
    .resolve();

    let engine = CpuEngine;
    let results: Vec<_> = [
        QualityMetric::Mse,
        QualityMetric::Rmse,
        QualityMetric::Psnr,
        QualityMetric::Rase,
        QualityMetric::Div,
    ]
    .into_iter()
    .map(|metric| {
        (
            metric,
            evaluate(&engine, metric, &reference, &assessment, &options),
        )
    })
    .collect();

    crate::summary::print_quality_table(&results, &reference.band_names());
    Ok(())
}

/// One source per file, named after the file stem.
fn sources(paths: &[PathBuf], scale: f64) -> Vec<BandSource> {
    paths
        .iter()
        .map(|path| BandSource {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            path: path.clone(),
            scale,
            crs: None,
            origin_x: None,
            origin_y: None,
        })
        .collect()
}
