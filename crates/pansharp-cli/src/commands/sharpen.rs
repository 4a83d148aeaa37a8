use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pansharp_core::config::SharpenJob;
use pansharp_core::engine::{CpuEngine, RasterEngine};
use pansharp_core::io::band_io::{load_band, save_band};
use pansharp_core::raster::RasterImage;
use pansharp_core::sharpen::sharpen_image;
use tracing::debug;

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Tiff,
    Png,
}

impl FormatArg {
    fn extension(self) -> &'static str {
        match self {
            Self::Tiff => "tiff",
            Self::Png => "png",
        }
    }
}

#[derive(Args)]
pub struct SharpenArgs {
    /// Job file (TOML) listing the input bands, output directory and method
    #[arg(long)]
    pub job: PathBuf,

    /// Output directory, overriding the job file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File format of the sharpened bands
    #[arg(long, value_enum, default_value = "tiff")]
    pub format: FormatArg,
}

pub fn run(args: &SharpenArgs) -> Result<()> {
    let job = read_job(&args.job)?;
    let output = args.output.clone().unwrap_or_else(|| job.output.clone());
    let engine = CpuEngine;

    crate::summary::print_job_summary(&job, &output, engine.name());

    let pb = ProgressBar::new(job.bands.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Loading bands");
    let bands = job
        .bands
        .iter()
        .map(|source| {
            let band = load_band(&source.path, &source.name, source.spatial_ref())
                .with_context(|| format!("Failed to load {}", source.path.display()));
            pb.inc(1);
            band
        })
        .collect::<Result<Vec<_>>>()?;
    pb.finish();
    let scene = RasterImage::new(bands)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Sharpening ({})", job.sharpening));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let sharpened = sharpen_image(&engine, &scene, &job.sharpening)
        .with_context(|| format!("{} sharpening failed", job.sharpening))?;
    spinner.finish_with_message(format!("Sharpened {} bands", sharpened.band_count()));

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for band in sharpened.iter() {
        let path = output.join(format!("{}.{}", band.name, args.format.extension()));
        save_band(band, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!(
        "Saved {} bands ({}) to {}",
        sharpened.band_count(),
        sharpened.band_names().join(", "),
        output.display()
    );
    Ok(())
}

fn read_job(path: &Path) -> Result<SharpenJob> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file {}", path.display()))?;
    let job: SharpenJob = toml::from_str(&text)
        .with_context(|| format!("Failed to parse job file {}", path.display()))?;
    debug!(bands = job.bands.len(), method = %job.sharpening, "Parsed job file");
    Ok(job)
}
