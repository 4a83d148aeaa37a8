pub mod brovey;
pub mod gram_schmidt;
pub mod ihs;
pub mod pca;
pub mod simple_mean;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::RasterEngine;
use crate::error::{PansharpError, Result};
use crate::raster::{Band, RasterImage};

use brovey::BroveyConfig;
use gram_schmidt::GramSchmidtConfig;
use ihs::IhsConfig;
use pca::PcaConfig;
use simple_mean::SimpleMeanConfig;

/// A fusion technique together with its options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SharpenMethod {
    Ihs(IhsConfig),
    Brovey(BroveyConfig),
    SimpleMean(SimpleMeanConfig),
    Pca(PcaConfig),
    GramSchmidt(GramSchmidtConfig),
}

impl std::fmt::Display for SharpenMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ihs(_) => write!(f, "IHS"),
            Self::Brovey(_) => write!(f, "Brovey"),
            Self::SimpleMean(_) => write!(f, "Simple mean"),
            Self::Pca(_) => write!(f, "PCA"),
            Self::GramSchmidt(_) => write!(f, "Gram-Schmidt"),
        }
    }
}

/// Sharpen a scene holding both the multispectral bands and the pan band.
pub fn sharpen_image(
    engine: &dyn RasterEngine,
    scene: &RasterImage,
    method: &SharpenMethod,
) -> Result<RasterImage> {
    info!(
        method = %method,
        engine = engine.name(),
        bands = scene.band_count(),
        "Sharpening"
    );

    match method {
        SharpenMethod::Ihs(config) => ihs::sharpen(engine, scene, config),
        SharpenMethod::Brovey(config) => brovey::sharpen(engine, scene, config),
        SharpenMethod::SimpleMean(config) => simple_mean::sharpen(engine, scene, config),
        SharpenMethod::Pca(config) => {
            let (ms, pan) = split_scene(scene, &config.pan_band, config.bands.as_deref())?;
            pca::sharpen(engine, &ms, pan, &config.params())
        }
        SharpenMethod::GramSchmidt(config) => {
            let (ms, pan) = split_scene(scene, &config.pan_band, config.bands.as_deref())?;
            gram_schmidt::sharpen(engine, &ms, pan)
        }
    }
}

/// Separate the pan band from the multispectral bands of a scene.
///
/// Without an explicit band list every non-pan band is treated as multispectral.
pub fn split_scene<'a>(
    scene: &'a RasterImage,
    pan_band: &str,
    bands: Option<&[String]>,
) -> Result<(RasterImage, &'a Band)> {
    let pan = scene.band(pan_band)?;
    let names: Vec<String> = match bands {
        Some(names) => names.to_vec(),
        None => scene
            .band_names()
            .into_iter()
            .filter(|n| n != pan_band)
            .collect(),
    };
    if names.iter().any(|n| n == pan_band) {
        return Err(PansharpError::InvalidInput(format!(
            "pan band '{pan_band}' cannot also be sharpened"
        )));
    }
    if names.is_empty() {
        return Err(PansharpError::InvalidInput(
            "scene has no multispectral bands besides the pan band".into(),
        ));
    }
    Ok((scene.select(&names)?, pan))
}
