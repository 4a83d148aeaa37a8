//! Simple-mean sharpening: each visible band averaged with the pan band.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::SHARPENED_RGB_NAMES;
use crate::engine::{RasterEngine, Resampling};
use crate::error::Result;
use crate::helpers::combine_bands;
use crate::raster::RasterImage;

/// Band names used by simple-mean sharpening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleMeanConfig {
    pub red_band: String,
    pub green_band: String,
    pub blue_band: String,
    pub pan_band: String,
}

/// Resample R, G, B to the pan grid and average each with the pan band.
///
/// Output bands are `Rs`, `Gs`, `Bs`.
pub fn sharpen(
    engine: &dyn RasterEngine,
    image: &RasterImage,
    config: &SimpleMeanConfig,
) -> Result<RasterImage> {
    let pan = image.band(&config.pan_band)?;
    let grid = pan.grid();

    let visible = [&config.red_band, &config.green_band, &config.blue_band];
    let sharp_bands = visible
        .iter()
        .zip(SHARPENED_RGB_NAMES)
        .map(|(name, out_name)| {
            let band = engine.resample(image.band(name)?, &grid, Resampling::Bilinear)?;
            Ok(combine_bands(&band, pan, |b, p| (b + p) * 0.5)?.renamed(out_name))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        height = grid.height,
        width = grid.width,
        "Simple-mean sharpening complete"
    );
    RasterImage::new(sharp_bands)
}
