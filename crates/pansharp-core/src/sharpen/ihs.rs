//! Intensity-hue-saturation substitution.
//!
//! The visible bands are converted to HSV, the value channel is replaced by
//! the panchromatic band and the result is converted back to RGB. No
//! intensity matching is done: the pan band is assumed to already be on a
//! scale comparable to the displaced value channel.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{RasterEngine, Resampling};
use crate::error::Result;
use crate::raster::RasterImage;

/// Band names used by IHS sharpening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IhsConfig {
    pub red_band: String,
    pub green_band: String,
    pub blue_band: String,
    pub pan_band: String,
}

/// Sharpen the red, green and blue bands of `image` to the resolution of its pan band.
///
/// Returns bands `red`, `green`, `blue` on the pan band's grid. The visible
/// bands are brought onto that grid with nearest-neighbour sampling before
/// the colour transform.
pub fn sharpen(
    engine: &dyn RasterEngine,
    image: &RasterImage,
    config: &IhsConfig,
) -> Result<RasterImage> {
    let pan = image.band(&config.pan_band)?;
    let grid = pan.grid();

    let red = engine.resample(image.band(&config.red_band)?, &grid, Resampling::NearestNeighbor)?;
    let green =
        engine.resample(image.band(&config.green_band)?, &grid, Resampling::NearestNeighbor)?;
    let blue = engine.resample(image.band(&config.blue_band)?, &grid, Resampling::NearestNeighbor)?;

    let hsv = engine.rgb_to_hsv(&red, &green, &blue)?;
    let rgb = engine.hsv_to_rgb(hsv.band("hue")?, hsv.band("saturation")?, pan)?;

    info!(
        height = grid.height,
        width = grid.width,
        "IHS sharpening complete"
    );
    Ok(rgb)
}
