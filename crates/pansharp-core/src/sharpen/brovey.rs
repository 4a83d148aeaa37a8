//! Brovey (weighted-intensity ratio) sharpening, following Zhang & Roy 2016.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::{DEFAULT_BROVEY_WEIGHT, SHARPENED_RGBN_NAMES};
use crate::engine::{RasterEngine, Resampling};
use crate::error::Result;
use crate::helpers::{combine_bands, weighted_intensity};
use crate::raster::RasterImage;

/// Band names and optional visible-band weights for Brovey sharpening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BroveyConfig {
    pub red_band: String,
    pub green_band: String,
    pub blue_band: String,
    pub nir_band: String,
    pub pan_band: String,
    #[serde(default)]
    pub w_red: Option<f32>,
    #[serde(default)]
    pub w_green: Option<f32>,
    #[serde(default)]
    pub w_blue: Option<f32>,
}

/// Resolved intensity weights. They are not required to sum to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BroveyWeights {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Default for BroveyWeights {
    fn default() -> Self {
        Self {
            red: DEFAULT_BROVEY_WEIGHT,
            green: DEFAULT_BROVEY_WEIGHT,
            blue: DEFAULT_BROVEY_WEIGHT,
        }
    }
}

impl BroveyConfig {
    /// All three weights as given, or 1/3 each if any of them is missing.
    pub fn weights(&self) -> BroveyWeights {
        match (self.w_red, self.w_green, self.w_blue) {
            (Some(red), Some(green), Some(blue)) => BroveyWeights { red, green, blue },
            _ => BroveyWeights::default(),
        }
    }
}

/// Sharpen R, G, B and NIR to the pan resolution as `band * pan / intensity`.
///
/// The intensity is computed at multispectral resolution and resampled
/// bilinearly alongside the spectral bands. Output bands are `Rs`, `Gs`,
/// `Bs`, `NIRs`. A zero resampled intensity is not guarded and yields
/// non-finite pixels.
pub fn sharpen(
    engine: &dyn RasterEngine,
    image: &RasterImage,
    config: &BroveyConfig,
) -> Result<RasterImage> {
    let weights = config.weights();
    let pan = image.band(&config.pan_band)?;
    let grid = pan.grid();

    let intensity = weighted_intensity(
        image,
        &config.red_band,
        &config.green_band,
        &config.blue_band,
        weights.red,
        weights.green,
        weights.blue,
    )?;
    let intensity_sharp = engine.resample(&intensity, &grid, Resampling::Bilinear)?;

    let spectral = [
        &config.red_band,
        &config.green_band,
        &config.blue_band,
        &config.nir_band,
    ];
    let mut sharp_bands = Vec::with_capacity(spectral.len());
    for (name, out_name) in spectral.iter().zip(SHARPENED_RGBN_NAMES) {
        let band = engine.resample(image.band(name)?, &grid, Resampling::Bilinear)?;
        let ratio = combine_bands(&band, &intensity_sharp, |b, i| b / i)?;
        let sharp = combine_bands(&ratio, pan, |r, p| r * p)?;

        let non_finite = sharp.data.iter().filter(|v| !v.is_finite()).count();
        if non_finite > 0 {
            warn!(band = out_name, pixels = non_finite, "Zero intensity produced non-finite pixels");
        }
        sharp_bands.push(sharp.renamed(out_name));
    }

    info!(
        w_red = weights.red,
        w_green = weights.green,
        w_blue = weights.blue,
        "Brovey sharpening complete"
    );
    RasterImage::new(sharp_bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(w: (Option<f32>, Option<f32>, Option<f32>)) -> BroveyConfig {
        BroveyConfig {
            red_band: "r".into(),
            green_band: "g".into(),
            blue_band: "b".into(),
            nir_band: "n".into(),
            pan_band: "p".into(),
            w_red: w.0,
            w_green: w.1,
            w_blue: w.2,
        }
    }

    #[test]
    fn test_weights_all_given() {
        let w = config((Some(0.52), Some(0.25), Some(0.23))).weights();
        assert_eq!(
            w,
            BroveyWeights {
                red: 0.52,
                green: 0.25,
                blue: 0.23
            }
        );
    }

    #[test]
    fn test_partial_weights_fall_back_to_equal() {
        let w = config((Some(0.52), None, Some(0.23))).weights();
        assert_eq!(w, BroveyWeights::default());
    }
}
