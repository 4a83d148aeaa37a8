//! Gram-Schmidt spectral sharpening after Hallabia et al. 2014.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{RasterEngine, Resampling};
use crate::error::{PansharpError, Result};
use crate::helpers::{bands_to_sequence, combine_bands, linear_histogram_match, sequence_to_bands};
use crate::raster::{Band, RasterImage, Region};

/// Gram-Schmidt options as written in a job file. The algorithm itself has no tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GramSchmidtConfig {
    /// Name of the pan band in the scene.
    pub pan_band: String,
    /// Multispectral bands to sharpen; every other band of the scene when absent.
    #[serde(default)]
    pub bands: Option<Vec<String>>,
}

/// Simulated pan band: the per-pixel mean of all bands (one shared grid).
pub fn simulate_pan(image: &RasterImage) -> Result<Band> {
    let grid = image.common_grid()?;
    let n = image.band_count() as f64;

    let mut sum = ndarray::Array2::<f64>::zeros((grid.height, grid.width));
    for band in image.iter() {
        sum.zip_mut_with(&band.data, |s, &v| *s += v as f64);
    }
    let data = sum.mapv(|s| (s / n) as f32);

    Ok(Band::new("pan_sim", data, grid.reference))
}

/// `cov(band, basis) / var(basis)` over the full extent.
///
/// Fails with `NumericFailure` when `basis` has zero variance.
pub fn gs_coefficient(engine: &dyn RasterEngine, band: &Band, basis: &Band) -> Result<f64> {
    let pair = RasterImage::new(vec![
        band.clone().renamed("band"),
        basis.clone().renamed("basis"),
    ])?;
    let covariance: DMatrix<f64> = engine.covariance(&pair, &Region::default())?;

    let variance = covariance[(1, 1)];
    if variance == 0.0 || !variance.is_finite() {
        return Err(PansharpError::NumericFailure(format!(
            "band '{}' has zero variance; Gram-Schmidt coefficient is undefined",
            basis.name
        )));
    }
    Ok(covariance[(0, 1)] / variance)
}

/// Build the Gram-Schmidt list: element 0 is `pan_sim`, element `k` is
/// `bands[k-1]` minus its projection on element `k-1`.
///
/// Each element depends on the one before it, so the list is built strictly
/// in order. The result has `bands.len() + 1` elements.
pub fn gram_schmidt_basis(
    engine: &dyn RasterEngine,
    bands: &[Band],
    pan_sim: &Band,
) -> Result<Vec<Band>> {
    bands
        .iter()
        .try_fold(vec![pan_sim.clone()], |mut list, band| {
            let previous = &list[list.len() - 1];
            let g = gs_coefficient(engine, band, previous)? as f32;
            debug!(band = %band.name, previous = %previous.name, g, "Gram-Schmidt step");

            let next = combine_bands(band, previous, |b, p| b - g * p)?;
            list.push(next);
            Ok(list)
        })
}

/// Sharpen every band of `image` with the single-band `pan` image.
///
/// Output bands keep the input names and sit on the pan grid.
pub fn sharpen(engine: &dyn RasterEngine, image: &RasterImage, pan: &Band) -> Result<RasterImage> {
    let grid = pan.grid();
    let resampled = engine.resample_image(image, &grid, Resampling::Bilinear)?;
    let pan_sim = simulate_pan(&resampled)?;

    let ms_bands = bands_to_sequence(&resampled);
    let gs_list = gram_schmidt_basis(engine, &ms_bands, &pan_sim)?;

    let pan_match = linear_histogram_match(engine, pan, &pan_sim)?;

    let detail = combine_bands(&pan_match, &pan_sim, |p, s| p - s)?;

    let coefficients = gs_list[1..]
        .iter()
        .map(|gs| gs_coefficient(engine, gs, &pan_sim))
        .collect::<Result<Vec<_>>>()?;
    debug!(?coefficients, "Detail injection gains");

    let sharp_bands = ms_bands
        .iter()
        .zip(&coefficients)
        .map(|(band, &g)| {
            let g = g as f32;
            combine_bands(band, &detail, |b, d| b + g * d)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        bands = sharp_bands.len(),
        engine = engine.name(),
        "Gram-Schmidt sharpening complete"
    );
    sequence_to_bands(sharp_bands)
}
