//! Principal-component substitution.
//!
//! The multispectral image is resampled to the pan grid, mean-centred and
//! rotated into principal-component space. One component is replaced by the
//! rescaled pan band and the rotation is inverted, so the pan detail flows
//! back into every band.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::DEFAULT_SUBSTITUTE_PC;
use crate::engine::{EigenDecomposition, RasterEngine, Reducer, Resampling};
use crate::error::{PansharpError, Result};
use crate::helpers::{map_band, rescale_band, resolve_default};
use crate::raster::{Band, RasterImage, Region};

/// PCA options as written in a job file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PcaConfig {
    /// Name of the pan band in the scene.
    pub pan_band: String,
    /// Multispectral bands to sharpen; every other band of the scene when absent.
    #[serde(default)]
    pub bands: Option<Vec<String>>,
    /// 1-indexed component replaced by the pan band.
    #[serde(default)]
    pub substitute_pc: Option<usize>,
    /// Match pan mean/std (true) or min/max range (false) to the substituted component.
    #[serde(default)]
    pub match_pan: Option<bool>,
}

impl PcaConfig {
    pub fn params(&self) -> PcaParams {
        let defaults = PcaParams::default();
        PcaParams {
            substitute_pc: resolve_default(self.substitute_pc, defaults.substitute_pc),
            match_pan: resolve_default(self.match_pan, defaults.match_pan),
        }
    }
}

/// Resolved PCA parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcaParams {
    pub substitute_pc: usize,
    pub match_pan: bool,
}

impl Default for PcaParams {
    fn default() -> Self {
        Self {
            substitute_pc: DEFAULT_SUBSTITUTE_PC,
            match_pan: true,
        }
    }
}

/// Components `PC1..PCn` of a mean-centred image and the rotation that produced them.
#[derive(Clone, Debug)]
pub struct PrincipalComponents {
    pub eigen: EigenDecomposition,
    pub components: RasterImage,
}

/// Component band names `PC1..PCn`.
pub fn component_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("PC{i}")).collect()
}

/// Subtract each band's mean over the footprint. Returns the centred image and the means.
pub fn mean_center(
    engine: &dyn RasterEngine,
    image: &RasterImage,
    region: &Region,
) -> Result<(RasterImage, Vec<f64>)> {
    let means = engine.reduce_region(image, Reducer::Mean, region)?.values();
    let centered = image
        .iter()
        .zip(&means)
        .map(|(band, &mean)| map_band(band, |v| (v as f64 - mean) as f32))
        .collect();
    Ok((RasterImage::new(centered)?, means))
}

/// Rotate a mean-centred image into principal-component space (`PC = E x`,
/// rows of `E` being eigenvectors in descending eigenvalue order).
pub fn principal_components(
    engine: &dyn RasterEngine,
    centered: &RasterImage,
    region: &Region,
) -> Result<PrincipalComponents> {
    let covariance = engine.covariance(centered, region)?;
    let eigen = engine.eigen(&covariance)?;
    debug!(eigenvalues = ?eigen.values.as_slice(), "Covariance eigen decomposition");

    let names = component_names(centered.band_count());
    let components = engine.matrix_multiply(&eigen.vectors, centered, &names)?;
    Ok(PrincipalComponents { eigen, components })
}

/// Undo the rotation by solving `E x = PC` per pixel; output bands take `names`.
pub fn reconstruct(
    engine: &dyn RasterEngine,
    eigenvectors: &DMatrix<f64>,
    components: &RasterImage,
    names: &[String],
) -> Result<RasterImage> {
    engine.matrix_solve(eigenvectors, components, names)
}

/// Sharpen every band of `image` with the single-band `pan` image.
///
/// Fails with `IndexOutOfRange` when `substitute_pc` is outside `1..=n`, and
/// with `NumericFailure` when the covariance matrix is singular or cannot be
/// decomposed.
pub fn sharpen(
    engine: &dyn RasterEngine,
    image: &RasterImage,
    pan: &Band,
    params: &PcaParams,
) -> Result<RasterImage> {
    let n = image.band_count();
    if params.substitute_pc < 1 || params.substitute_pc > n {
        return Err(PansharpError::IndexOutOfRange {
            index: params.substitute_pc,
            count: n,
        });
    }

    let grid = pan.grid();
    let resampled = engine.resample_image(image, &grid, Resampling::Bilinear)?;
    let band_names = resampled.band_names();

    let region = Region::default();
    let (centered, means) = mean_center(engine, &resampled, &region)?;
    let pcs = principal_components(engine, &centered, &region)?;

    // The pan band's illumination comes out reversed relative to the leading
    // components in this formulation, so it is negated before substitution.
    let inverted_pan = map_band(pan, |v| -v);

    let target_index = params.substitute_pc - 1;
    let target = &pcs.components.bands()[target_index];
    let rescaled = rescale_band(engine, &inverted_pan, target, params.match_pan)?
        .renamed(target.name.clone());

    let mut substituted = pcs.components.into_bands();
    substituted[target_index] = rescaled;
    let substituted = RasterImage::new(substituted)?;

    let reconstructed = reconstruct(engine, &pcs.eigen.vectors, &substituted, &band_names)?;
    let restored = reconstructed
        .iter()
        .zip(&means)
        .map(|(band, &mean)| map_band(band, |v| (v as f64 + mean) as f32))
        .collect();

    info!(
        bands = n,
        substitute_pc = params.substitute_pc,
        match_pan = params.match_pan,
        "PCA sharpening complete"
    );
    RasterImage::new(restored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_names() {
        assert_eq!(component_names(3), vec!["PC1", "PC2", "PC3"]);
    }

    #[test]
    fn test_params_defaults() {
        let cfg = PcaConfig {
            pan_band: "B8".into(),
            bands: None,
            substitute_pc: None,
            match_pan: None,
        };
        assert_eq!(cfg.params(), PcaParams::default());
        assert_eq!(cfg.params().substitute_pc, 1);
        assert!(cfg.params().match_pan);
    }
}
