//! Peak signal-to-noise ratio, Hagag et al. 2013. Larger is less distorted.

use crate::engine::{RasterEngine, Reducer};
use crate::error::{PansharpError, Result};
use crate::raster::RasterImage;

use super::mse::band_mse;
use super::{finish, Aggregation, MetricValue, QualityOptions};

/// Per band `20 * log10(max(reference) / sqrt(MSE))`; aggregate is the band mean.
///
/// A band with zero MSE or a non-positive reference peak has no finite PSNR
/// and is reported as `NumericFailure`.
pub fn calculate(
    engine: &dyn RasterEngine,
    reference: &RasterImage,
    assessment: &RasterImage,
    options: &QualityOptions,
) -> Result<MetricValue> {
    let mse = band_mse(engine, reference, assessment, &options.region)?;
    let peaks = engine.reduce_region(reference, Reducer::Max, &options.region)?;

    let psnr = peaks
        .iter()
        .zip(mse.values())
        .map(|((name, peak), mse)| {
            if peak <= 0.0 || !peak.is_finite() {
                return Err(PansharpError::NumericFailure(format!(
                    "PSNR is undefined for band '{name}': reference peak is {peak}"
                )));
            }
            if mse == 0.0 {
                return Err(PansharpError::NumericFailure(format!(
                    "PSNR is undefined for band '{name}': MSE is zero"
                )));
            }
            Ok(20.0 * (peak / mse.sqrt()).log10())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(finish(psnr, options.per_band, Aggregation::Mean))
}
