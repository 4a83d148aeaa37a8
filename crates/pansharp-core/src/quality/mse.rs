//! Mean squared error, Hagag et al. 2013. Relative to image intensity.

use crate::engine::{BandStats, RasterEngine, Reducer};
use crate::error::Result;
use crate::helpers::combine_bands;
use crate::raster::{RasterImage, Region};

use super::{finish, validate_pair, Aggregation, MetricValue, QualityOptions};

/// Mean of `(reference - assessment)^2` for every band, keyed by reference band name.
pub fn band_mse(
    engine: &dyn RasterEngine,
    reference: &RasterImage,
    assessment: &RasterImage,
    region: &Region,
) -> Result<BandStats> {
    validate_pair(reference, assessment)?;
    let squared = reference
        .iter()
        .zip(assessment.iter())
        .map(|(r, a)| {
            combine_bands(r, a, |rv, av| {
                let d = rv - av;
                d * d
            })
        })
        .collect::<Result<Vec<_>>>()?;
    engine.reduce_region(&RasterImage::new(squared)?, Reducer::Mean, region)
}

/// Per-band MSE, or the sum of band MSEs.
pub fn calculate(
    engine: &dyn RasterEngine,
    reference: &RasterImage,
    assessment: &RasterImage,
    options: &QualityOptions,
) -> Result<MetricValue> {
    let mse = band_mse(engine, reference, assessment, &options.region)?;
    Ok(finish(mse.values(), options.per_band, Aggregation::Sum))
}
