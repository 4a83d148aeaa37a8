//! Root mean squared error, Hagag et al. 2013.

use crate::engine::RasterEngine;
use crate::error::Result;
use crate::raster::RasterImage;

use super::mse::band_mse;
use super::{finish, Aggregation, MetricValue, QualityOptions};

/// Per-band RMSE, or the mean (not the sum) of band RMSEs.
pub fn calculate(
    engine: &dyn RasterEngine,
    reference: &RasterImage,
    assessment: &RasterImage,
    options: &QualityOptions,
) -> Result<MetricValue> {
    let rmse = band_mse(engine, reference, assessment, &options.region)?
        .values()
        .into_iter()
        .map(f64::sqrt)
        .collect();
    Ok(finish(rmse, options.per_band, Aggregation::Mean))
}
