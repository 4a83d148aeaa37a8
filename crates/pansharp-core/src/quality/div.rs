//! Difference in variance. Values near 0 mean high similarity.

use crate::engine::{RasterEngine, Reducer};
use crate::error::{PansharpError, Result};
use crate::raster::RasterImage;

use super::{finish, validate_pair, Aggregation, MetricValue, QualityOptions};

/// Per band `1 - var(assessment) / var(reference)`; aggregate is the band mean.
pub fn calculate(
    engine: &dyn RasterEngine,
    reference: &RasterImage,
    assessment: &RasterImage,
    options: &QualityOptions,
) -> Result<MetricValue> {
    validate_pair(reference, assessment)?;
    let x_var = engine.reduce_region(reference, Reducer::Variance, &options.region)?;
    let y_var = engine.reduce_region(assessment, Reducer::Variance, &options.region)?;

    let div = x_var
        .iter()
        .zip(y_var.values())
        .map(|((name, xv), yv)| {
            if xv == 0.0 {
                return Err(PansharpError::NumericFailure(format!(
                    "DIV is undefined for band '{name}': reference variance is zero"
                )));
            }
            Ok(1.0 - yv / xv)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(finish(div, options.per_band, Aggregation::Mean))
}
