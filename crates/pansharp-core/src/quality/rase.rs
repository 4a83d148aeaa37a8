//! Relative average spectral error, Vaiopoulos 2011. Values close to 0 are good.

use crate::engine::{RasterEngine, Reducer};
use crate::error::{PansharpError, Result};
use crate::raster::RasterImage;

use super::mse::band_mse;
use super::{finish, Aggregation, MetricValue, QualityOptions};

/// Per band `100 * RMSE / x̄`, where `x̄` is the mean of the reference band
/// means (one value shared by all bands). Aggregate is the band mean.
pub fn calculate(
    engine: &dyn RasterEngine,
    reference: &RasterImage,
    assessment: &RasterImage,
    options: &QualityOptions,
) -> Result<MetricValue> {
    let mse = band_mse(engine, reference, assessment, &options.region)?;

    let band_means = engine
        .reduce_region(reference, Reducer::Mean, &options.region)?
        .values();
    let xbar = band_means.iter().sum::<f64>() / band_means.len() as f64;
    if xbar == 0.0 || !xbar.is_finite() {
        return Err(PansharpError::NumericFailure(
            "RASE is undefined: reference mean is zero".into(),
        ));
    }

    let rase = mse
        .values()
        .into_iter()
        .map(|m| 100.0 * m.sqrt() / xbar)
        .collect();
    Ok(finish(rase, options.per_band, Aggregation::Mean))
}
