//! Numeric building blocks shared by the sharpening algorithms.

use ndarray::{Array2, Zip};
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::engine::{RasterEngine, Reducer};
use crate::error::{PansharpError, Result};
use crate::raster::{Band, RasterImage, Region};

/// `fallback` when `value` is absent.
pub fn resolve_default<T>(value: Option<T>, fallback: T) -> T {
    value.unwrap_or(fallback)
}

/// Combine two bands on the same grid pixel by pixel. The result keeps `a`'s name and reference.
pub fn combine_bands<F>(a: &Band, b: &Band, f: F) -> Result<Band>
where
    F: Fn(f32, f32) -> f32 + Sync + Send,
{
    if !a.same_grid(b) {
        return Err(PansharpError::InvalidInput(format!(
            "bands '{}' and '{}' are not on the same grid",
            a.name, b.name
        )));
    }
    let zip = Zip::from(&a.data).and(&b.data);
    let data: Array2<f32> = if a.data.len() >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_map_collect(|&x, &y| f(x, y))
    } else {
        zip.map_collect(|&x, &y| f(x, y))
    };
    Ok(a.with_data(data))
}

/// Apply `f` to every pixel of a band.
pub fn map_band<F>(band: &Band, f: F) -> Band
where
    F: Fn(f32) -> f32 + Sync + Send,
{
    let mut data = band.data.clone();
    if data.len() >= PARALLEL_PIXEL_THRESHOLD {
        data.par_mapv_inplace(f);
    } else {
        data.mapv_inplace(f);
    }
    band.with_data(data)
}

/// `wr*R + wg*G + wb*B` over the named bands. Weights are not validated.
pub fn weighted_intensity(
    image: &RasterImage,
    red: &str,
    green: &str,
    blue: &str,
    w_red: f32,
    w_green: f32,
    w_blue: f32,
) -> Result<Band> {
    let r = image.band(red)?;
    let g = image.band(green)?;
    let b = image.band(blue)?;

    let rg = combine_bands(r, g, |rv, gv| w_red * rv + w_green * gv)?;
    let intensity = combine_bands(&rg, b, |acc, bv| acc + w_blue * bv)?;
    Ok(intensity.renamed("intensity"))
}

/// Linearly transform `band` so its statistics over the full extent match `target`'s:
/// mean and standard deviation when `match_moments`, otherwise min/max range.
pub fn rescale_band(
    engine: &dyn RasterEngine,
    band: &Band,
    target: &Band,
    match_moments: bool,
) -> Result<Band> {
    let region = Region::default();
    let source_img = RasterImage::single(band.clone());
    let target_img = RasterImage::single(target.clone());

    let (offset, gain, target_offset) = if match_moments {
        let src_mean = engine.reduce_region(&source_img, Reducer::Mean, &region)?.values()[0];
        let src_var = engine.reduce_region(&source_img, Reducer::Variance, &region)?.values()[0];
        let tgt_mean = engine.reduce_region(&target_img, Reducer::Mean, &region)?.values()[0];
        let tgt_var = engine.reduce_region(&target_img, Reducer::Variance, &region)?.values()[0];

        let src_std = src_var.sqrt();
        if src_std == 0.0 || !src_std.is_finite() {
            return Err(PansharpError::NumericFailure(format!(
                "band '{}' has zero standard deviation",
                band.name
            )));
        }
        debug!(
            band = %band.name,
            src_mean, src_std, tgt_mean, tgt_std = tgt_var.sqrt(),
            "Matching mean/std"
        );
        (src_mean, tgt_var.sqrt() / src_std, tgt_mean)
    } else {
        let src_min = engine.reduce_region(&source_img, Reducer::Min, &region)?.values()[0];
        let src_max = engine.reduce_region(&source_img, Reducer::Max, &region)?.values()[0];
        let tgt_min = engine.reduce_region(&target_img, Reducer::Min, &region)?.values()[0];
        let tgt_max = engine.reduce_region(&target_img, Reducer::Max, &region)?.values()[0];

        let src_range = src_max - src_min;
        if src_range == 0.0 || !src_range.is_finite() {
            return Err(PansharpError::NumericFailure(format!(
                "band '{}' has zero range",
                band.name
            )));
        }
        debug!(band = %band.name, src_min, src_max, tgt_min, tgt_max, "Matching range");
        (src_min, (tgt_max - tgt_min) / src_range, tgt_min)
    };

    Ok(map_band(band, |v| {
        ((v as f64 - offset) * gain + target_offset) as f32
    }))
}

/// Match `source`'s mean and standard deviation to `target`'s.
pub fn linear_histogram_match(
    engine: &dyn RasterEngine,
    source: &Band,
    target: &Band,
) -> Result<Band> {
    rescale_band(engine, source, target, true)
}

/// Split an image into its bands, in band order.
pub fn bands_to_sequence(image: &RasterImage) -> Vec<Band> {
    image.bands().to_vec()
}

/// Stack an ordered sequence of bands back into one image.
pub fn sequence_to_bands(list: Vec<Band>) -> Result<RasterImage> {
    RasterImage::new(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::SpatialRef;

    fn band(name: &str, values: Vec<f32>) -> Band {
        Band::new(
            name,
            Array2::from_shape_vec((2, 2), values).unwrap(),
            SpatialRef::with_scale(1.0),
        )
    }

    #[test]
    fn test_resolve_default() {
        assert_eq!(resolve_default(None, 7), 7);
        assert_eq!(resolve_default(Some(3), 7), 3);
    }

    #[test]
    fn test_combine_rejects_grid_mismatch() {
        let a = band("a", vec![1.0; 4]);
        let b = Band::new("b", Array2::zeros((3, 3)), SpatialRef::with_scale(1.0));
        assert!(combine_bands(&a, &b, |x, y| x + y).is_err());
    }

    #[test]
    fn test_sequence_round_trip_keeps_order() {
        let img = RasterImage::new(vec![band("x", vec![0.0; 4]), band("y", vec![1.0; 4])]).unwrap();
        let seq = bands_to_sequence(&img);
        assert_eq!(seq.len(), 2);
        let back = sequence_to_bands(seq).unwrap();
        assert_eq!(back.band_names(), vec!["x", "y"]);
    }
}
