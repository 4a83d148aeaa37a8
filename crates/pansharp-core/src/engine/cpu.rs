use nalgebra::{DMatrix, DVector, SymmetricEigen};
use ndarray::{Array2, Zip};
use rayon::prelude::*;

use crate::color::hsv;
use crate::consts::{
    EIGEN_EPSILON, EIGEN_MAX_ITERATIONS, EIGEN_SINGULAR_TOLERANCE, PARALLEL_PIXEL_THRESHOLD,
};
use crate::error::{PansharpError, Result};
use crate::raster::{Band, Grid, RasterImage, Region, SpatialRef};

use super::{BandStats, EigenDecomposition, RasterEngine, Reducer, Resampling};

/// In-memory engine over `ndarray`, using Rayon for parallelism.
pub struct CpuEngine;

impl RasterEngine for CpuEngine {
    fn name(&self) -> &str {
        "CPU/Rayon"
    }

    fn resample(&self, band: &Band, target: &Grid, method: Resampling) -> Result<Band> {
        if band.reference.crs != target.reference.crs {
            return Err(PansharpError::InvalidInput(format!(
                "band '{}' is in {}; reprojection to {} is not supported by the CPU engine",
                band.name, band.reference.crs, target.reference.crs
            )));
        }
        if band.height() == 0 || band.width() == 0 {
            return Err(PansharpError::InvalidInput(format!(
                "band '{}' has no pixels",
                band.name
            )));
        }
        if band.reference == target.reference
            && band.height() == target.height
            && band.width() == target.width
        {
            return Ok(band.clone());
        }

        let src = &band.data;
        let src_ref = &band.reference;
        let dst_ref = &target.reference;
        let sample = |(row, col): (usize, usize)| {
            let (x, y) = dst_ref.pixel_center(row, col);
            let (sy, sx) = src_ref.to_pixel(x, y);
            match method {
                Resampling::Bilinear => bilinear_sample_clamped(src, sy, sx),
                Resampling::NearestNeighbor => nearest_sample(src, sy, sx),
            }
        };

        let mut out = Array2::<f32>::zeros((target.height, target.width));
        if target.pixel_count() >= PARALLEL_PIXEL_THRESHOLD {
            Zip::indexed(&mut out).par_for_each(|idx, v| *v = sample(idx));
        } else {
            Zip::indexed(&mut out).for_each(|idx, v| *v = sample(idx));
        }

        Ok(Band::new(band.name.clone(), out, dst_ref.clone()))
    }

    fn reduce_region(
        &self,
        image: &RasterImage,
        reducer: Reducer,
        region: &Region,
    ) -> Result<BandStats> {
        let entries = image
            .bands()
            .par_iter()
            .map(|band| {
                let window = SampleWindow::new(&band.grid(), region)?;
                Ok((band.name.clone(), reduce_band(&band.data, &window, reducer)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(BandStats::new(entries))
    }

    fn covariance(&self, image: &RasterImage, region: &Region) -> Result<DMatrix<f64>> {
        let grid = image.common_grid()?;
        let window = SampleWindow::new(&grid, region)?;
        let n = image.band_count();

        let means: Vec<f64> = image
            .bands()
            .par_iter()
            .map(|b| reduce_band(&b.data, &window, Reducer::Mean))
            .collect();

        let bands = image.bands();
        let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();
        let values: Vec<f64> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let sum: f64 = window
                    .positions()
                    .map(|(row, col)| {
                        let a = bands[i].data[[row, col]] as f64 - means[i];
                        let b = bands[j].data[[row, col]] as f64 - means[j];
                        a * b
                    })
                    .sum();
                sum / window.count() as f64
            })
            .collect();

        let mut cov = DMatrix::<f64>::zeros(n, n);
        for (&(i, j), &value) in pairs.iter().zip(&values) {
            cov[(i, j)] = value;
            cov[(j, i)] = value;
        }

        Ok(cov)
    }

    fn eigen(&self, matrix: &DMatrix<f64>) -> Result<EigenDecomposition> {
        if !matrix.is_square() || matrix.nrows() == 0 {
            return Err(PansharpError::InvalidInput(format!(
                "eigen decomposition needs a square matrix, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(PansharpError::NumericFailure(
                "matrix contains non-finite values".into(),
            ));
        }

        let eig = SymmetricEigen::try_new(matrix.clone(), EIGEN_EPSILON, EIGEN_MAX_ITERATIONS)
            .ok_or_else(|| {
                PansharpError::NumericFailure("eigen decomposition did not converge".into())
            })?;

        let n = matrix.nrows();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));

        let largest = eig.eigenvalues[order[0]];
        let smallest = eig.eigenvalues[order[n - 1]];
        if largest <= 0.0 || smallest <= largest * EIGEN_SINGULAR_TOLERANCE {
            return Err(PansharpError::NumericFailure(format!(
                "matrix is singular (eigenvalues {largest:e} .. {smallest:e})"
            )));
        }

        let values = DVector::from_iterator(n, order.iter().map(|&k| eig.eigenvalues[k]));
        let vectors = DMatrix::from_fn(n, n, |i, j| eig.eigenvectors[(j, order[i])]);

        Ok(EigenDecomposition { values, vectors })
    }

    fn matrix_multiply(
        &self,
        matrix: &DMatrix<f64>,
        image: &RasterImage,
        names: &[String],
    ) -> Result<RasterImage> {
        let grid = image.common_grid()?;
        if matrix.ncols() != image.band_count() || matrix.nrows() != names.len() {
            return Err(PansharpError::InvalidInput(format!(
                "cannot apply a {}x{} matrix to {} bands producing {} bands",
                matrix.nrows(),
                matrix.ncols(),
                image.band_count(),
                names.len()
            )));
        }

        let inputs: Vec<Array2<f64>> = image.iter().map(|b| b.data.mapv(f64::from)).collect();
        let bands = names
            .par_iter()
            .enumerate()
            .map(|(i, name)| {
                let mut acc = Array2::<f64>::zeros((grid.height, grid.width));
                for (j, input) in inputs.iter().enumerate() {
                    acc.scaled_add(matrix[(i, j)], input);
                }
                Band::new(name.clone(), acc.mapv(|v| v as f32), grid.reference.clone())
            })
            .collect();

        RasterImage::new(bands)
    }

    fn matrix_solve(
        &self,
        matrix: &DMatrix<f64>,
        image: &RasterImage,
        names: &[String],
    ) -> Result<RasterImage> {
        if !matrix.is_square() {
            return Err(PansharpError::InvalidInput(format!(
                "matrix solve needs a square matrix, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        let inverse = matrix
            .clone()
            .lu()
            .try_inverse()
            .ok_or_else(|| PansharpError::NumericFailure("matrix is singular".into()))?;
        self.matrix_multiply(&inverse, image, names)
    }

    fn rgb_to_hsv(&self, red: &Band, green: &Band, blue: &Band) -> Result<RasterImage> {
        let reference = require_same_grid(&[red, green, blue])?;
        let (h, s, v) = map_pixels3(&red.data, &green.data, &blue.data, hsv::rgb_to_hsv);
        RasterImage::new(vec![
            Band::new("hue", h, reference.clone()),
            Band::new("saturation", s, reference.clone()),
            Band::new("value", v, reference),
        ])
    }

    fn hsv_to_rgb(&self, hue: &Band, saturation: &Band, value: &Band) -> Result<RasterImage> {
        let reference = require_same_grid(&[hue, saturation, value])?;
        let (r, g, b) = map_pixels3(&hue.data, &saturation.data, &value.data, hsv::hsv_to_rgb);
        RasterImage::new(vec![
            Band::new("red", r, reference.clone()),
            Band::new("green", g, reference.clone()),
            Band::new("blue", b, reference),
        ])
    }
}

// ---------------------------------------------------------------------------
// Region sampling
// ---------------------------------------------------------------------------

/// Pixel rows/columns a reduction visits, stepping by `stride`.
#[derive(Clone, Debug)]
struct SampleWindow {
    rows: (usize, usize),
    cols: (usize, usize),
    stride: usize,
}

impl SampleWindow {
    fn new(grid: &Grid, region: &Region) -> Result<Self> {
        let r = &grid.reference;
        let extent = region.extent.unwrap_or_else(|| grid.extent());

        // Pixel centres inside the extent.
        let col_start = ((extent.min_x - r.origin_x) / r.scale - 0.5).ceil().max(0.0);
        let col_end = ((extent.max_x - r.origin_x) / r.scale - 0.5).floor() + 1.0;
        let row_start = ((r.origin_y - extent.max_y) / r.scale - 0.5).ceil().max(0.0);
        let row_end = ((r.origin_y - extent.min_y) / r.scale - 0.5).floor() + 1.0;

        let cols = (col_start as usize, col_end.clamp(0.0, grid.width as f64) as usize);
        let rows = (row_start as usize, row_end.clamp(0.0, grid.height as f64) as usize);
        if cols.0 >= cols.1 || rows.0 >= rows.1 {
            return Err(PansharpError::InvalidInput(
                "region does not cover any pixel of the band".into(),
            ));
        }

        let stride = region
            .scale
            .map(|s| (s / r.scale).round().max(1.0) as usize)
            .unwrap_or(1);

        let window = Self { rows, cols, stride };
        let requested = window.count() as u64;
        if requested > region.max_pixels {
            return Err(PansharpError::SamplingBudgetExceeded {
                requested,
                max_pixels: region.max_pixels,
            });
        }
        Ok(window)
    }

    fn count(&self) -> usize {
        let n = |(start, end): (usize, usize)| (end - start).div_ceil(self.stride);
        n(self.rows) * n(self.cols)
    }

    fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.rows.0..self.rows.1)
            .step_by(self.stride)
            .flat_map(move |row| {
                (self.cols.0..self.cols.1)
                    .step_by(self.stride)
                    .map(move |col| (row, col))
            })
    }
}

fn reduce_band(data: &Array2<f32>, window: &SampleWindow, reducer: Reducer) -> f64 {
    let values = window.positions().map(|(r, c)| data[[r, c]] as f64);
    let n = window.count() as f64;
    match reducer {
        Reducer::Sum => values.sum(),
        Reducer::Mean => values.sum::<f64>() / n,
        Reducer::Min => values.fold(f64::INFINITY, f64::min),
        Reducer::Max => values.fold(f64::NEG_INFINITY, f64::max),
        Reducer::Variance => {
            let mean = reduce_band(data, window, Reducer::Mean);
            values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
        }
    }
}

// ---------------------------------------------------------------------------
// Pixel helpers
// ---------------------------------------------------------------------------

fn require_same_grid(bands: &[&Band]) -> Result<SpatialRef> {
    let first = bands[0];
    if let Some(other) = bands.iter().find(|b| !b.same_grid(first)) {
        return Err(PansharpError::InvalidInput(format!(
            "band '{}' does not share the grid of band '{}'",
            other.name, first.name
        )));
    }
    Ok(first.reference.clone())
}

type Channels = (Array2<f32>, Array2<f32>, Array2<f32>);

fn map_pixels3<F>(a: &Array2<f32>, b: &Array2<f32>, c: &Array2<f32>, f: F) -> Channels
where
    F: Fn(f32, f32, f32) -> (f32, f32, f32) + Sync,
{
    let dim = a.dim();
    let mut x = Array2::<f32>::zeros(dim);
    let mut y = Array2::<f32>::zeros(dim);
    let mut z = Array2::<f32>::zeros(dim);

    let zip = Zip::from(&mut x)
        .and(&mut y)
        .and(&mut z)
        .and(a)
        .and(b)
        .and(c);
    let apply = |xo: &mut f32, yo: &mut f32, zo: &mut f32, &av: &f32, &bv: &f32, &cv: &f32| {
        (*xo, *yo, *zo) = f(av, bv, cv);
    };
    if dim.0 * dim.1 >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(apply);
    } else {
        zip.for_each(apply);
    }

    (x, y, z)
}

/// Bilinear sample with coordinates clamped to the pixel-centre hull.
fn bilinear_sample_clamped(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();
    let y = y.clamp(0.0, (h - 1) as f64);
    let x = x.clamp(0.0, (w - 1) as f64);

    let y0 = y.floor() as usize;
    let x0 = x.floor() as usize;
    let y1 = (y0 + 1).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);

    let fy = (y - y0 as f64) as f32;
    let fx = (x - x0 as f64) as f32;

    let v00 = data[[y0, x0]];
    let v01 = data[[y0, x1]];
    let v10 = data[[y1, x0]];
    let v11 = data[[y1, x1]];

    v00 * (1.0 - fx) * (1.0 - fy) + v01 * fx * (1.0 - fy) + v10 * (1.0 - fx) * fy + v11 * fx * fy
}

fn nearest_sample(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();
    let row = y.round().clamp(0.0, (h - 1) as f64) as usize;
    let col = x.round().clamp(0.0, (w - 1) as f64) as usize;
    data[[row, col]]
}
