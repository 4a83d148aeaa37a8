use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{PansharpError, Result};
use crate::raster::{Band, Grid, RasterImage, Region};

/// Interpolation used when moving a band onto another grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resampling {
    #[default]
    Bilinear,
    NearestNeighbor,
}

impl std::fmt::Display for Resampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bilinear => write!(f, "Bilinear"),
            Self::NearestNeighbor => write!(f, "Nearest neighbor"),
        }
    }
}

/// Scalar per-band region reducers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    /// Population variance.
    Variance,
    Min,
    Max,
    Sum,
}

impl std::fmt::Display for Reducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Variance => write!(f, "variance"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::Sum => write!(f, "sum"),
        }
    }
}

/// Ordered `(band name, value)` pairs produced by a scalar reducer.
#[derive(Clone, Debug, PartialEq)]
pub struct BandStats {
    entries: Vec<(String, f64)>,
}

impl BandStats {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Result<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| PansharpError::InvalidInput(format!("no statistic for band '{name}'")))
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

/// Eigenvalues in descending order; row `i` of `vectors` is the eigenvector of `values[i]`.
#[derive(Clone, Debug)]
pub struct EigenDecomposition {
    pub values: DVector<f64>,
    pub vectors: DMatrix<f64>,
}

/// Raster computation capabilities the sharpening and quality code is written against.
///
/// Implementations may evaluate eagerly or defer work, as long as every call
/// returns the values it describes. Reductions block until their result is known.
pub trait RasterEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Resample and reproject `band` onto `target`, keeping the band name.
    fn resample(&self, band: &Band, target: &Grid, method: Resampling) -> Result<Band>;

    /// Reduce every band of `image` to one value over `region`.
    fn reduce_region(
        &self,
        image: &RasterImage,
        reducer: Reducer,
        region: &Region,
    ) -> Result<BandStats>;

    /// Population covariance matrix between the bands of `image` (one shared grid).
    fn covariance(&self, image: &RasterImage, region: &Region) -> Result<DMatrix<f64>>;

    /// Eigen-decompose a symmetric matrix.
    fn eigen(&self, matrix: &DMatrix<f64>) -> Result<EigenDecomposition>;

    /// Per-pixel `y = M x`, where `x` is the band vector of `image`. Output bands take `names`.
    fn matrix_multiply(
        &self,
        matrix: &DMatrix<f64>,
        image: &RasterImage,
        names: &[String],
    ) -> Result<RasterImage>;

    /// Per-pixel solve of `M y = x`. Output bands take `names`.
    fn matrix_solve(
        &self,
        matrix: &DMatrix<f64>,
        image: &RasterImage,
        names: &[String],
    ) -> Result<RasterImage>;

    /// Bands `hue`, `saturation`, `value`; hue in [0, 1).
    fn rgb_to_hsv(&self, red: &Band, green: &Band, blue: &Band) -> Result<RasterImage>;

    /// Bands `red`, `green`, `blue`.
    fn hsv_to_rgb(&self, hue: &Band, saturation: &Band, value: &Band) -> Result<RasterImage>;

    /// Resample every band of `image` onto `target`.
    fn resample_image(
        &self,
        image: &RasterImage,
        target: &Grid,
        method: Resampling,
    ) -> Result<RasterImage> {
        let bands = image
            .iter()
            .map(|b| self.resample(b, target, method))
            .collect::<Result<Vec<_>>>()?;
        RasterImage::new(bands)
    }
}
