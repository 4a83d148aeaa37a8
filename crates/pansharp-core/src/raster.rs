use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CRS, DEFAULT_REDUCTION_MAX_PIXELS};
use crate::error::{PansharpError, Result};

/// Projection and pixel geometry of a band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialRef {
    /// CRS identifier, e.g. "EPSG:32633".
    pub crs: String,
    /// Nominal pixel size in projection units.
    pub scale: f64,
    /// Map x of the left edge.
    pub origin_x: f64,
    /// Map y of the top edge. Rows grow southward.
    pub origin_y: f64,
}

impl SpatialRef {
    pub fn new(crs: impl Into<String>, scale: f64, origin_x: f64, origin_y: f64) -> Self {
        Self {
            crs: crs.into(),
            scale,
            origin_x,
            origin_y,
        }
    }

    /// Reference in the default CRS anchored at the map origin.
    pub fn with_scale(scale: f64) -> Self {
        Self::new(DEFAULT_CRS, scale, 0.0, 0.0)
    }

    /// Map coordinates `(x, y)` of the centre of pixel `(row, col)`.
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.scale,
            self.origin_y - (row as f64 + 0.5) * self.scale,
        )
    }

    /// Fractional `(row, col)` of a map coordinate; pixel centres land on integers.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (self.origin_y - y) / self.scale - 0.5,
            (x - self.origin_x) / self.scale - 0.5,
        )
    }
}

/// Axis-aligned region geometry in map units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// A spatial reference plus pixel shape. Resampling targets a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub reference: SpatialRef,
    pub height: usize,
    pub width: usize,
}

impl Grid {
    pub fn extent(&self) -> Extent {
        let r = &self.reference;
        Extent {
            min_x: r.origin_x,
            min_y: r.origin_y - self.height as f64 * r.scale,
            max_x: r.origin_x + self.width as f64 * r.scale,
            max_y: r.origin_y,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }
}

/// A single named layer. Pixels are f32; statistics accumulate in f64.
#[derive(Clone, Debug)]
pub struct Band {
    pub name: String,
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    pub reference: SpatialRef,
}

impl Band {
    pub fn new(name: impl Into<String>, data: Array2<f32>, reference: SpatialRef) -> Self {
        Self {
            name: name.into(),
            data,
            reference,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn grid(&self) -> Grid {
        Grid {
            reference: self.reference.clone(),
            height: self.height(),
            width: self.width(),
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Same name and reference, new pixels.
    pub fn with_data(&self, data: Array2<f32>) -> Self {
        Self {
            name: self.name.clone(),
            data,
            reference: self.reference.clone(),
        }
    }

    pub fn same_grid(&self, other: &Band) -> bool {
        self.reference == other.reference && self.data.dim() == other.data.dim()
    }
}

/// Ordered, name-unique collection of bands.
///
/// Bands may carry different references (a pan band inside a multispectral
/// scene); operations that combine bands check for a common grid first.
#[derive(Clone, Debug)]
pub struct RasterImage {
    bands: Vec<Band>,
}

impl RasterImage {
    pub fn new(bands: Vec<Band>) -> Result<Self> {
        if bands.is_empty() {
            return Err(PansharpError::InvalidInput(
                "image must contain at least one band".into(),
            ));
        }
        let mut image = Self {
            bands: Vec::with_capacity(bands.len()),
        };
        for band in bands {
            image.add_band(band)?;
        }
        Ok(image)
    }

    pub fn single(band: Band) -> Self {
        Self { bands: vec![band] }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn into_bands(self) -> Vec<Band> {
        self.bands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Band> {
        self.bands.iter()
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn band_names(&self) -> Vec<String> {
        self.bands.iter().map(|b| b.name.clone()).collect()
    }

    pub fn band(&self, name: &str) -> Result<&Band> {
        self.bands
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| PansharpError::InvalidInput(format!("unknown band '{name}'")))
    }

    /// New image holding the named bands in the requested order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let bands = names
            .iter()
            .map(|n| self.band(n.as_ref()).cloned())
            .collect::<Result<Vec<_>>>()?;
        Self::new(bands)
    }

    pub fn add_band(&mut self, band: Band) -> Result<()> {
        if self.bands.iter().any(|b| b.name == band.name) {
            return Err(PansharpError::InvalidInput(format!(
                "duplicate band name '{}'",
                band.name
            )));
        }
        self.bands.push(band);
        Ok(())
    }

    pub fn rename<S: AsRef<str>>(self, names: &[S]) -> Result<Self> {
        if names.len() != self.bands.len() {
            return Err(PansharpError::InvalidInput(format!(
                "cannot rename {} bands with {} names",
                self.bands.len(),
                names.len()
            )));
        }
        let bands = self
            .bands
            .into_iter()
            .zip(names)
            .map(|(b, n)| b.renamed(n.as_ref()))
            .collect();
        Self::new(bands)
    }

    /// Grid of the first band; the image's own footprint.
    pub fn grid(&self) -> Grid {
        self.bands[0].grid()
    }

    /// The grid shared by every band, or `InvalidInput` if they differ.
    pub fn common_grid(&self) -> Result<Grid> {
        let first = &self.bands[0];
        if let Some(other) = self.bands.iter().find(|b| !b.same_grid(first)) {
            return Err(PansharpError::InvalidInput(format!(
                "band '{}' does not share the grid of band '{}'",
                other.name, first.name
            )));
        }
        Ok(first.grid())
    }
}

/// Where and how densely a reduction samples.
///
/// No extent means the image's own footprint; no scale means native resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub extent: Option<Extent>,
    pub scale: Option<f64>,
    pub max_pixels: u64,
}

impl Region {
    pub fn new(extent: Option<Extent>, scale: Option<f64>, max_pixels: u64) -> Self {
        Self {
            extent,
            scale,
            max_pixels,
        }
    }

    pub fn footprint(max_pixels: u64) -> Self {
        Self::new(None, None, max_pixels)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::footprint(DEFAULT_REDUCTION_MAX_PIXELS)
    }
}
