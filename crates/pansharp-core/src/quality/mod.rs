//! Fusion quality metrics comparing an assessment image against a reference.
//!
//! Every metric is built on band-wise region reductions. Per-band results are
//! returned in reference band order; the aggregate is the mean over bands,
//! except for MSE where it is the sum.

pub mod div;
pub mod mse;
pub mod psnr;
pub mod rase;
pub mod rmse;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_METRIC_MAX_PIXELS;
use crate::engine::RasterEngine;
use crate::error::{PansharpError, Result};
use crate::helpers::resolve_default;
use crate::raster::{Extent, RasterImage, Region};

/// Optional metric settings as given by a caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default)]
    pub per_band: Option<bool>,
    #[serde(default)]
    pub region: Option<Extent>,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub max_pixels: Option<u64>,
}

impl QualityConfig {
    pub fn resolve(&self) -> QualityOptions {
        QualityOptions {
            per_band: resolve_default(self.per_band, false),
            region: Region::new(
                self.region,
                self.scale,
                resolve_default(self.max_pixels, DEFAULT_METRIC_MAX_PIXELS),
            ),
        }
    }
}

/// Resolved metric settings.
#[derive(Clone, Debug, PartialEq)]
pub struct QualityOptions {
    pub per_band: bool,
    pub region: Region,
}

impl Default for QualityOptions {
    fn default() -> Self {
        QualityConfig::default().resolve()
    }
}

impl QualityOptions {
    pub fn with_per_band(mut self) -> Self {
        self.per_band = true;
        self
    }
}

/// A metric result: one value per band, or a single band aggregate.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Aggregate(f64),
    PerBand(Vec<f64>),
}

impl MetricValue {
    pub fn aggregate(&self) -> Option<f64> {
        match self {
            Self::Aggregate(v) => Some(*v),
            Self::PerBand(_) => None,
        }
    }

    pub fn per_band(&self) -> Option<&[f64]> {
        match self {
            Self::Aggregate(_) => None,
            Self::PerBand(v) => Some(v),
        }
    }
}

/// How per-band values collapse into one number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Aggregation {
    Sum,
    Mean,
}

pub(crate) fn finish(values: Vec<f64>, per_band: bool, aggregation: Aggregation) -> MetricValue {
    if per_band {
        return MetricValue::PerBand(values);
    }
    let sum: f64 = values.iter().sum();
    match aggregation {
        Aggregation::Sum => MetricValue::Aggregate(sum),
        Aggregation::Mean => MetricValue::Aggregate(sum / values.len() as f64),
    }
}

/// Check that two images can be compared band by band.
pub fn validate_pair(reference: &RasterImage, assessment: &RasterImage) -> Result<()> {
    if reference.band_count() != assessment.band_count() {
        return Err(PansharpError::InvalidInput(format!(
            "reference has {} bands, assessment has {}",
            reference.band_count(),
            assessment.band_count()
        )));
    }
    for (r, a) in reference.iter().zip(assessment.iter()) {
        if r.data.dim() != a.data.dim() {
            return Err(PansharpError::InvalidInput(format!(
                "band '{}' is {:?}, band '{}' is {:?}",
                r.name,
                r.data.dim(),
                a.name,
                a.data.dim()
            )));
        }
        if r.reference != a.reference {
            return Err(PansharpError::InvalidInput(format!(
                "bands '{}' and '{}' have different spatial references",
                r.name, a.name
            )));
        }
    }
    Ok(())
}

/// Available quality metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityMetric {
    Mse,
    Rmse,
    Psnr,
    Rase,
    Div,
}

impl std::fmt::Display for QualityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mse => write!(f, "MSE"),
            Self::Rmse => write!(f, "RMSE"),
            Self::Psnr => write!(f, "PSNR"),
            Self::Rase => write!(f, "RASE"),
            Self::Div => write!(f, "DIV"),
        }
    }
}

/// Score an image pair with the specified quality metric.
pub fn evaluate(
    engine: &dyn RasterEngine,
    metric: QualityMetric,
    reference: &RasterImage,
    assessment: &RasterImage,
    options: &QualityOptions,
) -> Result<MetricValue> {
    match metric {
        QualityMetric::Mse => mse::calculate(engine, reference, assessment, options),
        QualityMetric::Rmse => rmse::calculate(engine, reference, assessment, options),
        QualityMetric::Psnr => psnr::calculate(engine, reference, assessment, options),
        QualityMetric::Rase => rase::calculate(engine, reference, assessment, options),
        QualityMetric::Div => div::calculate(engine, reference, assessment, options),
    }
}

/// All five metrics for one image pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualityReport {
    pub mse: MetricValue,
    pub rmse: MetricValue,
    pub psnr: MetricValue,
    pub rase: MetricValue,
    pub div: MetricValue,
}

impl QualityReport {
    pub fn compute(
        engine: &dyn RasterEngine,
        reference: &RasterImage,
        assessment: &RasterImage,
        options: &QualityOptions,
    ) -> Result<Self> {
        let run = |metric| evaluate(engine, metric, reference, assessment, options);
        Ok(Self {
            mse: run(QualityMetric::Mse)?,
            rmse: run(QualityMetric::Rmse)?,
            psnr: run(QualityMetric::Psnr)?,
            rase: run(QualityMetric::Rase)?,
            div: run(QualityMetric::Div)?,
        })
    }

    pub fn entries(&self) -> [(QualityMetric, &MetricValue); 5] {
        [
            (QualityMetric::Mse, &self.mse),
            (QualityMetric::Rmse, &self.rmse),
            (QualityMetric::Psnr, &self.psnr),
            (QualityMetric::Rase, &self.rase),
            (QualityMetric::Div, &self.div),
        ]
    }
}
