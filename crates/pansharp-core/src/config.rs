use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_CRS;
use crate::raster::SpatialRef;
use crate::sharpen::brovey::BroveyConfig;
use crate::sharpen::SharpenMethod;

/// One band file of a scene, with the georeferencing the file itself lacks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandSource {
    pub name: String,
    pub path: PathBuf,
    /// Pixel size in projection units.
    pub scale: f64,
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub origin_x: Option<f64>,
    #[serde(default)]
    pub origin_y: Option<f64>,
}

impl BandSource {
    pub fn spatial_ref(&self) -> SpatialRef {
        SpatialRef::new(
            self.crs.clone().unwrap_or_else(|| DEFAULT_CRS.to_string()),
            self.scale,
            self.origin_x.unwrap_or(0.0),
            self.origin_y.unwrap_or(0.0),
        )
    }

    fn landsat(name: &str, scale: f64) -> Self {
        Self {
            name: name.into(),
            path: PathBuf::from(format!("{name}.tif")),
            scale,
            crs: None,
            origin_x: None,
            origin_y: None,
        }
    }
}

/// A sharpening run: input bands, output directory and fusion method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SharpenJob {
    pub bands: Vec<BandSource>,
    pub output: PathBuf,
    pub sharpening: SharpenMethod,
}

/// Landsat 8 style job: 30 m visible and NIR bands, 15 m pan band, Brovey fusion.
impl Default for SharpenJob {
    fn default() -> Self {
        Self {
            bands: vec![
                BandSource::landsat("B2", 30.0),
                BandSource::landsat("B3", 30.0),
                BandSource::landsat("B4", 30.0),
                BandSource::landsat("B5", 30.0),
                BandSource::landsat("B8", 15.0),
            ],
            output: PathBuf::from("sharpened"),
            sharpening: SharpenMethod::Brovey(BroveyConfig {
                red_band: "B4".into(),
                green_band: "B3".into(),
                blue_band: "B2".into(),
                nir_band: "B5".into(),
                pan_band: "B8".into(),
                w_red: None,
                w_green: None,
                w_blue: None,
            }),
        }
    }
}
