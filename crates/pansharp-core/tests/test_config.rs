use std::path::PathBuf;

use pansharp_core::config::{BandSource, SharpenJob};
use pansharp_core::consts::{DEFAULT_CRS, DEFAULT_METRIC_MAX_PIXELS};
use pansharp_core::quality::{QualityConfig, QualityMetric, QualityOptions};
use pansharp_core::raster::Region;
use pansharp_core::sharpen::brovey::{BroveyConfig, BroveyWeights};
use pansharp_core::sharpen::pca::{PcaConfig, PcaParams};
use pansharp_core::sharpen::SharpenMethod;

// ---------------------------------------------------------------------------
// SharpenMethod
// ---------------------------------------------------------------------------

#[test]
fn test_method_display() {
    let json = [
        (r#"{"method":"ihs","red_band":"r","green_band":"g","blue_band":"b","pan_band":"p"}"#, "IHS"),
        (r#"{"method":"simple_mean","red_band":"r","green_band":"g","blue_band":"b","pan_band":"p"}"#, "Simple mean"),
        (r#"{"method":"gram_schmidt","pan_band":"p"}"#, "Gram-Schmidt"),
        (r#"{"method":"pca","pan_band":"p"}"#, "PCA"),
    ];
    for (text, name) in json {
        let method: SharpenMethod = serde_json::from_str(text).unwrap();
        assert_eq!(method.to_string(), name);
    }
}

#[test]
fn test_pca_json_defaults() {
    let method: SharpenMethod =
        serde_json::from_str(r#"{"method": "pca", "pan_band": "B8"}"#).unwrap();
    let SharpenMethod::Pca(config) = &method else {
        panic!("expected PCA, got {method}");
    };
    assert_eq!(config.bands, None);
    assert_eq!(config.params(), PcaParams::default());
}

#[test]
fn test_pca_json_overrides() {
    let config: PcaConfig = serde_json::from_str(
        r#"{"pan_band": "B8", "bands": ["B4", "B3"], "substitute_pc": 2, "match_pan": false}"#,
    )
    .unwrap();
    assert_eq!(config.bands, Some(vec!["B4".to_string(), "B3".to_string()]));
    assert_eq!(
        config.params(),
        PcaParams {
            substitute_pc: 2,
            match_pan: false
        }
    );
}

#[test]
fn test_unknown_method_rejected() {
    let parsed: Result<SharpenMethod, _> =
        serde_json::from_str(r#"{"method": "wavelet", "pan_band": "B8"}"#);
    assert!(parsed.is_err());
}

// ---------------------------------------------------------------------------
// SharpenJob
// ---------------------------------------------------------------------------

const JOB: &str = r#"
output = "out"

[[bands]]
name = "B4"
path = "scene/B4.tif"
scale = 30.0
crs = "EPSG:32633"
origin_x = 399960.0
origin_y = 4900020.0

[[bands]]
name = "B8"
path = "scene/B8.tif"
scale = 15.0

[sharpening]
method = "brovey"
red_band = "B4"
green_band = "B3"
blue_band = "B2"
nir_band = "B5"
pan_band = "B8"
"#;

#[test]
fn test_job_from_toml() {
    let job: SharpenJob = toml::from_str(JOB).unwrap();
    assert_eq!(job.output, PathBuf::from("out"));
    assert_eq!(job.bands.len(), 2);

    let b4 = job.bands[0].spatial_ref();
    assert_eq!(b4.crs, "EPSG:32633");
    assert_eq!(b4.scale, 30.0);
    assert_eq!(b4.origin_x, 399960.0);

    let b8 = job.bands[1].spatial_ref();
    assert_eq!(b8.crs, DEFAULT_CRS);
    assert_eq!(b8.origin_x, 0.0);

    let SharpenMethod::Brovey(config) = &job.sharpening else {
        panic!("expected Brovey, got {}", job.sharpening);
    };
    assert_eq!(config.weights(), BroveyWeights::default());
}

#[test]
fn test_brovey_weights_from_toml() {
    let config: BroveyConfig = toml::from_str(
        r#"
red_band = "B4"
green_band = "B3"
blue_band = "B2"
nir_band = "B5"
pan_band = "B8"
w_red = 0.5
w_green = 0.25
w_blue = 0.25
"#,
    )
    .unwrap();
    assert_eq!(
        config.weights(),
        BroveyWeights {
            red: 0.5,
            green: 0.25,
            blue: 0.25
        }
    );
}

#[test]
fn test_default_job_round_trips_through_toml() {
    let job = SharpenJob::default();
    let text = toml::to_string_pretty(&job).unwrap();
    assert!(text.contains("method = \"brovey\""));

    let parsed: SharpenJob = toml::from_str(&text).unwrap();
    assert_eq!(parsed, job);
}

#[test]
fn test_band_source_requires_scale() {
    let parsed: Result<BandSource, _> = toml::from_str("name = \"B8\"\npath = \"B8.tif\"\n");
    assert!(parsed.is_err());
}

// ---------------------------------------------------------------------------
// QualityConfig
// ---------------------------------------------------------------------------

#[test]
fn test_quality_defaults() {
    let options = QualityConfig::default().resolve();
    assert!(!options.per_band);
    assert_eq!(options.region, Region::footprint(DEFAULT_METRIC_MAX_PIXELS));
    assert_eq!(options, QualityOptions::default());
}

#[test]
fn test_quality_overrides() {
    let config: QualityConfig =
        serde_json::from_str(r#"{"per_band": true, "scale": 30.0, "max_pixels": 1000}"#).unwrap();
    let options = config.resolve();
    assert!(options.per_band);
    assert_eq!(options.region.scale, Some(30.0));
    assert_eq!(options.region.max_pixels, 1000);
    assert_eq!(options.region.extent, None);
}

#[test]
fn test_metric_display() {
    let names: Vec<String> = [
        QualityMetric::Mse,
        QualityMetric::Rmse,
        QualityMetric::Psnr,
        QualityMetric::Rase,
        QualityMetric::Div,
    ]
    .iter()
    .map(|m| m.to_string())
    .collect();
    assert_eq!(names, vec!["MSE", "RMSE", "PSNR", "RASE", "DIV"]);
}
