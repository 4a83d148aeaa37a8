mod common;

use pansharp_core::engine::CpuEngine;
use pansharp_core::raster::RasterImage;
use pansharp_core::sharpen::brovey::{sharpen, BroveyConfig};

use common::{assert_all_close, checker, image_from, make_band, make_const_band, parabola, stripes};

fn config(weights: Option<(f32, f32, f32)>) -> BroveyConfig {
    BroveyConfig {
        red_band: "B4".into(),
        green_band: "B3".into(),
        blue_band: "B2".into(),
        nir_band: "B8".into(),
        pan_band: "pan".into(),
        w_red: weights.map(|w| w.0),
        w_green: weights.map(|w| w.1),
        w_blue: weights.map(|w| w.2),
    }
}

fn constant_scene() -> RasterImage {
    image_from(vec![
        make_const_band("B4", 4, 4, 20.0, 0.3),
        make_const_band("B3", 4, 4, 20.0, 0.6),
        make_const_band("B2", 4, 4, 20.0, 0.9),
        make_const_band("B8", 4, 4, 20.0, 0.5),
        make_const_band("pan", 8, 8, 10.0, 0.4),
    ])
}

// ---------------------------------------------------------------------------
// Ratio fusion
// ---------------------------------------------------------------------------

#[test]
fn test_constant_ratio_fusion() {
    // Intensity is 0.6, so every band is scaled by 0.4 / 0.6.
    let out = sharpen(&CpuEngine, &constant_scene(), &config(None)).unwrap();

    assert_eq!(out.band_names(), vec!["Rs", "Gs", "Bs", "NIRs"]);
    assert_all_close(&out.band("Rs").unwrap().data, 0.2, 1e-5);
    assert_all_close(&out.band("Gs").unwrap().data, 0.4, 1e-5);
    assert_all_close(&out.band("Bs").unwrap().data, 0.6, 1e-5);
    assert_all_close(&out.band("NIRs").unwrap().data, 0.5 * 0.4 / 0.6, 1e-5);
    for band in out.iter() {
        assert_eq!(band.data.dim(), (8, 8));
        assert_eq!(band.reference.scale, 10.0);
    }
}

#[test]
fn test_custom_weights() {
    // 1.0 * 0.3 + 0 + 0 = 0.3: red comes out equal to pan.
    let out = sharpen(&CpuEngine, &constant_scene(), &config(Some((1.0, 0.0, 0.0)))).unwrap();
    assert_all_close(&out.band("Rs").unwrap().data, 0.4, 1e-5);
    assert_all_close(&out.band("Bs").unwrap().data, 1.2, 1e-5);
}

#[test]
fn test_omitted_weights_match_explicit_thirds() {
    let scene = image_from(vec![
        make_band("B4", 4, 4, 20.0, stripes),
        make_band("B3", 4, 4, 20.0, parabola),
        make_band("B2", 4, 4, 20.0, |r, c| 0.2 + 0.05 * (r + c) as f32),
        make_band("B8", 4, 4, 20.0, checker),
        make_band("pan", 8, 8, 10.0, |r, c| 0.3 + 0.01 * (r * c) as f32),
    ]);
    let implicit = sharpen(&CpuEngine, &scene, &config(None)).unwrap();
    let explicit = sharpen(
        &CpuEngine,
        &scene,
        &config(Some((1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0))),
    )
    .unwrap();

    for (a, b) in implicit.iter().zip(explicit.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.data, b.data);
    }
}

#[test]
fn test_zero_intensity_is_not_guarded() {
    let scene = image_from(vec![
        make_const_band("B4", 2, 2, 20.0, 0.0),
        make_const_band("B3", 2, 2, 20.0, 0.0),
        make_const_band("B2", 2, 2, 20.0, 0.0),
        make_const_band("B8", 2, 2, 20.0, 0.5),
        make_const_band("pan", 4, 4, 10.0, 0.4),
    ]);
    let out = sharpen(&CpuEngine, &scene, &config(None)).unwrap();
    assert!(out.band("Rs").unwrap().data.iter().all(|v| v.is_nan()));
    assert!(out.band("NIRs").unwrap().data.iter().all(|v| v.is_infinite()));
}
