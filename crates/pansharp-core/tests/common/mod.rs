#![allow(dead_code)]

use ndarray::Array2;

use pansharp_core::raster::{Band, RasterImage, SpatialRef};

/// Band in the default CRS anchored at the origin.
pub fn make_band(
    name: &str,
    h: usize,
    w: usize,
    scale: f64,
    f: impl Fn(usize, usize) -> f32,
) -> Band {
    Band::new(
        name,
        Array2::from_shape_fn((h, w), |(r, c)| f(r, c)),
        SpatialRef::with_scale(scale),
    )
}

pub fn make_const_band(name: &str, h: usize, w: usize, scale: f64, fill: f32) -> Band {
    make_band(name, h, w, scale, |_, _| fill)
}

pub fn ramp(h: usize, w: usize) -> impl Fn(usize, usize) -> f32 {
    move |r, c| (r * w + c) as f32 / (h * w) as f32
}

pub fn stripes(r: usize, c: usize) -> f32 {
    ((r * 3 + c * 7) % 11) as f32 / 11.0
}

pub fn parabola(r: usize, c: usize) -> f32 {
    ((r * r + 2 * c) % 13) as f32 / 13.0
}

pub fn checker(r: usize, c: usize) -> f32 {
    ((r * 5 + c * 3) % 7) as f32 / 7.0
}

/// Three linearly independent bands `a`, `b`, `c` on one grid.
pub fn make_multispectral(h: usize, w: usize, scale: f64) -> RasterImage {
    RasterImage::new(vec![
        make_band("a", h, w, scale, ramp(h, w)),
        make_band("b", h, w, scale, stripes),
        make_band("c", h, w, scale, parabola),
    ])
    .unwrap()
}

pub fn image_from(bands: Vec<Band>) -> RasterImage {
    RasterImage::new(bands).unwrap()
}

pub fn max_abs_diff(a: &Array2<f32>, b: &Array2<f32>) -> f32 {
    assert_eq!(a.dim(), b.dim());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

pub fn assert_all_close(data: &Array2<f32>, expected: f32, tol: f32) {
    for ((r, c), &v) in data.indexed_iter() {
        assert!(
            (v - expected).abs() < tol,
            "pixel ({r},{c}): expected {expected}, got {v}"
        );
    }
}
