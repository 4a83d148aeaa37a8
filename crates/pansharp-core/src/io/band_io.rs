use std::path::Path;

use image::{GrayImage, ImageFormat, Luma};
use ndarray::Array2;

use crate::config::BandSource;
use crate::error::{PansharpError, Result};
use crate::raster::{Band, RasterImage, SpatialRef};

/// Save a band as 16-bit grayscale TIFF. Values are clamped to [0, 1].
pub fn save_tiff(band: &Band, path: &Path) -> Result<()> {
    let h = band.height();
    let w = band.width();

    let pixels: Vec<u16> = band
        .data
        .iter()
        .map(|&v| (clamp_unit(v) * 65535.0) as u16)
        .collect();

    let img = image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| {
            PansharpError::InvalidInput(format!("band '{}' has an invalid shape", band.name))
        })?;
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a band as 8-bit grayscale PNG. Values are clamped to [0, 1].
pub fn save_png(band: &Band, path: &Path) -> Result<()> {
    let h = band.height();
    let w = band.width();

    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &v) in band.data.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Luma([(clamp_unit(v) * 255.0) as u8]));
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a band, choosing the format from the file extension.
pub fn save_band(band: &Band, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => save_png(band, path),
        _ => save_tiff(band, path),
    }
}

/// Load a grayscale image file as a band with values in [0, 1].
pub fn load_band(path: &Path, name: &str, reference: SpatialRef) -> Result<Band> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();

    let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
        gray.get_pixel(col as u32, row as u32).0[0] as f32 / 65535.0
    });

    Ok(Band::new(name, data, reference))
}

/// Load every band of a scene, in source order.
pub fn load_scene(sources: &[BandSource]) -> Result<RasterImage> {
    let bands = sources
        .iter()
        .map(|s| load_band(&s.path, &s.name, s.spatial_ref()))
        .collect::<Result<Vec<_>>>()?;
    RasterImage::new(bands)
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
