//! Input rasters for the demo: a decoded image or a generated landscape

use std::path::Path;
use wildfire_ca_core::{Rgb, RgbRaster};

/// Decode an image file into a raster of exactly `width × height`
///
/// Images of a different size are resized with a triangle filter.
pub fn load_image(path: &Path, width: usize, height: usize) -> Result<RgbRaster, Box<dyn std::error::Error>> {
    let img = image::open(path)?;
    let img = if img.width() as usize == width && img.height() as usize == height {
        img
    } else {
        tracing::info!(
            from_width = img.width(),
            from_height = img.height(),
            width,
            height,
            "resizing input image"
        );
        img.resize_exact(
            width as u32,
            height as u32,
            image::imageops::FilterType::Triangle,
        )
    };
    let rgb = img.to_rgb8();
    Ok(RgbRaster::from_packed(width, height, rgb.as_raw(), 3)?)
}

/// Forest of varying green shades cut by a river and a rocky ridge
pub fn synthetic(width: usize, height: usize) -> Result<RgbRaster, Box<dyn std::error::Error>> {
    let mut pixels = Vec::with_capacity(width * height);
    let (w, h) = (width as f64, height as f64);

    for y in 0..height {
        for x in 0..width {
            let (u, v) = (x as f64 / w, y as f64 / h);
            let river = (v - 0.5 - 0.12 * (u * 9.0).sin()).abs() < 0.015;
            let ridge = (u - 0.75).abs() < 0.04 + 0.02 * (v * 13.0).cos();

            let px = if river {
                Rgb::new(25, 55, 110)
            } else if ridge {
                Rgb::new(120, 115, 110)
            } else {
                // Hue wanders across the burnable band, so fuel capacity varies
                let shade = 0.5 + 0.5 * ((u * 23.0).sin() * (v * 17.0).cos());
                let r = (35.0 + 45.0 * shade) as u8;
                let g = 95 - (20.0 * shade) as u8;
                Rgb::new(r, g, 25)
            };
            pixels.push(px);
        }
    }
    Ok(RgbRaster::new(width, height, pixels)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildfire_ca_core::{ClassifierConfig, TerrainClassifier};

    #[test]
    fn test_synthetic_has_forest_and_barriers() {
        let raster = synthetic(120, 80).unwrap();
        let grid = TerrainClassifier::new(ClassifierConfig::default())
            .unwrap()
            .classify_raster(&raster)
            .unwrap();
        let counts = grid.kind_counts();
        assert!(counts.tree > counts.empty);
        assert!(counts.empty > 0);
    }
}
