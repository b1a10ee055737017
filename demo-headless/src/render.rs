//! PNG frame export
//!
//! Paints a generation over the source raster: burning cells red, burned cells
//! purple, recovering trees black, healthy trees in their original color and
//! empty ground as the faded original. Ignition markers are white rings.

use image::{Rgba, RgbaImage};
use std::path::Path;
use wildfire_ca_core::{CellState, Coordinate, Grid, RgbRaster};

const BURNING: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BURNED: Rgba<u8> = Rgba([255, 0, 255, 255]);
const RECOVERING: Rgba<u8> = Rgba([0, 0, 0, 255]);
const MARKER: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Alpha of empty ground
const FADED_ALPHA: u8 = 150;
/// Radius of an ignition marker ring in pixels
pub const MARKER_RADIUS: f64 = 20.0;

/// Paint one generation
pub fn render_frame(
    grid: &Grid,
    source: &RgbRaster,
    markers: &[(Coordinate, u32)],
    recovering_ratio: f64,
) -> RgbaImage {
    let mut img = RgbaImage::new(grid.width() as u32, grid.height() as u32);

    for (coord, cell) in grid.iter() {
        let original = source.get(coord).unwrap_or_default();
        let px = match cell {
            CellState::Burning { .. } => BURNING,
            CellState::Burned { .. } => BURNED,
            _ if cell.is_recovering(recovering_ratio) => RECOVERING,
            CellState::Empty => Rgba([original.r, original.g, original.b, FADED_ALPHA]),
            CellState::Tree { .. } => Rgba([original.r, original.g, original.b, 255]),
        };
        img.put_pixel(coord.x as u32, coord.y as u32, px);
    }

    for (center, _age) in markers {
        draw_ring(&mut img, *center, MARKER_RADIUS, MARKER);
    }
    img
}

/// One-pixel ring, clipped to the image
fn draw_ring(img: &mut RgbaImage, center: Coordinate, radius: f64, color: Rgba<u8>) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let (cx, cy) = (center.x as i64, center.y as i64);
    let r = radius.ceil() as i64 + 1;

    for y in (cy - r).max(0)..=(cy + r).min(h - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(w - 1) {
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            if ((dx * dx + dy * dy).sqrt() - radius).abs() < 0.5 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Write `frame_<generation>.png` into `dir`
pub fn save_frame(img: &RgbaImage, dir: &Path, generation: u64) -> image::ImageResult<()> {
    img.save(dir.join(format!("frame_{generation:05}.png")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildfire_ca_core::Rgb;

    #[test]
    fn test_palette() {
        let cells = vec![
            CellState::Empty,
            CellState::tree(100.0),
            CellState::Tree {
                fuel: 10.0,
                fuel_capacity: 100.0,
                iterations_since_burned: 2,
            },
            CellState::Burning {
                fuel: 50.0,
                fuel_capacity: 100.0,
                burn_rate: 30.0,
            },
            CellState::Burned {
                fuel_capacity: 100.0,
            },
        ];
        let grid = Grid::new(5, 1, cells).unwrap();
        let source = RgbRaster::new(5, 1, vec![Rgb::new(10, 20, 30); 5]).unwrap();
        let img = render_frame(&grid, &source, &[], 0.8);

        assert_eq!(*img.get_pixel(0, 0), Rgba([10, 20, 30, FADED_ALPHA]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(*img.get_pixel(2, 0), RECOVERING);
        assert_eq!(*img.get_pixel(3, 0), BURNING);
        assert_eq!(*img.get_pixel(4, 0), BURNED);
    }

    #[test]
    fn test_marker_ring_is_hollow() {
        let grid = Grid::filled(64, 64, CellState::tree(100.0)).unwrap();
        let source = RgbRaster::new(64, 64, vec![Rgb::new(0, 100, 0); 64 * 64]).unwrap();
        let img = render_frame(&grid, &source, &[(Coordinate::new(32, 32), 0)], 0.8);

        assert_eq!(*img.get_pixel(52, 32), MARKER);
        assert_eq!(*img.get_pixel(32, 12), MARKER);
        assert_ne!(*img.get_pixel(32, 32), MARKER);
    }
}
