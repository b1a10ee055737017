//! RGB sample raster consumed by terrain classification

use crate::core_types::{Coordinate, Rgb};
use crate::error::{require_range, SimulationError};

/// 3×3 sharpen kernel, row-major
const SHARPEN_KERNEL: [f64; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// `width × height` RGB samples in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl RgbRaster {
    /// Wrap row-major samples
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self, SimulationError> {
        if pixels.len() != width * height {
            return Err(SimulationError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                actual: pixels.len(),
            });
        }
        Ok(RgbRaster {
            width,
            height,
            pixels,
        })
    }

    /// Parse packed bytes with `channels` bytes per pixel (3 for RGB, 4 for RGBA)
    ///
    /// Channels beyond the first three are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for fewer than 3 channels and
    /// `DimensionMismatch` if the byte count does not cover `width × height` pixels.
    pub fn from_packed(
        width: usize,
        height: usize,
        bytes: &[u8],
        channels: usize,
    ) -> Result<Self, SimulationError> {
        if channels < 3 {
            return Err(SimulationError::invalid(
                "channels",
                format!("must be at least 3, got {channels}"),
            ));
        }
        if bytes.len() != width * height * channels {
            return Err(SimulationError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                actual: bytes.len() / channels,
            });
        }
        let pixels = bytes
            .chunks_exact(channels)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Ok(RgbRaster {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Sample at `coord`, or `None` when out of bounds
    pub fn get(&self, coord: Coordinate) -> Option<Rgb> {
        (coord.x < self.width && coord.y < self.height)
            .then(|| self.pixels[coord.y * self.width + coord.x])
    }

    /// Sharpened copy of this raster
    ///
    /// Convolves with a 3×3 sharpen kernel (taps outside the raster are skipped)
    /// and blends `convolved × amount + original × (1 − amount)`, clamped to a
    /// byte. An `amount` of 0 returns an identical raster.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `amount` is outside `[0, 1]`.
    pub fn sharpened(&self, amount: f64) -> Result<Self, SimulationError> {
        require_range("sharpen_amount", amount, 0.0, 1.0)?;
        if amount == 0.0 {
            return Ok(self.clone());
        }

        let mut pixels = Vec::with_capacity(self.pixels.len());
        for y in 0..self.height {
            for x in 0..self.width {
                let center = Coordinate::new(x, y);
                let mut acc = [0.0_f64; 3];
                for ky in 0..3 {
                    for kx in 0..3 {
                        let Some(tap) = center.offset(
                            kx as isize - 1,
                            ky as isize - 1,
                            self.width,
                            self.height,
                        ) else {
                            continue;
                        };
                        let weight = SHARPEN_KERNEL[ky * 3 + kx];
                        let px = self.pixels[tap.y * self.width + tap.x];
                        acc[0] += f64::from(px.r) * weight;
                        acc[1] += f64::from(px.g) * weight;
                        acc[2] += f64::from(px.b) * weight;
                    }
                }

                let original = self.pixels[y * self.width + x];
                let blend = |conv: f64, src: u8| -> u8 {
                    (conv * amount + f64::from(src) * (1.0 - amount))
                        .round()
                        .clamp(0.0, 255.0) as u8
                };
                pixels.push(Rgb::new(
                    blend(acc[0], original.r),
                    blend(acc[1], original.g),
                    blend(acc[2], original.b),
                ));
            }
        }

        Ok(RgbRaster {
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}
