//! Terrain classification from color samples
//!
//! Maps each sampled color to an initial cell. Colors whose hue falls inside a
//! band around the burnable hue, and which are dark (and saturated) enough, become
//! trees whose fuel falls off linearly from the band center to its edges.
//! Everything else is non-combustible.

use crate::core_types::{CellState, Coordinate, Hsv, Rgb};
use crate::error::{require_positive, require_range, SimulationError};
use crate::grid::{Grid, RgbRaster};
use serde::{Deserialize, Serialize};

/// Reference hue of burnable vegetation (degrees)
pub const BURNABLE_AREA_HUE: f64 = 90.0;
/// Half-width of the burnable hue band (degrees)
pub const MAX_HUE_DELTA: f64 = 36.0;
/// Value ceiling for vegetation (percent)
pub const MAX_TREE_VALUE: f64 = 50.0;
/// Saturation floor for vegetation (percent)
pub const MIN_TREE_SATURATION: f64 = 20.0;
/// Fuel capacity of a cell at the exact burnable hue
pub const MAX_FUEL: f64 = 100.0;

/// Thresholds for mapping colors to terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Hue at which a cell receives full fuel (degrees)
    pub burnable_hue: f64,
    /// Half-width of the hue band (degrees); exclusive at the edges
    pub max_hue_delta: f64,
    /// Value must be strictly below this (percent)
    pub max_tree_value: f64,
    /// Saturation must be at least this (percent); `None` disables the check
    pub min_tree_saturation: Option<f64>,
    /// Fuel capacity at the band center
    pub max_fuel: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            burnable_hue: BURNABLE_AREA_HUE,
            max_hue_delta: MAX_HUE_DELTA,
            max_tree_value: MAX_TREE_VALUE,
            min_tree_saturation: Some(MIN_TREE_SATURATION),
            max_fuel: MAX_FUEL,
        }
    }
}

impl ClassifierConfig {
    /// Check every threshold against its domain
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<(), SimulationError> {
        require_range("burnable_hue", self.burnable_hue, 0.0, 360.0)?;
        require_positive("max_hue_delta", self.max_hue_delta)?;
        require_range("max_tree_value", self.max_tree_value, 0.0, 100.0)?;
        if let Some(floor) = self.min_tree_saturation {
            require_range("min_tree_saturation", floor, 0.0, 100.0)?;
        }
        require_positive("max_fuel", self.max_fuel)?;
        Ok(())
    }
}

/// Pure color → initial cell mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainClassifier {
    config: ClassifierConfig,
}

impl TerrainClassifier {
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the thresholds are out of domain.
    pub fn new(config: ClassifierConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Fuel for a hue, linear from `max_fuel` at the band center to 0 at its edges
    pub fn fuel_for_hue(&self, hue: f64) -> f64 {
        let c = &self.config;
        (c.max_fuel * (c.max_hue_delta - (hue - c.burnable_hue).abs()) / c.max_hue_delta)
            .clamp(0.0, c.max_fuel)
    }

    /// Whether an HSV sample counts as vegetation
    pub fn is_vegetation(&self, hsv: Hsv) -> bool {
        let c = &self.config;
        let in_band = c.burnable_hue - c.max_hue_delta < hsv.h
            && hsv.h < c.burnable_hue + c.max_hue_delta;
        let dark_enough = hsv.v < c.max_tree_value;
        let saturated_enough = c.min_tree_saturation.map_or(true, |floor| hsv.s >= floor);
        in_band && dark_enough && saturated_enough
    }

    /// Classify one color sample
    pub fn classify(&self, color: Rgb) -> CellState {
        let hsv = color.to_hsv();
        if self.is_vegetation(hsv) {
            CellState::tree(self.fuel_for_hue(hsv.h))
        } else {
            CellState::Empty
        }
    }

    /// Classify every sample of a raster into an initial grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a raster with a zero dimension.
    pub fn classify_raster(&self, raster: &RgbRaster) -> Result<Grid, SimulationError> {
        Grid::from_fn(raster.width(), raster.height(), |coord: Coordinate| {
            self.classify(raster.pixels()[coord.y * raster.width() + coord.x])
        })
    }

    /// Classify row-major samples into a `width × height` grid
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `samples.len() != width * height`.
    pub fn classify_samples(
        &self,
        width: usize,
        height: usize,
        samples: &[Rgb],
    ) -> Result<Grid, SimulationError> {
        let raster = RgbRaster::new(width, height, samples.to_vec())?;
        self.classify_raster(&raster)
    }
}
