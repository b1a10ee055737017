use crate::grid::{Grid, KindCounts};
use serde::{Deserialize, Serialize};

/// Summary of one generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub generation: u64,
    pub counts: KindCounts,
    /// Trees below the ignition fuel ratio
    pub recovering: usize,
    pub total_fuel: f64,
    /// Ignition markers still on display
    pub active_markers: usize,
}

impl SimulationStats {
    pub(crate) fn collect(
        generation: u64,
        grid: &Grid,
        ignition_fuel_ratio: f64,
        active_markers: usize,
    ) -> Self {
        let recovering = grid
            .cells()
            .iter()
            .filter(|cell| cell.is_recovering(ignition_fuel_ratio))
            .count();
        Self {
            generation,
            counts: grid.kind_counts(),
            recovering,
            total_fuel: grid.total_fuel(),
            active_markers,
        }
    }

    /// Share of combustible cells currently burning
    pub fn burning_fraction(&self) -> f64 {
        let combustible = self.counts.combustible();
        if combustible == 0 {
            0.0
        } else {
            self.counts.burning as f64 / combustible as f64
        }
    }
}
