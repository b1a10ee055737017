//! Per-cell state machine values
//!
//! A cell is one of four states. Each variant carries exactly the fields that are
//! meaningful for it, so a burn rate outside `Burning` or a regrowth counter
//! outside `Tree` cannot be expressed.

use serde::{Deserialize, Serialize};

/// Discriminant of a [`CellState`], used for counting and FFI export
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Non-combustible terrain
    Empty = 0,
    /// Unburned fuel that can ignite
    Tree = 1,
    /// Actively consuming fuel
    Burning = 2,
    /// Fuel exhausted or extinguished, regrows next step
    Burned = 3,
}

/// State of one grid cell for one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    /// Non-combustible terrain. Absorbing: nothing enters or leaves it.
    #[default]
    Empty,

    /// Combustible cell, possibly regrowing after a burn
    Tree {
        /// Remaining combustible mass
        fuel: f64,
        /// Maximum combustible mass, fixed at classification
        fuel_capacity: f64,
        /// Steps since the cell left `Burned`; 0 means fully steady
        iterations_since_burned: u32,
    },

    /// Cell consuming `burn_rate` fuel per step
    Burning {
        fuel: f64,
        fuel_capacity: f64,
        /// Per-step consumption, also the strength passed to neighbors
        burn_rate: f64,
    },

    /// Burned out; becomes `Tree` on the next step
    Burned { fuel_capacity: f64 },
}

impl CellState {
    /// Steady tree with full fuel
    pub fn tree(fuel_capacity: f64) -> Self {
        CellState::Tree {
            fuel: fuel_capacity,
            fuel_capacity,
            iterations_since_burned: 0,
        }
    }

    /// Discriminant of this state
    pub fn kind(&self) -> CellKind {
        match self {
            CellState::Empty => CellKind::Empty,
            CellState::Tree { .. } => CellKind::Tree,
            CellState::Burning { .. } => CellKind::Burning,
            CellState::Burned { .. } => CellKind::Burned,
        }
    }

    /// Remaining fuel (0 for `Empty` and `Burned`)
    pub fn fuel(&self) -> f64 {
        match *self {
            CellState::Tree { fuel, .. } | CellState::Burning { fuel, .. } => fuel,
            CellState::Empty | CellState::Burned { .. } => 0.0,
        }
    }

    /// Fuel capacity (0 for `Empty`)
    pub fn fuel_capacity(&self) -> f64 {
        match *self {
            CellState::Empty => 0.0,
            CellState::Tree { fuel_capacity, .. }
            | CellState::Burning { fuel_capacity, .. }
            | CellState::Burned { fuel_capacity } => fuel_capacity,
        }
    }

    /// Burn rate (0 unless `Burning`)
    pub fn burn_rate(&self) -> f64 {
        match *self {
            CellState::Burning { burn_rate, .. } => burn_rate,
            _ => 0.0,
        }
    }

    /// Regrowth counter (0 unless `Tree`)
    pub fn iterations_since_burned(&self) -> u32 {
        match *self {
            CellState::Tree {
                iterations_since_burned,
                ..
            } => iterations_since_burned,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellState::Empty)
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, CellState::Tree { .. })
    }

    pub fn is_burning(&self) -> bool {
        matches!(self, CellState::Burning { .. })
    }

    pub fn is_burned(&self) -> bool {
        matches!(self, CellState::Burned { .. })
    }

    /// Tree whose fuel is below `ratio × capacity`
    ///
    /// Such cells cannot catch fire from neighbors and render as recovering ground.
    pub fn is_recovering(&self, ratio: f64) -> bool {
        match *self {
            CellState::Tree {
                fuel,
                fuel_capacity,
                ..
            } => fuel < ratio * fuel_capacity,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_per_variant() {
        let empty = CellState::Empty;
        assert_eq!(empty.kind(), CellKind::Empty);
        assert_eq!(empty.fuel(), 0.0);
        assert_eq!(empty.fuel_capacity(), 0.0);

        let tree = CellState::Tree {
            fuel: 40.0,
            fuel_capacity: 80.0,
            iterations_since_burned: 3,
        };
        assert_eq!(tree.kind(), CellKind::Tree);
        assert_eq!(tree.fuel(), 40.0);
        assert_eq!(tree.burn_rate(), 0.0);
        assert_eq!(tree.iterations_since_burned(), 3);

        let burning = CellState::Burning {
            fuel: 30.0,
            fuel_capacity: 80.0,
            burn_rate: 12.5,
        };
        assert_eq!(burning.burn_rate(), 12.5);
        assert_eq!(burning.iterations_since_burned(), 0);

        let burned = CellState::Burned {
            fuel_capacity: 80.0,
        };
        assert_eq!(burned.fuel(), 0.0);
        assert_eq!(burned.fuel_capacity(), 80.0);
    }

    #[test]
    fn test_recovering_threshold() {
        let tree = CellState::Tree {
            fuel: 79.0,
            fuel_capacity: 100.0,
            iterations_since_burned: 4,
        };
        assert!(tree.is_recovering(0.8));
        assert!(!CellState::tree(100.0).is_recovering(0.8));
        assert!(!CellState::Burned {
            fuel_capacity: 100.0
        }
        .is_recovering(0.8));
    }
}
