//! Cellular-automaton transition engine
//!
//! Computes generation `t + 1` from generation `t`. Every cell reads only the
//! frozen current grid (its own state and its Moore neighbors) plus fresh random
//! draws, and the next grid is assembled in full before it is returned.
//!
//! # Transitions
//!
//! - `Empty` stays `Empty`.
//! - `Tree` scans its neighbors for the first `Burning` cell. With a burning
//!   neighbor it may catch a clamped Gaussian fraction of the neighbor's burn
//!   rate; without one it may ignite spontaneously with probability
//!   `random_burn_rate_probability × scale_factor`. Otherwise it regrows.
//! - `Burning` consumes `burn_rate` fuel and becomes `Burned` when the fuel would
//!   go negative or the burn rate is under the extinguish threshold.
//! - `Burned` deterministically becomes a regrowing `Tree`.

use crate::core_types::{CellState, Coordinate, RandomStreams, RandomVariate};
use crate::error::{
    require_finite, require_non_negative, require_probability, SimulationError,
};
use crate::grid::Grid;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Mean fraction of a neighbor's burn rate transferred on ignition
pub const ENERGY_TRANSFER_RATE_MEAN: f64 = 0.5;
/// Standard deviation of the transferred fraction
pub const ENERGY_TRANSFER_RATE_STD_DEV: f64 = 0.25;
/// Chance that a burning neighbor ignites a healthy tree in one step
pub const PROBABILITY_OF_FIRE_TRANSFER: f64 = 0.1;
/// Mean burn rate of a spontaneous ignition
pub const INITIAL_ENERGY_MEAN: f64 = 50.0;
/// Standard deviation of a spontaneous ignition's burn rate
pub const INITIAL_ENERGY_STD_DEV: f64 = 25.0;
/// Steps to regrow half of the fuel capacity
pub const REGROWTH_K_ITERATIONS: f64 = 5.0;
/// Per-step spontaneous ignition probability per unit of scale factor
pub const RANDOM_BURN_RATE_PROBABILITY: f64 = 0.000_002_164_65;
/// Fuel fraction below which a tree cannot catch fire from neighbors
pub const IGNITION_FUEL_RATIO: f64 = 0.8;

/// Fuel a tree starts with when it regrows from `Burned`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegrowthStart {
    /// Start from zero fuel and follow the regrowth curve
    #[default]
    Depleted,
    /// Start at full capacity
    Full,
}

/// How a whole generation is scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Rows one after another on the calling thread
    Sequential,
    /// Rows partitioned across the rayon thread pool
    #[default]
    Parallel,
}

/// Tunable constants of the transition rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    pub energy_transfer_mean: f64,
    pub energy_transfer_std_dev: f64,
    pub probability_of_fire_transfer: f64,
    pub random_burn_rate_probability: f64,
    pub initial_energy_mean: f64,
    pub initial_energy_std_dev: f64,
    /// Burning cells whose burn rate is below this are extinguished
    pub extinguish_threshold: f64,
    /// `K` in `fuel = capacity × i / (K + i)`
    pub regrowth_k_iterations: f64,
    pub regrowth_start: RegrowthStart,
    /// Trees with `fuel < ratio × capacity` cannot catch fire from neighbors
    pub ignition_fuel_ratio: f64,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            energy_transfer_mean: ENERGY_TRANSFER_RATE_MEAN,
            energy_transfer_std_dev: ENERGY_TRANSFER_RATE_STD_DEV,
            probability_of_fire_transfer: PROBABILITY_OF_FIRE_TRANSFER,
            random_burn_rate_probability: RANDOM_BURN_RATE_PROBABILITY,
            initial_energy_mean: INITIAL_ENERGY_MEAN,
            initial_energy_std_dev: INITIAL_ENERGY_STD_DEV,
            extinguish_threshold: INITIAL_ENERGY_MEAN - INITIAL_ENERGY_STD_DEV,
            regrowth_k_iterations: REGROWTH_K_ITERATIONS,
            regrowth_start: RegrowthStart::Depleted,
            ignition_fuel_ratio: IGNITION_FUEL_RATIO,
        }
    }
}

impl TransitionParams {
    /// Check every parameter against its domain
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<(), SimulationError> {
        require_finite("energy_transfer_mean", self.energy_transfer_mean)?;
        require_non_negative("energy_transfer_std_dev", self.energy_transfer_std_dev)?;
        require_probability(
            "probability_of_fire_transfer",
            self.probability_of_fire_transfer,
        )?;
        require_probability(
            "random_burn_rate_probability",
            self.random_burn_rate_probability,
        )?;
        require_finite("initial_energy_mean", self.initial_energy_mean)?;
        require_non_negative("initial_energy_std_dev", self.initial_energy_std_dev)?;
        require_non_negative("extinguish_threshold", self.extinguish_threshold)?;
        require_non_negative("regrowth_k_iterations", self.regrowth_k_iterations)?;
        require_probability("ignition_fuel_ratio", self.ignition_fuel_ratio)?;
        Ok(())
    }
}

/// Next state of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellUpdate {
    pub next: CellState,
    /// The cell ignited without a burning neighbor this step
    pub spontaneous_ignition: bool,
}

impl CellUpdate {
    fn quiet(next: CellState) -> Self {
        Self {
            next,
            spontaneous_ignition: false,
        }
    }
}

/// A fully computed next generation
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub grid: Grid,
    /// Cells that ignited spontaneously this step, in raster order
    pub new_ignitions: Vec<Coordinate>,
}

/// Pure transition function over whole grids
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionEngine {
    params: TransitionParams,
}

impl TransitionEngine {
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any parameter is out of domain.
    pub fn new(params: TransitionParams) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &TransitionParams {
        &self.params
    }

    /// Compute the next generation drawing from a single variate in raster order
    pub fn step<R>(&self, grid: &Grid, rng: &mut R, scale_factor: f64) -> StepOutcome
    where
        R: RandomVariate + ?Sized,
    {
        let mut cells = Vec::with_capacity(grid.len());
        let mut new_ignitions = Vec::new();

        for (coord, _) in grid.iter() {
            let update = self.transition_cell(grid, coord, rng, scale_factor);
            if update.spontaneous_ignition {
                new_ignitions.push(coord);
            }
            cells.push(update.next);
        }

        StepOutcome {
            grid: Grid::from_parts(grid.width(), grid.height(), cells),
            new_ignitions,
        }
    }

    /// Compute the next generation with one random stream per row
    ///
    /// Row `y` draws only from `streams.stream(generation, y)`, so `Sequential`
    /// and `Parallel` produce identical grids for the same streams.
    pub fn step_streams<S>(
        &self,
        grid: &Grid,
        streams: &S,
        generation: u64,
        scale_factor: f64,
        mode: ExecutionMode,
    ) -> StepOutcome
    where
        S: RandomStreams,
    {
        let width = grid.width();
        let mut cells = vec![CellState::Empty; grid.len()];

        let row_ignitions: Vec<Vec<Coordinate>> = match mode {
            ExecutionMode::Sequential => cells
                .chunks_mut(width)
                .enumerate()
                .map(|(y, row)| {
                    let mut rng = streams.stream(generation, y);
                    self.step_row(grid, y, row, &mut rng, scale_factor)
                })
                .collect(),
            ExecutionMode::Parallel => cells
                .par_chunks_mut(width)
                .enumerate()
                .map(|(y, row)| {
                    let mut rng = streams.stream(generation, y);
                    self.step_row(grid, y, row, &mut rng, scale_factor)
                })
                .collect(),
        };

        StepOutcome {
            grid: Grid::from_parts(width, grid.height(), cells),
            new_ignitions: row_ignitions.into_iter().flatten().collect(),
        }
    }

    fn step_row<R>(
        &self,
        grid: &Grid,
        y: usize,
        out: &mut [CellState],
        rng: &mut R,
        scale_factor: f64,
    ) -> Vec<Coordinate>
    where
        R: RandomVariate + ?Sized,
    {
        let mut ignitions = Vec::new();
        for (x, slot) in out.iter_mut().enumerate() {
            let coord = Coordinate::new(x, y);
            let update = self.transition_cell(grid, coord, rng, scale_factor);
            if update.spontaneous_ignition {
                ignitions.push(coord);
            }
            *slot = update.next;
        }
        ignitions
    }

    /// Next state of the cell at `coord`, reading only `grid`
    pub fn transition_cell<R>(
        &self,
        grid: &Grid,
        coord: Coordinate,
        rng: &mut R,
        scale_factor: f64,
    ) -> CellUpdate
    where
        R: RandomVariate + ?Sized,
    {
        match *grid.cell(coord) {
            CellState::Empty => CellUpdate::quiet(CellState::Empty),
            CellState::Burning {
                fuel,
                fuel_capacity,
                burn_rate,
            } => CellUpdate::quiet(self.burn(fuel, fuel_capacity, burn_rate)),
            CellState::Burned { fuel_capacity } => {
                CellUpdate::quiet(self.regrow_from_burned(fuel_capacity))
            }
            CellState::Tree {
                fuel,
                fuel_capacity,
                iterations_since_burned,
            } => match first_burning_neighbor_rate(grid, coord) {
                Some(neighbor_rate) if neighbor_rate > 0.0 => {
                    CellUpdate::quiet(self.catch_from_neighbor(
                        fuel,
                        fuel_capacity,
                        iterations_since_burned,
                        neighbor_rate,
                        rng,
                    ))
                }
                _ => self.ignite_spontaneously(
                    coord,
                    fuel,
                    fuel_capacity,
                    iterations_since_burned,
                    rng,
                    scale_factor,
                ),
            },
        }
    }

    fn catch_from_neighbor<R>(
        &self,
        fuel: f64,
        fuel_capacity: f64,
        iterations_since_burned: u32,
        neighbor_rate: f64,
        rng: &mut R,
    ) -> CellState
    where
        R: RandomVariate + ?Sized,
    {
        let p = &self.params;
        let roll = rng.uniform();
        let transferred = rng
            .gaussian(p.energy_transfer_mean, p.energy_transfer_std_dev)
            .clamp(0.0, 1.0)
            * neighbor_rate;

        if transferred == 0.0
            || fuel < p.ignition_fuel_ratio * fuel_capacity
            || roll >= p.probability_of_fire_transfer
        {
            return self.regrow(fuel, fuel_capacity, iterations_since_burned);
        }

        CellState::Burning {
            fuel,
            fuel_capacity,
            burn_rate: transferred,
        }
    }

    fn ignite_spontaneously<R>(
        &self,
        coord: Coordinate,
        fuel: f64,
        fuel_capacity: f64,
        iterations_since_burned: u32,
        rng: &mut R,
        scale_factor: f64,
    ) -> CellUpdate
    where
        R: RandomVariate + ?Sized,
    {
        let p = &self.params;
        let roll = rng.uniform();
        if roll < p.random_burn_rate_probability * scale_factor {
            let burn_rate = rng.gaussian(p.initial_energy_mean, p.initial_energy_std_dev);
            trace!(x = coord.x, y = coord.y, burn_rate, "spontaneous ignition");
            return CellUpdate {
                next: CellState::Burning {
                    fuel,
                    fuel_capacity,
                    burn_rate,
                },
                spontaneous_ignition: true,
            };
        }

        CellUpdate::quiet(self.regrow(fuel, fuel_capacity, iterations_since_burned))
    }

    /// Regrowth/steady-state update of a tree that does not ignite
    pub fn regrow(&self, fuel: f64, fuel_capacity: f64, iterations_since_burned: u32) -> CellState {
        if iterations_since_burned == 0 {
            return CellState::Tree {
                fuel,
                fuel_capacity,
                iterations_since_burned: 0,
            };
        }

        let i = f64::from(iterations_since_burned);
        let regrown = (fuel_capacity * i / (self.params.regrowth_k_iterations + i)).min(fuel_capacity);
        CellState::Tree {
            fuel: regrown,
            fuel_capacity,
            iterations_since_burned: iterations_since_burned.saturating_add(1),
        }
    }

    /// One step of a burning cell
    ///
    /// A non-positive burn rate always extinguishes, so fuel never grows while burning.
    pub fn burn(&self, fuel: f64, fuel_capacity: f64, burn_rate: f64) -> CellState {
        let remaining = fuel - burn_rate;
        if remaining < 0.0 || burn_rate < self.params.extinguish_threshold || burn_rate <= 0.0 {
            CellState::Burned { fuel_capacity }
        } else {
            CellState::Burning {
                fuel: remaining,
                fuel_capacity,
                burn_rate,
            }
        }
    }

    /// Deterministic `Burned → Tree` transition
    pub fn regrow_from_burned(&self, fuel_capacity: f64) -> CellState {
        let fuel = match self.params.regrowth_start {
            RegrowthStart::Depleted => 0.0,
            RegrowthStart::Full => fuel_capacity,
        };
        CellState::Tree {
            fuel,
            fuel_capacity,
            iterations_since_burned: 1,
        }
    }
}

/// Burn rate of the first burning neighbor in scan order
///
/// Stops at the first burning cell rather than looking for the strongest one.
fn first_burning_neighbor_rate(grid: &Grid, coord: Coordinate) -> Option<f64> {
    grid.neighbors(coord).find_map(|n| match *grid.cell(n) {
        CellState::Burning { burn_rate, .. } => Some(burn_rate),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Replays fixed uniform and Gaussian draws
    struct FixedVariate {
        uniform: f64,
        gaussian: f64,
    }

    impl RandomVariate for FixedVariate {
        fn uniform(&mut self) -> f64 {
            self.uniform
        }

        fn gaussian(&mut self, _mean: f64, _std_dev: f64) -> f64 {
            self.gaussian
        }
    }

    fn engine() -> TransitionEngine {
        TransitionEngine::new(TransitionParams::default()).unwrap()
    }

    fn burning(fuel: f64, burn_rate: f64) -> CellState {
        CellState::Burning {
            fuel,
            fuel_capacity: 100.0,
            burn_rate,
        }
    }

    #[test]
    fn test_regrowth_curve() {
        let next = engine().regrow(0.0, 100.0, 5);
        assert_relative_eq!(next.fuel(), 50.0);
        assert_eq!(next.iterations_since_burned(), 6);

        let steady = engine().regrow(70.0, 100.0, 0);
        assert_eq!(
            steady,
            CellState::Tree {
                fuel: 70.0,
                fuel_capacity: 100.0,
                iterations_since_burned: 0
            }
        );
    }

    #[test]
    fn test_regrowth_approaches_capacity() {
        let e = engine();
        let mut fuel = 0.0;
        let mut previous = -1.0;
        for i in 1..500 {
            let next = e.regrow(fuel, 100.0, i);
            fuel = next.fuel();
            assert!(fuel > previous);
            assert!(fuel <= 100.0);
            previous = fuel;
        }
        assert!(fuel > 98.0);
    }

    #[test]
    fn test_burn_exhausts_fuel() {
        let next = engine().burn(10.0, 100.0, 40.0);
        assert_eq!(
            next,
            CellState::Burned {
                fuel_capacity: 100.0
            }
        );
    }

    #[test]
    fn test_burn_below_threshold_extinguishes() {
        assert!(engine().burn(90.0, 100.0, 24.9).is_burned());
        let still = engine().burn(90.0, 100.0, 30.0);
        assert_eq!(still, burning(60.0, 30.0));
    }

    #[test]
    fn test_burn_non_positive_rate_extinguishes_without_threshold() {
        let e = TransitionEngine::new(TransitionParams {
            extinguish_threshold: 0.0,
            ..TransitionParams::default()
        })
        .unwrap();
        assert!(e.burn(50.0, 100.0, 0.0).is_burned());
        assert!(e.burn(50.0, 100.0, -3.0).is_burned());
        assert!(e.burn(50.0, 100.0, 1.0).is_burning());
    }

    #[test]
    fn test_regrowth_start_variants() {
        assert_eq!(engine().regrow_from_burned(80.0).fuel(), 0.0);
        let full = TransitionEngine::new(TransitionParams {
            regrowth_start: RegrowthStart::Full,
            ..TransitionParams::default()
        })
        .unwrap();
        let tree = full.regrow_from_burned(80.0);
        assert_eq!(tree.fuel(), 80.0);
        assert_eq!(tree.iterations_since_burned(), 1);
    }

    #[test]
    fn test_neighbor_ignition_transfers_clamped_energy() {
        let mut cells = vec![CellState::tree(100.0); 2];
        cells[0] = burning(100.0, 40.0);
        let grid = Grid::new(2, 1, cells).unwrap();

        // Gaussian above 1 clamps to a full transfer
        let mut rng = FixedVariate {
            uniform: 0.05,
            gaussian: 1.7,
        };
        let update = engine().transition_cell(&grid, Coordinate::new(1, 0), &mut rng, 1.0);
        assert_eq!(update.next, burning(100.0, 40.0));
        assert!(!update.spontaneous_ignition);

        // Negative Gaussian clamps to zero: no ignition
        let mut rng = FixedVariate {
            uniform: 0.05,
            gaussian: -0.3,
        };
        let update = engine().transition_cell(&grid, Coordinate::new(1, 0), &mut rng, 1.0);
        assert!(update.next.is_tree());

        // Roll at the transfer probability fails
        let mut rng = FixedVariate {
            uniform: PROBABILITY_OF_FIRE_TRANSFER,
            gaussian: 0.5,
        };
        let update = engine().transition_cell(&grid, Coordinate::new(1, 0), &mut rng, 1.0);
        assert!(update.next.is_tree());
    }

    #[test]
    fn test_depleted_tree_resists_neighbor_fire() {
        let cells = vec![
            burning(100.0, 40.0),
            CellState::Tree {
                fuel: 79.0,
                fuel_capacity: 100.0,
                iterations_since_burned: 3,
            },
        ];
        let grid = Grid::new(2, 1, cells).unwrap();
        let mut rng = FixedVariate {
            uniform: 0.0,
            gaussian: 0.5,
        };
        let update = engine().transition_cell(&grid, Coordinate::new(1, 0), &mut rng, 1.0);
        assert!(update.next.is_tree());
        assert_eq!(update.next.iterations_since_burned(), 4);
    }

    #[test]
    fn test_first_burning_neighbor_wins() {
        // Neighbor scan visits (0, 1) before (2, 1); the weak fire there decides.
        let mut cells = vec![CellState::tree(100.0); 9];
        cells[3] = burning(100.0, 2.0); // (0, 1)
        cells[5] = burning(100.0, 90.0); // (2, 1)
        let grid = Grid::new(3, 3, cells).unwrap();
        assert_eq!(
            first_burning_neighbor_rate(&grid, Coordinate::new(1, 1)),
            Some(2.0)
        );
    }

    #[test]
    fn test_standalone_threshold_scales_with_factor() {
        let grid = Grid::filled(1, 1, CellState::tree(100.0)).unwrap();
        let limit = RANDOM_BURN_RATE_PROBABILITY * 2.0;

        let mut below = FixedVariate {
            uniform: limit * 0.999,
            gaussian: 55.0,
        };
        let update = engine().transition_cell(&grid, Coordinate::new(0, 0), &mut below, 2.0);
        assert!(update.spontaneous_ignition);
        assert_eq!(update.next, burning(100.0, 55.0));

        let mut at = FixedVariate {
            uniform: limit,
            gaussian: 55.0,
        };
        let update = engine().transition_cell(&grid, Coordinate::new(0, 0), &mut at, 2.0);
        assert!(!update.spontaneous_ignition);
        assert!(update.next.is_tree());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = TransitionParams {
            initial_energy_std_dev: -1.0,
            ..TransitionParams::default()
        };
        assert!(TransitionEngine::new(bad).is_err());
        let bad = TransitionParams {
            probability_of_fire_transfer: 1.5,
            ..TransitionParams::default()
        };
        assert!(TransitionEngine::new(bad).is_err());
    }
}
