//! Whole-grid transition properties
//!
//! Runs the engine over many generations with seeded and stubbed variates and
//! checks the invariants every generation must satisfy.

use approx::assert_relative_eq;
use wildfire_ca_core::{
    CellState, Coordinate, Grid, RandomVariate, RegrowthStart, RngVariate, TransitionEngine,
    TransitionParams,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Always returns the same pair of draws
struct Stub {
    uniform: f64,
    gaussian: f64,
}

impl RandomVariate for Stub {
    fn uniform(&mut self) -> f64 {
        self.uniform
    }

    fn gaussian(&mut self, _mean: f64, _std_dev: f64) -> f64 {
        self.gaussian
    }
}

/// Mixed landscape with a few fires already burning
fn landscape(width: usize, height: usize) -> Grid {
    Grid::from_fn(width, height, |c| {
        if (c.x * 7 + c.y * 3) % 11 == 0 {
            CellState::Empty
        } else if (c.x + c.y * width) % 37 == 0 {
            CellState::Burning {
                fuel: 90.0,
                fuel_capacity: 100.0,
                burn_rate: 30.0,
            }
        } else {
            CellState::tree(40.0 + ((c.x * c.y) % 60) as f64)
        }
    })
    .unwrap()
}

fn engine() -> TransitionEngine {
    TransitionEngine::new(TransitionParams::default()).unwrap()
}

#[test]
fn test_invariants_hold_over_many_generations() {
    init_tracing();
    let engine = engine();
    let mut rng = RngVariate::seeded(2024);
    let mut grid = landscape(40, 30);
    let empties: Vec<Coordinate> = grid
        .iter()
        .filter(|(_, cell)| cell.is_empty())
        .map(|(c, _)| c)
        .collect();

    for _ in 0..200 {
        // A large scale factor keeps fires appearing throughout the run
        let next = engine.step(&grid, &mut rng, 2_000.0).grid;

        for (coord, cell) in next.iter() {
            let fuel = cell.fuel();
            let cap = cell.fuel_capacity();
            if !cell.is_empty() {
                assert!(fuel >= 0.0 && fuel <= cap, "fuel {fuel} outside [0, {cap}] at {coord}");
            }

            let before = grid.cell(coord);
            if before.is_burning() && cell.is_burning() {
                assert!(cell.fuel() <= before.fuel(), "burning fuel grew at {coord}");
            }
            if before.is_burned() {
                assert!(cell.is_tree());
                assert_eq!(cell.iterations_since_burned(), 1);
            }
            assert_eq!(cell.fuel_capacity(), before.fuel_capacity());
        }

        for &c in &empties {
            assert!(next.cell(c).is_empty());
        }
        grid = next;
    }
}

#[test]
fn test_burned_regrows_regardless_of_draws() {
    let grid = Grid::filled(3, 3, CellState::Burned { fuel_capacity: 80.0 }).unwrap();
    for (uniform, gaussian) in [(0.0, 1e9), (0.999_999, -1e9)] {
        let mut stub = Stub { uniform, gaussian };
        let next = engine().step(&grid, &mut stub, 1.0).grid;
        for (_, cell) in next.iter() {
            assert_eq!(
                *cell,
                CellState::Tree {
                    fuel: 0.0,
                    fuel_capacity: 80.0,
                    iterations_since_burned: 1
                }
            );
        }
    }
}

#[test]
fn test_regrowth_follows_curve_from_burned() {
    let params = TransitionParams {
        random_burn_rate_probability: 0.0,
        ..TransitionParams::default()
    };
    let engine = TransitionEngine::new(params).unwrap();
    let mut grid = Grid::filled(1, 1, CellState::Burned { fuel_capacity: 100.0 }).unwrap();
    let mut rng = RngVariate::seeded(1);

    grid = engine.step(&grid, &mut rng, 1.0).grid;
    for i in 1..=10_u32 {
        grid = engine.step(&grid, &mut rng, 1.0).grid;
        let cell = grid.cell(Coordinate::new(0, 0));
        let expected = 100.0 * f64::from(i) / (5.0 + f64::from(i));
        assert_relative_eq!(cell.fuel(), expected, epsilon = 1e-9);
        assert_eq!(cell.iterations_since_burned(), i + 1);
    }
}

#[test]
fn test_full_regrowth_start() {
    let params = TransitionParams {
        regrowth_start: RegrowthStart::Full,
        ..TransitionParams::default()
    };
    let engine = TransitionEngine::new(params).unwrap();
    let grid = Grid::filled(2, 2, CellState::Burned { fuel_capacity: 60.0 }).unwrap();
    let mut stub = Stub {
        uniform: 0.5,
        gaussian: 0.5,
    };
    let next = engine.step(&grid, &mut stub, 1.0).grid;
    assert!(next.cells().iter().all(|c| c.fuel() == 60.0));
}

#[test]
fn test_fire_spreads_only_through_neighbors() {
    // Burning corner; with a sure transfer roll only its three neighbors ignite.
    let mut cells = vec![CellState::tree(100.0); 16];
    cells[0] = CellState::Burning {
        fuel: 100.0,
        fuel_capacity: 100.0,
        burn_rate: 40.0,
    };
    let grid = Grid::new(4, 4, cells).unwrap();
    let mut stub = Stub {
        uniform: 0.01,
        gaussian: 0.5,
    };
    let outcome = engine().step(&grid, &mut stub, 0.0);
    assert!(outcome.new_ignitions.is_empty());

    let burning: Vec<Coordinate> = outcome
        .grid
        .iter()
        .filter(|(_, cell)| cell.is_burning())
        .map(|(c, _)| c)
        .collect();
    assert_eq!(
        burning,
        vec![
            Coordinate::new(0, 0),
            Coordinate::new(1, 0),
            Coordinate::new(0, 1),
            Coordinate::new(1, 1),
        ]
    );
    let caught = outcome.grid.cell(Coordinate::new(1, 1));
    assert_relative_eq!(caught.burn_rate(), 20.0);
}

#[test]
fn test_zero_rate_neighbor_counts_as_no_fire() {
    let cells = vec![
        CellState::Burning {
            fuel: 50.0,
            fuel_capacity: 100.0,
            burn_rate: 0.0,
        },
        CellState::tree(100.0),
    ];
    let grid = Grid::new(2, 1, cells).unwrap();
    // A tiny uniform would ignite spontaneously if the standalone branch runs
    let mut stub = Stub {
        uniform: 0.0,
        gaussian: 45.0,
    };
    let outcome = engine().step(&grid, &mut stub, 1.0);
    assert_eq!(outcome.new_ignitions, vec![Coordinate::new(1, 0)]);
    assert_relative_eq!(outcome.grid.cell(Coordinate::new(1, 0)).burn_rate(), 45.0);
    assert!(outcome.grid.cell(Coordinate::new(0, 0)).is_burned());
}

#[test]
fn test_spontaneous_ignitions_reported_in_raster_order() {
    let grid = Grid::filled(3, 2, CellState::tree(100.0)).unwrap();
    let mut stub = Stub {
        uniform: 0.0,
        gaussian: 50.0,
    };
    let outcome = engine().step(&grid, &mut stub, 1.0);
    let expected: Vec<Coordinate> = grid.iter().map(|(c, _)| c).collect();
    assert_eq!(outcome.new_ignitions, expected);
}
