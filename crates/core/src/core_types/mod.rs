//! Core types and utilities

pub mod cell;
pub mod color;
pub mod random;
pub mod spatial;

pub use cell::{CellKind, CellState};
pub use color::{Hsv, Rgb};
pub use random::{EntropyStreams, RandomStreams, RandomVariate, RngVariate, SeededStreams};
pub use spatial::{Coordinate, MOORE_OFFSETS};
