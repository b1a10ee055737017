//! C ABI for the wildfire cellular automaton
//!
//! An opaque `WildfireInstance` is created from packed RGB(A) pixels with
//! `wildfire_new`, advanced once per tick with `wildfire_step`, queried with the
//! `wildfire_get_*` functions and freed with `wildfire_destroy`. Every fallible
//! function returns a `WildfireErrorCode` and records a thread-local message
//! readable through `wildfire_get_last_error`.

mod config;
mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use config::{wildfire_config_default, WildfireConfig};
pub use error::{wildfire_get_last_error, wildfire_get_last_error_code, WildfireErrorCode};
pub use instance::{wildfire_destroy, wildfire_new, WildfireInstance};
pub use queries::{
    wildfire_clear_snapshots, wildfire_get_cell, wildfire_get_dimensions,
    wildfire_get_ignition_markers, wildfire_get_kinds, wildfire_get_stats, IgnitionMarker,
    WildfireCell, WildfireCellKind, WildfireStats,
};
pub use simulation::{wildfire_advance_markers, wildfire_ignite, wildfire_step};
