use std::ptr;
use wildfire_ca_core::{CellKind, CellState, Coordinate, SimulationStats};

use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_simulation};
use crate::instance::WildfireInstance;

/// Kind of a cell as seen from C.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildfireCellKind {
    Empty = 0,
    Tree = 1,
    Burning = 2,
    Burned = 3,
}

impl From<CellKind> for WildfireCellKind {
    fn from(kind: CellKind) -> Self {
        match kind {
            CellKind::Empty => Self::Empty,
            CellKind::Tree => Self::Tree,
            CellKind::Burning => Self::Burning,
            CellKind::Burned => Self::Burned,
        }
    }
}

/// C-compatible view of one cell.
///
/// Fields that do not apply to the cell's kind are zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WildfireCell {
    pub kind: WildfireCellKind,
    pub fuel: f64,
    pub fuel_capacity: f64,
    pub burn_rate: f64,
    pub iterations_since_burned: u32,
}

impl From<&CellState> for WildfireCell {
    fn from(cell: &CellState) -> Self {
        Self {
            kind: cell.kind().into(),
            fuel: cell.fuel(),
            fuel_capacity: cell.fuel_capacity(),
            burn_rate: cell.burn_rate(),
            iterations_since_burned: cell.iterations_since_burned(),
        }
    }
}

/// A spontaneous ignition marker and the number of frames it has been shown.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnitionMarker {
    pub x: usize,
    pub y: usize,
    pub age: u32,
}

impl From<(Coordinate, u32)> for IgnitionMarker {
    fn from((coord, age): (Coordinate, u32)) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
            age,
        }
    }
}

/// Summary of the current generation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WildfireStats {
    pub generation: u64,
    pub empty: usize,
    pub tree: usize,
    /// Trees below the ignition fuel ratio
    pub recovering: usize,
    pub burning: usize,
    pub burned: usize,
    pub total_fuel: f64,
    pub active_markers: usize,
}

impl From<SimulationStats> for WildfireStats {
    fn from(stats: SimulationStats) -> Self {
        Self {
            generation: stats.generation,
            empty: stats.counts.empty,
            tree: stats.counts.tree,
            recovering: stats.recovering,
            burning: stats.counts.burning,
            burned: stats.counts.burned,
            total_fuel: stats.total_fuel,
            active_markers: stats.active_markers,
        }
    }
}

#[no_mangle]
/// Fill `out_width` and `out_height` with the grid dimensions.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_width` and `out_height` must be valid, non-null pointers to `usize`.
pub unsafe extern "C" fn wildfire_get_dimensions(
    ptr: *const WildfireInstance,
    out_width: *mut usize,
    out_height: *mut usize,
) -> WildfireErrorCode {
    if out_width.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_width"));
    }
    if out_height.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_height"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let (width, height) = with_simulation(instance, |sim| (sim.grid().width(), sim.grid().height()))?;
        unsafe {
            *out_width = width;
            *out_height = height;
        }
        Ok::<(), DefaultWildfireError>(())
    })
}

#[no_mangle]
/// Fill `out_cell` with the state of the cell at `(x, y)`.
///
/// - `out_found` (optional) receives whether the coordinate is inside the grid. If null, ignored.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success (check `out_found` to see if the cell exists)
/// - `WildfireErrorCode::NullPointer` if `ptr` or `out_cell` is null
/// - `WildfireErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_cell` must be a valid, non-null pointer to a `WildfireCell`.
/// - `out_found`, if non-null, must be a valid pointer to a `bool`.
pub unsafe extern "C" fn wildfire_get_cell(
    ptr: *const WildfireInstance,
    x: usize,
    y: usize,
    out_cell: *mut WildfireCell,
    out_found: *mut bool,
) -> WildfireErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let cell = with_simulation(instance, |sim| {
            sim.grid().get(Coordinate::new(x, y)).map(WildfireCell::from)
        })?;
        unsafe {
            if let Some(cell) = cell {
                *out_cell = cell;
            }
            if !out_found.is_null() {
                *out_found = cell.is_some();
            }
        }
        Ok::<(), DefaultWildfireError>(())
    })
}

#[no_mangle]
/// Return a borrowed pointer to the row-major cell kinds of the current generation.
///
/// Each byte is a `WildfireCellKind`. The buffer is reused between calls to avoid
/// per-frame allocations; the pointer stays valid until the next call to this
/// function or `wildfire_clear_snapshots` on the same instance.
/// **DO NOT FREE THIS POINTER**.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success with `width × height` bytes in `out_array`
/// - `WildfireErrorCode::NullPointer` if `ptr`, `out_len` or `out_array` is null
/// - `WildfireErrorCode::LockPoisoned` if an internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_len` must be a valid, non-null pointer to a `usize`.
/// - `out_array` must be a valid, non-null pointer to a `*const u8`.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// const uint8_t* kinds = nullptr;
/// if (wildfire_get_kinds(sim, &len, &kinds) == WildfireErrorCode::Ok) {
///     for (uintptr_t i = 0; i < len; i++) {
///         // kinds[i] == WildfireCellKind::Burning ...
///     }
/// }
/// ```
pub unsafe extern "C" fn wildfire_get_kinds(
    ptr: *const WildfireInstance,
    out_len: *mut usize,
    out_array: *mut *const u8,
) -> WildfireErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_len"));
    }
    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultWildfireError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut snapshot = instance
            .kind_snapshot
            .lock()
            .map_err(|_| DefaultWildfireError::lock_poisoned("kind_snapshot"))?;
        snapshot.clear();

        with_simulation(instance, |sim| {
            snapshot.extend(
                sim.grid()
                    .cells()
                    .iter()
                    .map(|cell| WildfireCellKind::from(cell.kind()) as u8),
            );
        })?;

        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }
        Ok::<(), DefaultWildfireError>(())
    });

    if result != WildfireErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}

#[no_mangle]
/// Return a borrowed pointer to the current ignition markers, in row-major order.
///
/// The buffer is reused between calls; the pointer stays valid until the next
/// call to this function or `wildfire_clear_snapshots` on the same instance.
/// **DO NOT FREE THIS POINTER**.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_len` must be a valid, non-null pointer to a `usize`.
/// - `out_array` must be a valid, non-null pointer to a `*const IgnitionMarker`.
pub unsafe extern "C" fn wildfire_get_ignition_markers(
    ptr: *const WildfireInstance,
    out_len: *mut usize,
    out_array: *mut *const IgnitionMarker,
) -> WildfireErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_len"));
    }
    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultWildfireError::null_pointer("out_array"));
    }

    let result = handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut snapshot = instance
            .marker_snapshot
            .lock()
            .map_err(|_| DefaultWildfireError::lock_poisoned("marker_snapshot"))?;
        snapshot.clear();

        with_simulation(instance, |sim| {
            snapshot.extend(
                sim.ignition_log()
                    .markers()
                    .into_iter()
                    .map(IgnitionMarker::from),
            );
        })?;

        unsafe {
            *out_len = snapshot.len();
            *out_array = snapshot.as_ptr();
        }
        Ok::<(), DefaultWildfireError>(())
    });

    if result != WildfireErrorCode::Ok {
        unsafe {
            *out_array = ptr::null();
            *out_len = 0;
        }
    }

    result
}

#[no_mangle]
/// Clear the cached snapshot buffers and free their memory.
///
/// Invalidates pointers previously returned by `wildfire_get_kinds` and
/// `wildfire_get_ignition_markers`.
pub extern "C" fn wildfire_clear_snapshots(ptr: *const WildfireInstance) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut kinds = instance
            .kind_snapshot
            .lock()
            .map_err(|_| DefaultWildfireError::lock_poisoned("kind_snapshot"))?;
        kinds.clear();
        kinds.shrink_to_fit();
        let mut markers = instance
            .marker_snapshot
            .lock()
            .map_err(|_| DefaultWildfireError::lock_poisoned("marker_snapshot"))?;
        markers.clear();
        markers.shrink_to_fit();
        Ok::<(), DefaultWildfireError>(())
    })
}

#[no_mangle]
/// Fill `out_stats` with a summary of the current generation.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_stats` must be a valid, non-null pointer to a `WildfireStats`.
pub unsafe extern "C" fn wildfire_get_stats(
    ptr: *const WildfireInstance,
    out_stats: *mut WildfireStats,
) -> WildfireErrorCode {
    if out_stats.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_stats"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let stats = with_simulation(instance, |sim| WildfireStats::from(sim.stats()))?;
        unsafe {
            *out_stats = stats;
        }
        Ok::<(), DefaultWildfireError>(())
    })
}
