use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_simulation_mut};
use crate::instance::WildfireInstance;
use wildfire_ca_core::Coordinate;

/// Advance the simulation by one generation.
///
/// Thread-safe: acquires the `RwLock` write lock for the step. Readers see either
/// the previous or the new generation, never a mix.
///
/// - `out_new_ignitions` (optional) receives the number of spontaneous ignitions
///   recorded this step. If null, ignored.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success
/// - `WildfireErrorCode::NullPointer` if `ptr` is null
/// - `WildfireErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_new_ignitions`, if non-null, must be a valid pointer to a `usize`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_step(
    ptr: *const WildfireInstance,
    out_new_ignitions: *mut usize,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let report = with_simulation_mut(instance, |sim| sim.tick())?;
        if !out_new_ignitions.is_null() {
            unsafe {
                *out_new_ignitions = report.new_ignitions.len();
            }
        }
        Ok::<(), DefaultWildfireError>(())
    })
}

/// Set the Tree cell at `(x, y)` on fire with the given burn rate.
///
/// The change is visible immediately and is not recorded as an ignition marker.
///
/// - `out_ignited` receives whether the cell was ignited; it is false when the
///   coordinate is outside the grid or the cell is not a Tree.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success (check `out_ignited`)
/// - `WildfireErrorCode::NullPointer` if `ptr` or `out_ignited` is null
/// - `WildfireErrorCode::InvalidConfiguration` if `burn_rate` is not finite and positive
/// - `WildfireErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_ignited` must be a valid, non-null pointer to a `bool`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_ignite(
    ptr: *const WildfireInstance,
    x: usize,
    y: usize,
    burn_rate: f64,
    out_ignited: *mut bool,
) -> WildfireErrorCode {
    if out_ignited.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_ignited"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let ignited =
            with_simulation_mut(instance, |sim| sim.ignite(Coordinate::new(x, y), burn_rate))??;
        unsafe {
            *out_ignited = ignited;
        }
        Ok::<(), DefaultWildfireError>(())
    })
}

/// Age every ignition marker by one displayed frame and drop expired ones.
///
/// Call once per rendered frame. Markers are removed after the configured
/// `outline_display_length` frames.
///
/// - `out_evicted` (optional) receives the number of markers removed. If null, ignored.
///
/// # Safety
///
/// - `ptr` must be a valid pointer returned by `wildfire_new` or null.
/// - `out_evicted`, if non-null, must be a valid pointer to a `usize`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_advance_markers(
    ptr: *const WildfireInstance,
    out_evicted: *mut usize,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let evicted = with_simulation_mut(instance, |sim| sim.advance_markers())?;
        if !out_evicted.is_null() {
            unsafe {
                *out_evicted = evicted.len();
            }
        }
        Ok::<(), DefaultWildfireError>(())
    })
}
