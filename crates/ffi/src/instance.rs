use std::ptr;
use std::sync::{Mutex, RwLock};
use tracing::info;
use wildfire_ca_core::{RgbRaster, SimulationConfig, SimulationError, WildfireSimulation};

use crate::config::WildfireConfig;
use crate::error::{DefaultWildfireError, WildfireErrorCode};
use crate::helpers::{track_error, track_result};
use crate::queries::IgnitionMarker;

/// The wildfire simulation context behind an opaque C pointer.
///
/// # Thread Safety
/// The simulation is protected by an `RwLock`:
/// - **Multiple concurrent readers** (cell, kind, marker and stats queries): `.read()` lock
/// - **Exclusive writer** (`wildfire_step`, `wildfire_ignite`, `wildfire_advance_markers`): `.write()` lock
///
/// A renderer thread may therefore query the grid while a driver thread steps it;
/// every query observes one complete generation.
///
/// Borrowed snapshot buffers handed out by queries live in `Mutex`-protected
/// caches and are reused between calls to avoid per-frame allocations.
pub struct WildfireInstance {
    pub(crate) sim: RwLock<WildfireSimulation>,
    /// Row-major `WildfireCellKind` bytes, reused by `wildfire_get_kinds`.
    pub(crate) kind_snapshot: Mutex<Vec<u8>>,
    /// Ignition markers, reused by `wildfire_get_ignition_markers`.
    pub(crate) marker_snapshot: Mutex<Vec<IgnitionMarker>>,
}

impl WildfireInstance {
    /// Classify packed pixels and build the simulation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a bad channel count or a byte count that
    /// overflows or splits a pixel, `DimensionMismatch` when the pixels do not cover
    /// `width × height`, and `InvalidConfiguration` for out-of-domain settings.
    pub(crate) fn new(
        config: SimulationConfig,
        pixels: &[u8],
        channels: usize,
    ) -> Result<Box<Self>, DefaultWildfireError> {
        if channels != 3 && channels != 4 {
            return Err(DefaultWildfireError::invalid_parameter(format!(
                "channels must be 3 (RGB) or 4 (RGBA), got {channels}"
            )));
        }
        let expected = config
            .width
            .checked_mul(config.height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| {
                DefaultWildfireError::invalid_parameter(format!(
                    "raster {}x{} with {channels} channels overflows",
                    config.width, config.height
                ))
            })?;
        if pixels.len() % channels != 0 {
            return Err(DefaultWildfireError::invalid_parameter(format!(
                "pixel_len {} is not a whole number of {channels}-byte pixels",
                pixels.len()
            )));
        }
        if pixels.len() != expected {
            return Err(SimulationError::DimensionMismatch {
                expected_width: config.width,
                expected_height: config.height,
                actual: pixels.len() / channels,
            }
            .into());
        }

        let raster = RgbRaster::from_packed(config.width, config.height, pixels, channels)?;
        let sim = WildfireSimulation::from_raster(config, &raster)?;
        let cell_count = config.width * config.height;

        info!(
            width = config.width,
            height = config.height,
            channels,
            "wildfire instance created"
        );

        Ok(Box::new(Self {
            sim: RwLock::new(sim),
            kind_snapshot: Mutex::new(Vec::with_capacity(cell_count)),
            marker_snapshot: Mutex::new(Vec::new()),
        }))
    }
}

/// Create a new wildfire instance from packed pixels and return it via out-parameter.
///
/// - Returns `WildfireErrorCode::Ok` (0) on success with a valid instance in `out_instance`
/// - Returns a non-zero error code on failure with `out_instance` set to null
///
/// Parameters
/// - `config`: configuration to use, or null for `wildfire_config_default()`.
/// - `pixels`: `width × height × channels` bytes, row-major. Copied; the caller
///   may free them after this call.
/// - `pixel_len`: byte length of `pixels`.
/// - `channels`: 3 for RGB, 4 for RGBA (alpha ignored).
/// - `out_instance`: receives the created instance. Must be non-null.
///
/// Returns
/// - `WildfireErrorCode::NullPointer` — `pixels` or `out_instance` is null
/// - `WildfireErrorCode::InvalidParameter` — bad channel count, or `pixel_len` not a whole number of pixels
/// - `WildfireErrorCode::DimensionMismatch` — raster size differs from the config
/// - `WildfireErrorCode::InvalidConfiguration` — out-of-domain configuration value
///
/// # Safety
///
/// - `config`, if non-null, must point to a valid `WildfireConfig`.
/// - `pixels` must point to at least `pixel_len` readable bytes.
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller owns the returned instance and MUST call `wildfire_destroy` exactly once.
///
/// Example (C++)
/// ```cpp
/// WildfireConfig config = wildfire_config_default();
/// config.use_seed = true;
/// config.seed = 42;
/// WildfireInstance* sim = nullptr;
/// WildfireErrorCode err = wildfire_new(&config, rgba, 928 * 800 * 4, 4, &sim);
/// if (err != WildfireErrorCode::Ok) {
///     fprintf(stderr, "Failed to create simulation: %s\n", wildfire_get_last_error());
///     return;
/// }
/// // ... use sim ...
/// wildfire_destroy(sim);
/// ```
#[no_mangle]
pub unsafe extern "C" fn wildfire_new(
    config: *const WildfireConfig,
    pixels: *const u8,
    pixel_len: usize,
    channels: usize,
    out_instance: *mut *mut WildfireInstance,
) -> WildfireErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultWildfireError::null_pointer("out_instance"));
    }
    if pixels.is_null() {
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultWildfireError::null_pointer("pixels"));
    }

    // SAFETY: caller guarantees `config` is null or valid.
    let config = match unsafe { config.as_ref() } {
        Some(c) => SimulationConfig::from(c),
        None => SimulationConfig::default(),
    };
    // SAFETY: caller guarantees `pixels` covers `pixel_len` bytes.
    let pixels = unsafe { std::slice::from_raw_parts(pixels, pixel_len) };

    match track_result(WildfireInstance::new(config, pixels, channels)) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            WildfireErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroys an instance previously created by `wildfire_new`.
///
/// - If `ptr` is null, this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `wildfire_new` and not freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn wildfire_destroy(ptr: *mut WildfireInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `wildfire_new` and not yet freed.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
