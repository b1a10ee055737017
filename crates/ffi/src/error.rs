use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use wildfire_ca_core::SimulationError;

/// Common interface for errors that cross the FFI boundary.
///
/// - `code()` - the code returned to the caller
/// - `msg()` - the diagnostic message stored for `wildfire_get_last_error`
pub(crate) trait WildfireError {
    fn code(&self) -> WildfireErrorCode;

    fn msg(&self) -> &str;
}

/// Error code plus message for the common FFI failure cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultWildfireError {
    code: WildfireErrorCode,
    msg: String,
}

impl DefaultWildfireError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: WildfireErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"simulation"`, `"kind_snapshot"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: WildfireErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for an argument the core never sees (sizes, channel counts).
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: WildfireErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl From<SimulationError> for DefaultWildfireError {
    fn from(error: SimulationError) -> Self {
        let code = match error {
            SimulationError::DimensionMismatch { .. } => WildfireErrorCode::DimensionMismatch,
            SimulationError::InvalidConfiguration { .. } => WildfireErrorCode::InvalidConfiguration,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl WildfireError for DefaultWildfireError {
    fn code(&self) -> WildfireErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by wildfire functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildfireErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Raster or grid size does not match the configured width and height.
    DimensionMismatch = 3,

    /// A configuration value (probability, threshold, Gaussian parameter,
    /// dimension, scale factor, burn rate) is outside its domain.
    InvalidConfiguration = 4,

    /// Invalid parameter passed to function.
    InvalidParameter = 5,
}

impl From<DefaultWildfireError> for WildfireErrorCode {
    fn from(error: DefaultWildfireError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (message, code).
    /// The `CString` is owned here so the pointer handed to C stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, WildfireErrorCode)> = const { RefCell::new((None, WildfireErrorCode::Ok)) };
}

pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, WildfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, WildfireErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call succeeded or no call failed yet.
///
/// # Thread Safety
/// Error state is per thread.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error. **DO NOT FREE THIS POINTER**.
///
/// Example:
/// ```cpp
/// WildfireInstance* sim = nullptr;
/// WildfireErrorCode err = wildfire_new(&config, pixels, len, 4, &sim);
/// if (err != WildfireErrorCode::Ok) {
///     const char* error = wildfire_get_last_error();
///     if (error) {
///         printf("Wildfire creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn wildfire_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn wildfire_get_last_error_code() -> WildfireErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
