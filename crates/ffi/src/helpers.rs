use crate::error::{with_last_error_mut, DefaultWildfireError, WildfireError, WildfireErrorCode};
use crate::instance::WildfireInstance;
use std::ffi::CString;
use tracing::warn;
use wildfire_ca_core::WildfireSimulation;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl WildfireError) {
    warn!(code = ?error.code(), "{}", error.msg());
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error and return its code.
#[inline]
pub(crate) fn track_error(error: &impl WildfireError) -> WildfireErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WildfireErrorCode::Ok;
    });
}

/// Record the error of a failed result, passing the value through on success.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, WildfireErrorCode>
where
    E: WildfireError,
{
    result.map_err(|e| track_error(&e))
}

/// Run an FFI body and translate its result into a code, updating the last error.
pub(crate) fn handle_ffi_result_error<F, E>(f: F) -> WildfireErrorCode
where
    F: FnOnce() -> Result<(), E>,
    E: WildfireError,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            WildfireErrorCode::Ok
        }
        Err(e) => track_error(&e),
    }
}

/// Borrow the instance behind an opaque pointer.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const WildfireInstance,
) -> Result<&'a WildfireInstance, DefaultWildfireError> {
    // SAFETY: non-null pointers handed to the FFI come from `wildfire_new`
    // and stay valid until `wildfire_destroy`.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultWildfireError::null_pointer("ptr"))
}

/// Run `f` under the simulation read lock.
pub(crate) fn with_simulation<T>(
    instance: &WildfireInstance,
    f: impl FnOnce(&WildfireSimulation) -> T,
) -> Result<T, DefaultWildfireError> {
    let sim = instance
        .sim
        .read()
        .map_err(|_| DefaultWildfireError::lock_poisoned("simulation"))?;
    Ok(f(&sim))
}

/// Run `f` under the simulation write lock.
pub(crate) fn with_simulation_mut<T>(
    instance: &WildfireInstance,
    f: impl FnOnce(&mut WildfireSimulation) -> T,
) -> Result<T, DefaultWildfireError> {
    let mut sim = instance
        .sim
        .write()
        .map_err(|_| DefaultWildfireError::lock_poisoned("simulation"))?;
    Ok(f(&mut sim))
}
