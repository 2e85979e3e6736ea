//! C FFI for the lock registry - `new_locks`, `free_locks` and the two
//! callbacks MuPDF invokes through `fz_locks_context`

use super::ffi_boundary_or;
use crate::fitz::error::Error;
use crate::fitz::locks::{LockBank, LockRegistry};
use crate::fitz::sys::fz_locks_context;
use std::ffi::{c_int, c_void};
use std::ptr;
use tracing::error;

/// Resolve a callback's `user` pointer to its bank.
///
/// # Safety
/// `user` must be null or the `user` field of a live registry's table.
unsafe fn bank<'a>(user: *mut c_void) -> Option<&'a LockBank> {
    // SAFETY: guaranteed by the caller.
    unsafe { user.cast::<LockBank>().as_ref() }
}

/// Lock callback. Blocks until lock `lock_no` is held.
///
/// Failures are logged; the callback signature has no way to report them.
///
/// # Safety
/// `user` must come from a table built by [`new_locks`] or
/// [`LockRegistry::new`] that has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lock_mutex(user: *mut c_void, lock_no: c_int) {
    // SAFETY: forwarded caller contract.
    let Some(bank) = (unsafe { bank(user) }) else {
        error!("lock_mutex failed! {}", Error::NullArgument("lock table"));
        return;
    };
    if let Err(e) = bank.lock(lock_no) {
        error!("lock_mutex failed! {e}");
    }
}

/// Unlock callback. Releases lock `lock_no`.
///
/// # Safety
/// Same contract as [`lock_mutex`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn unlock_mutex(user: *mut c_void, lock_no: c_int) {
    // SAFETY: forwarded caller contract.
    let Some(bank) = (unsafe { bank(user) }) else {
        error!("unlock_mutex failed! {}", Error::NullArgument("lock table"));
        return;
    };
    if let Err(e) = bank.unlock(lock_no) {
        error!("unlock_mutex failed! {e}");
    }
}

/// Allocate and wire a lock table for `fz_new_context`.
///
/// Returns null if the mutexes cannot be allocated.
#[unsafe(no_mangle)]
pub extern "C" fn new_locks() -> *mut fz_locks_context {
    crate::log::ensure_init();
    ffi_boundary_or(ptr::null_mut(), || match LockRegistry::new() {
        Ok(registry) => registry.into_raw(),
        Err(e) => {
            error!("Unable to allocate mutexes! {e}");
            ptr::null_mut()
        }
    })
}

/// Release a table returned by [`new_locks`]. Null is ignored.
///
/// # Safety
/// No context may still reference `locks`, and no thread may be inside
/// its callbacks.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_locks(locks: *mut fz_locks_context) {
    // SAFETY: forwarded caller contract.
    drop(unsafe { LockRegistry::from_raw(locks) });
}
