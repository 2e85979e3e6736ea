//! C FFI for context construction - forwards the `fz_new_context` macro

use super::ffi_boundary_or;
use crate::fitz::context::new_context;
use crate::fitz::engine::MupdfEngine;
use crate::fitz::sys::{fz_alloc_context, fz_context, fz_locks_context};
use std::ptr;

/// Same-ABI wrapper around `fz_new_context`.
///
/// # Safety
/// `alloc` and `locks` can be NULL for default behavior; otherwise they
/// must outlive the returned context.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cgo_fz_new_context(
    alloc: *const fz_alloc_context,
    locks: *const fz_locks_context,
    max_store: usize,
) -> *mut fz_context {
    crate::log::ensure_init();
    // SAFETY: forwarded caller contract.
    ffi_boundary_or(ptr::null_mut(), || unsafe {
        new_context(&MupdfEngine, alloc, locks, max_store)
    })
}
