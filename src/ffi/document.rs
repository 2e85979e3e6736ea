//! C FFI for document open/drop - `fz_try` regions the host cannot enter

use super::ffi_boundary_or;
use crate::fitz::document::{drop_document, open_document};
use crate::fitz::engine::MupdfEngine;
use crate::fitz::sys::{fz_context, fz_document};
use std::ffi::c_char;
use std::ptr;

/// Open a document, returning NULL (and logging why) on any failure.
///
/// # Safety
/// `ctx` must be a live context; `filename` a NUL-terminated path.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cgo_open_document(
    ctx: *mut fz_context,
    filename: *const c_char,
) -> *mut fz_document {
    crate::log::ensure_init();
    // SAFETY: forwarded caller contract.
    ffi_boundary_or(ptr::null_mut(), || unsafe {
        open_document(&MupdfEngine, ctx, filename)
    })
}

/// Drop a document. Failures are logged and swallowed.
///
/// # Safety
/// `doc` must come from [`cgo_open_document`] on `ctx` and is invalid
/// afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cgo_drop_document(ctx: *mut fz_context, doc: *mut fz_document) {
    crate::log::ensure_init();
    // SAFETY: forwarded caller contract.
    ffi_boundary_or((), || unsafe { drop_document(&MupdfEngine, ctx, doc) });
}
