//! MuPDF through `csrc/protect.c`
//!
//! `fz_new_context` is a macro and `fz_try` is `setjmp`, so both are only
//! reachable from C. The trampolines report a caught exception through an
//! out-pointer to `fz_caught_message`, which stays valid until the next
//! exception on the same context; it is copied out immediately.

use super::NativeEngine;
use crate::fitz::error::{Error, Result};
use crate::fitz::sys::{fz_alloc_context, fz_context, fz_document, fz_locks_context};
use std::ffi::{CStr, c_char, c_int};
use std::ptr::{self, NonNull};

unsafe extern "C" {
    fn faster_raster_new_context(
        alloc: *const fz_alloc_context,
        locks: *const fz_locks_context,
        max_store: usize,
    ) -> *mut fz_context;

    fn faster_raster_open_document(
        ctx: *mut fz_context,
        filename: *const c_char,
        message: *mut *const c_char,
    ) -> *mut fz_document;

    fn faster_raster_drop_document(
        ctx: *mut fz_context,
        doc: *mut fz_document,
        message: *mut *const c_char,
    ) -> c_int;

    fn fz_drop_context(ctx: *mut fz_context);
}

/// The system MuPDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfEngine;

/// Copy a caught message before the next `fz_try` overwrites it.
fn caught(message: *const c_char) -> Error {
    if message.is_null() {
        return Error::native("unknown error");
    }
    // SAFETY: non-null messages point at MuPDF's NUL-terminated error buffer.
    Error::native(unsafe { CStr::from_ptr(message) }.to_string_lossy())
}

impl NativeEngine for MupdfEngine {
    unsafe fn new_context(
        &self,
        alloc: *const fz_alloc_context,
        locks: *const fz_locks_context,
        max_store: usize,
    ) -> *mut fz_context {
        // SAFETY: forwarded caller contract.
        unsafe { faster_raster_new_context(alloc, locks, max_store) }
    }

    unsafe fn drop_context(&self, ctx: *mut fz_context) {
        // SAFETY: forwarded caller contract.
        unsafe { fz_drop_context(ctx) }
    }

    unsafe fn open_document(
        &self,
        ctx: *mut fz_context,
        filename: &CStr,
    ) -> Result<NonNull<fz_document>> {
        let mut message = ptr::null();
        // SAFETY: forwarded caller contract; `message` outlives the call.
        let doc = unsafe { faster_raster_open_document(ctx, filename.as_ptr(), &mut message) };
        NonNull::new(doc).ok_or_else(|| caught(message))
    }

    unsafe fn drop_document(&self, ctx: *mut fz_context, doc: NonNull<fz_document>) -> Result<()> {
        let mut message = ptr::null();
        // SAFETY: forwarded caller contract; `message` outlives the call.
        match unsafe { faster_raster_drop_document(ctx, doc.as_ptr(), &mut message) } {
            0 => Ok(()),
            _ => Err(caught(message)),
        }
    }
}
