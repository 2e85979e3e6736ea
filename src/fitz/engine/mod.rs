//! The seam between the adaptors and the native library
//!
//! Everything the shim needs from MuPDF fits in four calls. Keeping them
//! behind a trait lets the adaptors be exercised without a native build,
//! and keeps the `fz_try` region on the implementation's side of the line.

#[cfg(feature = "mupdf")]
pub mod mupdf;

#[cfg(feature = "mupdf")]
pub use mupdf::MupdfEngine;

use super::error::Result;
use super::sys::{fz_alloc_context, fz_context, fz_document, fz_locks_context};
use std::ffi::CStr;
use std::ptr::NonNull;

/// A native document engine reachable through MuPDF's context/document API.
///
/// Implementations report a caught native exception as
/// [`Error::Native`](super::error::Error::Native) carrying the engine's
/// diagnostic text. They may also unwind; callers wrap every call in
/// [`protected`](super::protect::protected).
pub trait NativeEngine {
    /// Same-ABI forward of `fz_new_context`. Null means failure.
    ///
    /// # Safety
    /// `alloc` and `locks` must be null or valid for the lifetime of the
    /// returned context.
    unsafe fn new_context(
        &self,
        alloc: *const fz_alloc_context,
        locks: *const fz_locks_context,
        max_store: usize,
    ) -> *mut fz_context;

    /// `fz_drop_context`.
    ///
    /// # Safety
    /// `ctx` must come from `new_context` on this engine and not be used
    /// afterwards.
    unsafe fn drop_context(&self, ctx: *mut fz_context);

    /// `fz_open_document` inside a try region.
    ///
    /// # Safety
    /// `ctx` must be a live context from this engine.
    unsafe fn open_document(
        &self,
        ctx: *mut fz_context,
        filename: &CStr,
    ) -> Result<NonNull<fz_document>>;

    /// `fz_drop_document` inside a try region.
    ///
    /// # Safety
    /// `doc` must come from `open_document` on `ctx` and is gone after this
    /// call whatever the outcome.
    unsafe fn drop_document(&self, ctx: *mut fz_context, doc: NonNull<fz_document>) -> Result<()>;
}
