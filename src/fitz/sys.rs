//! Raw MuPDF types, laid out as in `mupdf/fitz/context.h`

#![allow(non_camel_case_types)]

use std::ffi::{c_int, c_void};
use std::marker::{PhantomData, PhantomPinned};

/// Opaque `fz_context`.
#[repr(C)]
pub struct fz_context {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque `fz_document`.
#[repr(C)]
pub struct fz_document {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque `fz_alloc_context`. Only ever forwarded.
#[repr(C)]
pub struct fz_alloc_context {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Lock callback signature: `void (*)(void *user, int lock)`.
pub type fz_lock_fn = unsafe extern "C" fn(user: *mut c_void, lock: c_int);

/// Locking callback table handed to `fz_new_context`.
#[repr(C)]
#[derive(Debug)]
pub struct fz_locks_context {
    pub user: *mut c_void,
    pub lock: fz_lock_fn,
    pub unlock: fz_lock_fn,
}

/// `FZ_LOCK_ALLOC`
pub const FZ_LOCK_ALLOC: c_int = 0;
/// `FZ_LOCK_FREETYPE`
pub const FZ_LOCK_FREETYPE: c_int = 1;
/// `FZ_LOCK_GLYPHCACHE`
pub const FZ_LOCK_GLYPHCACHE: c_int = 2;
/// Number of distinct lock domains MuPDF coordinates.
pub const FZ_LOCK_MAX: usize = 3;

/// `FZ_STORE_UNLIMITED`
pub const FZ_STORE_UNLIMITED: usize = 0;
/// `FZ_STORE_DEFAULT`: 256 MiB.
pub const FZ_STORE_DEFAULT: usize = 256 << 20;
