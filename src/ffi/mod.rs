//! C FFI Module - host-facing exports
//!
//! Symbol names and signatures here are the wire contract with the host's
//! binding layer and must not change. Nothing in this module lets a Rust
//! panic or a native exception escape to the caller.

pub mod cast;
#[cfg(feature = "mupdf")]
pub mod context;
#[cfg(feature = "mupdf")]
pub mod document;
pub mod locks;

use crate::fitz::protect::panic_message;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::error;

/// Run an export's body, returning `default` if it panics.
///
/// Unwinding out of an `extern "C"` function aborts the process, so every
/// export that reaches into fallible Rust code goes through here.
pub fn ffi_boundary_or<T, F>(default: T, f: F) -> T
where
    F: FnOnce() -> T,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(val) => val,
        Err(payload) => {
            error!("caught panic at FFI boundary: {}", panic_message(&*payload));
            default
        }
    }
}
