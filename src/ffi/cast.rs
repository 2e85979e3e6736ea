//! C FFI for integer narrowing the host's type system cannot express

use crate::fitz::cast::ptr_cast;
use std::ffi::c_int;

/// Narrow a `ptrdiff_t` to `int`.
///
/// Out-of-range values are truncated, not rejected.
#[unsafe(no_mangle)]
pub extern "C" fn cgo_ptr_cast(ptr: isize) -> c_int {
    ptr_cast(ptr)
}
