//! Pointer-width narrowing

/// Narrow a pointer difference to 32 bits.
///
/// In-range values come back unchanged. Anything wider keeps its low 32
/// bits, reinterpreted as signed; callers must not rely on that result.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn ptr_cast(value: isize) -> i32 {
    value as i32
}

/// Narrow a pointer difference, refusing values that do not fit.
#[inline]
pub fn checked_ptr_cast(value: isize) -> Option<i32> {
    i32::try_from(value).ok()
}
