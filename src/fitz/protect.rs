//! Protected call region
//!
//! MuPDF's own `fz_try`/`fz_catch` is entered on the C side (see
//! `csrc/protect.c`) and comes back here as `Error::Native`. What remains
//! is making sure an engine that unwinds, instead of returning, is also
//! turned into a value before anything crosses back to the host.

use super::error::{Error, Result};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Run `f`, converting an unwind into [`Error::Panic`].
pub fn protected<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Error::Panic(panic_message(&*payload))),
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
