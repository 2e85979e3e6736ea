//! Document open/drop adaptors
//!
//! Both run the native call inside a protected region. Open reports any
//! failure with one `cannot open document: ...` line and a null handle;
//! drop logs and swallows, since the handle is gone either way.

use super::context::Context;
use super::engine::NativeEngine;
use super::error::{Error, Result};
use super::protect::protected;
use super::sys::{fz_context, fz_document};
use std::ffi::{CStr, CString, c_char};
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};
use tracing::{debug, error};

/// Open `filename`, logging the single diagnostic line on failure.
///
/// # Safety
/// `ctx` must be null or a live context from `engine`.
unsafe fn open_logged<E: NativeEngine>(
    engine: &E,
    ctx: *mut fz_context,
    filename: &CStr,
) -> Result<NonNull<fz_document>> {
    let opened = if ctx.is_null() {
        Err(Error::NullArgument("context"))
    } else {
        // SAFETY: `ctx` is a live context from `engine`.
        protected(|| unsafe { engine.open_document(ctx, filename) })
    };
    match opened {
        Ok(doc) => {
            debug!(filename = %filename.to_string_lossy(), "document opened");
            Ok(doc)
        }
        Err(e) => {
            error!("cannot open document: {e}");
            Err(e)
        }
    }
}

/// Document-open adaptor. Returns null on any failure.
///
/// # Safety
/// `ctx` must be null or a live context from `engine`; `filename` must be
/// null or a NUL-terminated string.
pub unsafe fn open_document<E: NativeEngine>(
    engine: &E,
    ctx: *mut fz_context,
    filename: *const c_char,
) -> *mut fz_document {
    if filename.is_null() {
        error!("cannot open document: {}", Error::NullArgument("filename"));
        return ptr::null_mut();
    }
    // SAFETY: caller guarantees `filename` is NUL-terminated.
    let filename = unsafe { CStr::from_ptr(filename) };
    // SAFETY: forwarded caller contract.
    unsafe { open_logged(engine, ctx, filename) }.map_or(ptr::null_mut(), NonNull::as_ptr)
}

/// Document-drop adaptor. Never reports failure; null `doc` is a no-op.
///
/// # Safety
/// `doc` must be null or an open document of `ctx`, and must not be used
/// after this call.
pub unsafe fn drop_document<E: NativeEngine>(
    engine: &E,
    ctx: *mut fz_context,
    doc: *mut fz_document,
) {
    let Some(doc) = NonNull::new(doc) else {
        return;
    };
    let dropped = if ctx.is_null() {
        Err(Error::NullArgument("context"))
    } else {
        // SAFETY: forwarded caller contract.
        protected(|| unsafe { engine.drop_document(ctx, doc) })
    };
    match dropped {
        Ok(()) => debug!("document dropped"),
        Err(e) => error!("cannot drop document: {e}"),
    }
}

/// Native paths are byte strings; anything with an interior NUL is refused.
fn path_to_cstring(path: &Path) -> Result<CString> {
    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    };
    #[cfg(not(unix))]
    let bytes = path
        .to_str()
        .ok_or_else(|| Error::path(format!("{} is not valid UTF-8", path.display())))?
        .as_bytes()
        .to_vec();
    CString::new(bytes).map_err(|_| Error::path(format!("{} contains a NUL byte", path.display())))
}

/// An open document, released exactly once when dropped.
pub struct Document<'c, E: NativeEngine> {
    ctx: &'c Context<E>,
    raw: NonNull<fz_document>,
    path: PathBuf,
}

impl<'c, E: NativeEngine> Document<'c, E> {
    pub fn open<P: AsRef<Path>>(ctx: &'c Context<E>, path: P) -> Result<Self> {
        let path = path.as_ref();
        let filename = path_to_cstring(path).inspect_err(|e| {
            error!("cannot open document: {e}");
        })?;
        // SAFETY: `ctx` is a live context from its own engine.
        let raw = unsafe { open_logged(ctx.engine(), ctx.as_ptr(), &filename) }?;
        Ok(Self {
            ctx,
            raw,
            path: path.to_path_buf(),
        })
    }

    pub fn as_ptr(&self) -> *mut fz_document {
        self.raw.as_ptr()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the document now. Failures are logged, not returned.
    pub fn close(self) {
        drop(self);
    }
}

impl<E: NativeEngine> Drop for Document<'_, E> {
    fn drop(&mut self) {
        // SAFETY: `raw` was opened on this context and is released only here.
        unsafe { drop_document(self.ctx.engine(), self.ctx.as_ptr(), self.raw.as_ptr()) };
    }
}
