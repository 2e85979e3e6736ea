//! Shared helpers for the integration tests: a scripted native engine and
//! a stderr stand-in for capturing diagnostics.

#![allow(dead_code)]

use faster_raster::fitz::sys::{
    FZ_LOCK_ALLOC, fz_alloc_context, fz_context, fz_document, fz_locks_context,
};
use faster_raster::{Error, NativeEngine, Result};
use std::ffi::{CStr, c_int};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Body of a file the fake engine accepts.
pub const WELL_FORMED: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";
/// Accepted on open, but the engine throws while dropping it.
pub const FAILS_ON_DROP: &[u8] = b"%PDF-1.4\n%%DROP-FAIL\n%%EOF\n";
/// The engine unwinds instead of returning.
pub const UNWINDS: &[u8] = b"%PANIC\n";
/// Not a document at all.
pub const CORRUPT: &[u8] = b"this is not a pdf";

#[derive(Default)]
pub struct FakeStats {
    pub contexts: AtomicUsize,
    pub opened: AtomicUsize,
    pub dropped: AtomicUsize,
    inside: AtomicUsize,
    pub max_inside: AtomicUsize,
}

impl FakeStats {
    /// Stand-in for work MuPDF does under `FZ_LOCK_ALLOC`.
    fn critical_section(&self) {
        let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_inside.fetch_max(now, Ordering::SeqCst);
        std::thread::yield_now();
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A native engine that reads files itself and locks the way MuPDF does.
#[derive(Clone, Default)]
pub struct FakeEngine {
    pub stats: Arc<FakeStats>,
}

struct FakeContext {
    locks: *const fz_locks_context,
}

impl FakeContext {
    fn with_lock<T>(&self, lock: c_int, f: impl FnOnce() -> T) -> T {
        // SAFETY: the table outlives the context.
        match unsafe { self.locks.as_ref() } {
            Some(table) => {
                unsafe { (table.lock)(table.user, lock) };
                let out = f();
                unsafe { (table.unlock)(table.user, lock) };
                out
            }
            None => f(),
        }
    }
}

struct FakeDocument {
    fails_on_drop: bool,
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

impl NativeEngine for FakeEngine {
    unsafe fn new_context(
        &self,
        _alloc: *const fz_alloc_context,
        locks: *const fz_locks_context,
        _max_store: usize,
    ) -> *mut fz_context {
        self.stats.contexts.fetch_add(1, Ordering::SeqCst);
        Box::into_raw(Box::new(FakeContext { locks })).cast()
    }

    unsafe fn drop_context(&self, ctx: *mut fz_context) {
        drop(unsafe { Box::from_raw(ctx.cast::<FakeContext>()) });
        self.stats.contexts.fetch_sub(1, Ordering::SeqCst);
    }

    unsafe fn open_document(
        &self,
        ctx: *mut fz_context,
        filename: &CStr,
    ) -> Result<NonNull<fz_document>> {
        let fake = unsafe { &*ctx.cast::<FakeContext>() };
        let path = PathBuf::from(filename.to_string_lossy().into_owned());
        let data = fs::read(&path)
            .map_err(|e| Error::native(format!("cannot open file '{}': {e}", path.display())))?;
        if data.starts_with(UNWINDS) {
            panic!("exception unwound through the engine");
        }
        if !data.starts_with(b"%PDF-") {
            return Err(Error::native("no objects found"));
        }
        fake.with_lock(FZ_LOCK_ALLOC, || self.stats.critical_section());
        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        let doc = Box::new(FakeDocument {
            fails_on_drop: contains(&data, b"%%DROP-FAIL"),
        });
        Ok(NonNull::from(Box::leak(doc)).cast())
    }

    unsafe fn drop_document(&self, ctx: *mut fz_context, doc: NonNull<fz_document>) -> Result<()> {
        let fake = unsafe { &*ctx.cast::<FakeContext>() };
        let doc = unsafe { Box::from_raw(doc.as_ptr().cast::<FakeDocument>()) };
        fake.with_lock(FZ_LOCK_ALLOC, || self.stats.critical_section());
        self.stats.dropped.fetch_add(1, Ordering::SeqCst);
        if doc.fails_on_drop {
            return Err(Error::native("cannot drop a document still in use"));
        }
        Ok(())
    }
}

/// Write `body` to `name` inside `dir`.
pub fn fixture(dir: &Path, name: &str, body: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

/// In-memory stderr.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Run `f` with diagnostics going to a buffer instead of stderr.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Captured) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, captured)
}
