//! Execution contexts
//!
//! A context is the handle every native call takes. When it was built with
//! a lock registry, MuPDF may call back into that registry from any thread
//! until the context is dropped, so [`Context`] holds the registry by `Arc`
//! and releases it only after `fz_drop_context` has returned.

use super::document::Document;
use super::engine::NativeEngine;
use super::error::{Error, Result};
use super::locks::LockRegistry;
use super::protect::protected;
use super::sys::{fz_alloc_context, fz_context, fz_locks_context};
use crate::config::Config;
use std::path::Path;
use std::ptr::{self, NonNull};
use std::sync::Arc;
use tracing::{debug, error};

/// Context constructor forwarder.
///
/// No validation and no error path of its own; whatever the engine returns,
/// null included, goes straight back.
///
/// # Safety
/// `alloc` and `locks` must be null or outlive the returned context.
pub unsafe fn new_context<E: NativeEngine>(
    engine: &E,
    alloc: *const fz_alloc_context,
    locks: *const fz_locks_context,
    max_store: usize,
) -> *mut fz_context {
    // SAFETY: forwarded caller contract.
    unsafe { engine.new_context(alloc, locks, max_store) }
}

/// An owned native context.
pub struct Context<E: NativeEngine> {
    raw: NonNull<fz_context>,
    engine: E,
    locks: Option<Arc<LockRegistry>>,
    max_store: usize,
}

impl<E: NativeEngine> Context<E> {
    /// Create a context with the default allocator.
    ///
    /// With `locks`, the context may be cloned onto other threads by the
    /// native side; without, it must stay on one thread.
    pub fn new(engine: E, locks: Option<Arc<LockRegistry>>, max_store: usize) -> Result<Self> {
        let table = locks
            .as_ref()
            .map_or(ptr::null(), |registry| registry.as_locks_context());
        let raw = protected(|| {
            // SAFETY: the table is kept alive by `locks`, which the context
            // owns until after `fz_drop_context`.
            let raw = unsafe { new_context(&engine, ptr::null(), table, max_store) };
            NonNull::new(raw).ok_or(Error::NullContext)
        })?;
        debug!(max_store, locked = locks.is_some(), "context created");
        Ok(Self {
            raw,
            engine,
            locks,
            max_store,
        })
    }

    /// Create a context with its own lock registry and the configured
    /// store budget.
    pub fn with_config(engine: E, config: &Config) -> Result<Self> {
        let registry = Arc::new(LockRegistry::new()?);
        Self::new(engine, Some(registry), config.max_store)
    }

    pub fn as_ptr(&self) -> *mut fz_context {
        self.raw.as_ptr()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn locks(&self) -> Option<&Arc<LockRegistry>> {
        self.locks.as_ref()
    }

    pub fn max_store(&self) -> usize {
        self.max_store
    }

    /// Open the document at `path`. Failures are logged once.
    pub fn open_document<P: AsRef<Path>>(&self, path: P) -> Result<Document<'_, E>> {
        Document::open(self, path)
    }
}

impl<E: NativeEngine> Drop for Context<E> {
    fn drop(&mut self) {
        let raw = self.raw.as_ptr();
        let engine = &self.engine;
        let dropped = protected(|| {
            // SAFETY: `raw` came from this engine and is dropped exactly once.
            unsafe { engine.drop_context(raw) };
            Ok(())
        });
        if let Err(e) = dropped {
            error!("cannot drop context: {e}");
        }
        debug!("context dropped");
        // `locks` is released after this body returns.
    }
}
