//! Lock registry - the `fz_locks_context` MuPDF locks its caches through
//!
//! MuPDF calls `lock(user, n)` / `unlock(user, n)` from whatever thread it
//! happens to be running on, so both the callback table and the mutexes it
//! points at live on the native heap at fixed addresses until the registry
//! is dropped.

use super::error::{Error, Result};
use super::sys::{FZ_LOCK_MAX, fz_locks_context};
use crate::ffi::locks::{lock_mutex, unlock_mutex};
use parking_lot::RawMutex;
use parking_lot::lock_api::RawMutex as _;
use std::ffi::c_int;
use std::mem;
use std::ptr::NonNull;
use tracing::{debug, warn};

/// The mutexes behind a callback table's `user` pointer.
///
/// Unlike a bare `pthread_mutex_t *`, the bank knows its own length, so a
/// stray index from the native side is reported instead of trampling memory.
pub struct LockBank {
    mutexes: Box<[RawMutex]>,
}

impl LockBank {
    fn with_len(len: usize) -> Result<Self> {
        let mut mutexes = Vec::new();
        mutexes
            .try_reserve_exact(len)
            .map_err(|_| Error::LockAlloc(len))?;
        mutexes.extend((0..len).map(|_| RawMutex::INIT));
        Ok(Self {
            mutexes: mutexes.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.mutexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutexes.is_empty()
    }

    fn slot(&self, index: c_int) -> Result<&RawMutex> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.mutexes.get(i))
            .ok_or(Error::LockIndex {
                index,
                len: self.mutexes.len(),
            })
    }

    /// Block until lock `index` is acquired.
    pub fn lock(&self, index: c_int) -> Result<()> {
        self.slot(index)?.lock();
        Ok(())
    }

    /// Acquire lock `index` if it is free.
    pub fn try_lock(&self, index: c_int) -> Result<bool> {
        Ok(self.slot(index)?.try_lock())
    }

    /// Release lock `index`.
    ///
    /// Releasing a lock nobody holds is refused rather than performed.
    pub fn unlock(&self, index: c_int) -> Result<()> {
        let mutex = self.slot(index)?;
        if !mutex.is_locked() {
            return Err(Error::LockNotHeld(index.unsigned_abs() as usize));
        }
        // SAFETY: the mutex is held, and MuPDF releases a lock on the thread
        // that acquired it.
        unsafe { mutex.unlock() };
        Ok(())
    }

    pub fn is_locked(&self, index: c_int) -> Result<bool> {
        Ok(self.slot(index)?.is_locked())
    }
}

/// Owner of a callback table and its mutex bank.
///
/// Pass [`LockRegistry::as_locks_context`] to the context constructor. The
/// registry must outlive every context built with it; [`crate::Context`]
/// guarantees that by holding an `Arc<LockRegistry>`.
pub struct LockRegistry {
    table: NonNull<fz_locks_context>,
    bank: NonNull<LockBank>,
}

// SAFETY: the table is never written after construction and the bank only
// holds raw mutexes, which are designed to be shared between threads.
unsafe impl Send for LockRegistry {}
unsafe impl Sync for LockRegistry {}

impl LockRegistry {
    /// Build a registry with one mutex per MuPDF lock domain.
    pub fn new() -> Result<Self> {
        Self::with_len(FZ_LOCK_MAX)
    }

    /// Build a registry with `len` mutexes.
    ///
    /// `len` must match the linked library's `FZ_LOCK_MAX`.
    pub fn with_len(len: usize) -> Result<Self> {
        let bank = NonNull::from(Box::leak(Box::new(LockBank::with_len(len)?)));
        let table = NonNull::from(Box::leak(Box::new(fz_locks_context {
            user: bank.as_ptr().cast(),
            lock: lock_mutex,
            unlock: unlock_mutex,
        })));
        debug!(locks = len, "lock registry created");
        Ok(Self { table, bank })
    }

    /// The callback table, for `fz_new_context`.
    pub fn as_locks_context(&self) -> *const fz_locks_context {
        self.table.as_ptr()
    }

    pub fn bank(&self) -> &LockBank {
        // SAFETY: the bank lives until `drop`.
        unsafe { self.bank.as_ref() }
    }

    pub fn len(&self) -> usize {
        self.bank().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bank().is_empty()
    }

    pub fn lock(&self, index: c_int) -> Result<()> {
        self.bank().lock(index)
    }

    pub fn try_lock(&self, index: c_int) -> Result<bool> {
        self.bank().try_lock(index)
    }

    pub fn unlock(&self, index: c_int) -> Result<()> {
        self.bank().unlock(index)
    }

    pub fn is_locked(&self, index: c_int) -> Result<bool> {
        self.bank().is_locked(index)
    }

    /// Hand ownership to a C caller.
    pub fn into_raw(self) -> *mut fz_locks_context {
        let table = self.table.as_ptr();
        mem::forget(self);
        table
    }

    /// Take back a table produced by [`LockRegistry::into_raw`].
    ///
    /// # Safety
    /// `locks` must be null or come from `into_raw`, and must not be used
    /// again afterwards.
    pub unsafe fn from_raw(locks: *mut fz_locks_context) -> Option<Self> {
        let table = NonNull::new(locks)?;
        // SAFETY: caller guarantees the table came from `into_raw`.
        let bank = NonNull::new(unsafe { table.as_ref() }.user.cast::<LockBank>())?;
        Some(Self { table, bank })
    }
}

impl Drop for LockRegistry {
    fn drop(&mut self) {
        for (index, mutex) in self.bank().mutexes.iter().enumerate() {
            if mutex.is_locked() {
                warn!(lock = index, "lock registry released while lock is held");
            }
        }
        // SAFETY: both pointers were leaked from boxes in `with_len` and are
        // reclaimed only here.
        unsafe {
            drop(Box::from_raw(self.bank.as_ptr()));
            drop(Box::from_raw(self.table.as_ptr()));
        }
        debug!("lock registry released");
    }
}
