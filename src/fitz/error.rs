//! Error handling for faster-raster

use std::ffi::c_int;
use std::io;
use thiserror::Error;

/// The error type for every fallible shim operation.
///
/// The C surface never returns these; it logs them and hands back a null
/// handle instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Message caught from a native `fz_try` region.
    #[error("{0}")]
    Native(String),
    /// The engine unwound instead of returning.
    #[error("native call panicked: {0}")]
    Panic(String),
    #[error("native context constructor returned null")]
    NullContext,
    #[error("null {0}")]
    NullArgument(&'static str),
    #[error("unable to allocate {0} mutexes")]
    LockAlloc(usize),
    #[error("lock index {index} out of range (registry holds {len})")]
    LockIndex { index: c_int, len: usize },
    #[error("lock {0} is not held")]
    LockNotHeld(usize),
    #[error("invalid document path: {0}")]
    Path(String),
    #[error("System error: {0}")]
    Io(#[from] io::Error),
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn native<S: Into<String>>(msg: S) -> Self {
        Error::Native(msg.into())
    }
    pub fn path<S: Into<String>>(msg: S) -> Self {
        Error::Path(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
