// FFI shims are full of raw pointers handed over by C callers.
#![allow(clippy::not_unsafe_ptr_arg_deref)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::module_name_repetitions)]

//! faster-raster - an adaptation shim between a host program and MuPDF
//!
//! MuPDF reports failures by `longjmp`ing out of `fz_try` regions and wants
//! its callers to hand it a table of lock callbacks backed by real mutexes.
//! Neither is something a foreign caller can provide safely from its own
//! stack or heap, so this crate does it on the native side.
//!
//! # Modules
//!
//! - `fitz` - Safe Rust surface: lock registry, contexts, documents, the
//!   protected call region and the `NativeEngine` seam
//! - `ffi` - C ABI exports with the host-facing symbol names
//!   (`new_locks`, `lock_mutex`, `cgo_open_document`, ...)
//! - `config` - Store budget and log filter, from JSON and the environment
//! - `log` - stderr diagnostics via `tracing`
//!
//! # Features
//!
//! - `mupdf` - link a system MuPDF and export the context/document
//!   adaptors. Without it the lock registry and the pointer cast are still
//!   exported, and the document adaptors can be driven from Rust through
//!   any [`fitz::engine::NativeEngine`].

pub mod config;
pub mod ffi;
pub mod fitz;
pub mod log;

pub use config::Config;
pub use fitz::context::Context;
pub use fitz::document::Document;
pub use fitz::engine::NativeEngine;
pub use fitz::error::{Error, Result};
pub use fitz::locks::LockRegistry;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
