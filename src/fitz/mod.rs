//! Safe Rust surface over the native document engine
//!
//! - `sys` - `#[repr(C)]` mirrors of the handful of MuPDF types we touch
//! - `locks` - the mutex bank and the callback table MuPDF locks through
//! - `engine` - the `NativeEngine` seam (MuPDF behind the `mupdf` feature)
//! - `protect` - protected call region turning unwinds into `Result`s
//! - `context` / `document` - owning wrappers with ordered teardown
//! - `cast` - pointer-width narrowing

pub mod cast;
pub mod context;
pub mod document;
pub mod engine;
pub mod error;
pub mod locks;
pub mod protect;
pub mod sys;
