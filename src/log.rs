//! stderr diagnostics
//!
//! Every failure the shim swallows is reported as one line on stderr. Rust
//! hosts that install their own `tracing` subscriber keep it; C hosts get
//! this one the first time they touch an export.

use crate::config::Config;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a plain, single-line stderr subscriber filtered by `filter`.
///
/// Returns `false` if a global subscriber was already set.
pub fn init(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init()
        .is_ok()
}

/// [`init`] from [`Config::from_env`], at most once per process.
pub fn ensure_init() {
    INIT.call_once(|| {
        init(&Config::from_env().log_filter);
    });
}
