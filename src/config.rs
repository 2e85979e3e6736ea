//! Shim configuration
//!
//! Read from `$FASTER_RASTER_CONFIG`, or `config.json` in the platform
//! config directory, then overridden by `FASTER_RASTER_MAX_STORE` and
//! `FASTER_RASTER_LOG`. A missing file means defaults; a corrupt one is
//! reported and ignored.

use crate::fitz::error::Result;
use crate::fitz::sys::FZ_STORE_DEFAULT;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_ENV: &str = "FASTER_RASTER_CONFIG";
pub const MAX_STORE_ENV: &str = "FASTER_RASTER_MAX_STORE";
pub const LOG_ENV: &str = "FASTER_RASTER_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resource store budget in bytes handed to `fz_new_context`.
    /// `0` is `FZ_STORE_UNLIMITED`.
    pub max_store: usize,
    /// `tracing_subscriber::EnvFilter` directive for stderr diagnostics.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_store: FZ_STORE_DEFAULT,
            log_filter: "warn".to_string(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("faster-raster")
}

impl Config {
    /// Parse a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// The config file in effect: `$FASTER_RASTER_CONFIG` or the default.
    pub fn path() -> PathBuf {
        env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| config_dir().join("config.json"))
    }

    /// File settings (if any) with environment overrides applied.
    pub fn from_env() -> Self {
        let path = Self::path();
        let mut config = if path.exists() {
            Self::load(&path).unwrap_or_else(|e| {
                warn!("Corrupted {}, using defaults: {e}", path.display());
                Self::default()
            })
        } else {
            Self::default()
        };
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(value) = env::var(MAX_STORE_ENV) {
            match value.trim().parse() {
                Ok(max_store) => self.max_store = max_store,
                Err(e) => warn!("ignoring {MAX_STORE_ENV}={value}: {e}"),
            }
        }
        if let Ok(filter) = env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                self.log_filter = filter;
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
