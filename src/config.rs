//! # Beacon Configuration
//!
//! Output pin and timing settings, loaded from TOML. Every field has a
//! default, so an empty file (or no file at all) gives a 100 ms unit on
//! BCM GPIO 17.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [output]
//! backend = "sysfs"
//! pin = 17
//! active_low = false
//!
//! [timing]
//! wpm = 15
//! ```
//!
//! `unit_ms` and `wpm` are alternative ways to set the speed; set at most one.

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::hardware::sysfs::DEFAULT_SYSFS_ROOT;
use crate::timing::{TimingError, TimingProfile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid timing: {0}")]
    Timing(#[from] TimingError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Which driver toggles the pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Linux `/sys/class/gpio`
    Sysfs,
    /// Raspberry Pi GPIO via rppal (needs the `rpi` feature)
    Rppal,
    /// No hardware; edges are only logged
    Simulated,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,
    #[serde(default = "default_pin")]
    pub pin: u8,
    #[serde(default)]
    pub active_low: bool,
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            pin: default_pin(),
            active_low: false,
            sysfs_root: default_sysfs_root(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    #[serde(default)]
    pub unit_ms: Option<u64>,
    #[serde(default)]
    pub wpm: Option<u32>,
}

impl TimingConfig {
    /// Resolve to a profile. Falls back to the 100 ms default when neither
    /// speed setting is present.
    pub fn profile(&self) -> Result<TimingProfile, ConfigError> {
        match (self.unit_ms, self.wpm) {
            (Some(_), Some(_)) => Err(ConfigError::Invalid(
                "set either timing.unit_ms or timing.wpm, not both".to_string(),
            )),
            (Some(ms), None) => Ok(TimingProfile::from_millis(ms)?),
            (None, Some(wpm)) => Ok(TimingProfile::from_wpm(wpm)?),
            (None, None) => Ok(TimingProfile::default()),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.profile()?;
        if self.output.backend == Backend::Sysfs && self.output.sysfs_root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output.sysfs_root must not be empty".to_string()));
        }
        Ok(())
    }
}

// Default value functions
fn default_backend() -> Backend {
    if cfg!(feature = "rpi") { Backend::Rppal } else { Backend::Sysfs }
}
fn default_pin() -> u8 { 17 }
fn default_sysfs_root() -> PathBuf { PathBuf::from(DEFAULT_SYSFS_ROOT) }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let config: Config = match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to parse config TOML: {}", e);
            return Err(ConfigError::Toml(e));
        }
    };
    config.validate()?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
