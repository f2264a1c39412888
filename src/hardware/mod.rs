// src/hardware/mod.rs - Digital output line abstraction and backends
pub mod simulated;
pub mod sysfs;
#[cfg(feature = "rpi")]
pub mod rpi;

use std::path::PathBuf;
use thiserror::Error;

use crate::config::{Backend, OutputConfig};

pub use simulated::SimulatedLine;
pub use sysfs::SysfsLine;
#[cfg(feature = "rpi")]
pub use rpi::RppalLine;

#[derive(Debug, Error)]
pub enum LineError {
    #[error("GPIO {pin}: {action} failed: {source}")]
    Io {
        pin: u8,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("GPIO {0} used before initialize()")]
    NotInitialized(u8),
    #[error("GPIO {pin} did not appear at {} after export", .path.display())]
    ExportTimeout { pin: u8, path: PathBuf },
    #[error("GPIO backend '{0}' is not available in this build")]
    BackendUnavailable(&'static str),
    #[cfg(feature = "rpi")]
    #[error("GPIO error: {0}")]
    Rppal(#[from] rppal::gpio::Error),
}

/// A single digital output driving the LED.
///
/// Lifecycle: `initialize`, then any number of `assert`/`deassert`, then
/// `release`. Pin numbering and electrical configuration belong to the
/// implementation.
pub trait OutputLine: Send {
    fn pin(&self) -> u8;
    fn initialize(&mut self) -> Result<(), LineError>;
    fn assert(&mut self) -> Result<(), LineError>;
    fn deassert(&mut self) -> Result<(), LineError>;
    fn release(&mut self) -> Result<(), LineError>;
}

impl<L: OutputLine + ?Sized> OutputLine for Box<L> {
    fn pin(&self) -> u8 {
        (**self).pin()
    }

    fn initialize(&mut self) -> Result<(), LineError> {
        (**self).initialize()
    }

    fn assert(&mut self) -> Result<(), LineError> {
        (**self).assert()
    }

    fn deassert(&mut self) -> Result<(), LineError> {
        (**self).deassert()
    }

    fn release(&mut self) -> Result<(), LineError> {
        (**self).release()
    }
}

/// Build the configured backend. The line is not initialized yet.
pub fn open_line(config: &OutputConfig) -> Result<Box<dyn OutputLine>, LineError> {
    tracing::debug!("Opening {:?} output on GPIO {}", config.backend, config.pin);
    match config.backend {
        Backend::Sysfs => Ok(Box::new(
            SysfsLine::new(config.pin, &config.sysfs_root).with_active_low(config.active_low),
        )),
        Backend::Simulated => Ok(Box::new(SimulatedLine::new(config.pin))),
        #[cfg(feature = "rpi")]
        Backend::Rppal => Ok(Box::new(RppalLine::new(config.pin, config.active_low))),
        #[cfg(not(feature = "rpi"))]
        Backend::Rppal => Err(LineError::BackendUnavailable("rppal")),
    }
}
