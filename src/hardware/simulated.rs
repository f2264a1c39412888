// src/hardware/simulated.rs - Log-only output line for hosts without GPIO
use super::{LineError, OutputLine};

/// Dry-run output. Edges go to the log at debug level.
#[derive(Debug, Default)]
pub struct SimulatedLine {
    pin: u8,
    initialized: bool,
    asserted: bool,
    pulses: u64,
}

impl SimulatedLine {
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            ..Default::default()
        }
    }

    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Rising edges seen since construction.
    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    fn set(&mut self, on: bool) -> Result<(), LineError> {
        if !self.initialized {
            return Err(LineError::NotInitialized(self.pin));
        }
        if on && !self.asserted {
            self.pulses += 1;
        }
        self.asserted = on;
        tracing::debug!("[sim] GPIO {} {}", self.pin, if on { "HIGH" } else { "LOW" });
        Ok(())
    }
}

impl OutputLine for SimulatedLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn initialize(&mut self) -> Result<(), LineError> {
        tracing::info!("[sim] GPIO {} configured as output", self.pin);
        self.initialized = true;
        self.set(false)
    }

    fn assert(&mut self) -> Result<(), LineError> {
        self.set(true)
    }

    fn deassert(&mut self) -> Result<(), LineError> {
        self.set(false)
    }

    fn release(&mut self) -> Result<(), LineError> {
        tracing::info!("[sim] GPIO {} released after {} pulses", self.pin, self.pulses);
        self.initialized = false;
        Ok(())
    }
}
