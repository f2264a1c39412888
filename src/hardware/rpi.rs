// src/hardware/rpi.rs - Raspberry Pi GPIO through rppal
use rppal::gpio::{Gpio, OutputPin};

use super::{LineError, OutputLine};

/// BCM-numbered output pin on a Raspberry Pi.
///
/// Dropping the `OutputPin` on release restores the pin's previous mode.
pub struct RppalLine {
    pin: u8,
    active_low: bool,
    output: Option<OutputPin>,
}

impl RppalLine {
    pub fn new(pin: u8, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            output: None,
        }
    }

    fn write_level(&mut self, on: bool) -> Result<(), LineError> {
        let output = self.output.as_mut().ok_or(LineError::NotInitialized(self.pin))?;
        if on != self.active_low {
            output.set_high();
        } else {
            output.set_low();
        }
        Ok(())
    }
}

impl OutputLine for RppalLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn initialize(&mut self) -> Result<(), LineError> {
        let pin = Gpio::new()?.get(self.pin)?;
        let mut output = if self.active_low {
            pin.into_output_high()
        } else {
            pin.into_output_low()
        };
        output.set_reset_on_drop(true);
        self.output = Some(output);
        tracing::info!("GPIO {} configured as output", self.pin);
        Ok(())
    }

    fn assert(&mut self) -> Result<(), LineError> {
        self.write_level(true)
    }

    fn deassert(&mut self) -> Result<(), LineError> {
        self.write_level(false)
    }

    fn release(&mut self) -> Result<(), LineError> {
        if self.output.take().is_some() {
            tracing::debug!("Released GPIO {}", self.pin);
        }
        Ok(())
    }
}
