// src/timing.rs - Unit-derived Morse timing
use std::time::Duration;
use thiserror::Error;

use crate::encoder::{encode, Encoding, Symbol};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimingError {
    #[error("Timing unit must be greater than zero")]
    ZeroUnit,
    #[error("Words per minute must be greater than zero")]
    ZeroWpm,
}

/// Milliseconds per unit at 1 WPM with the PARIS reference word (50 units).
const PARIS_UNIT_MS_AT_1_WPM: u64 = 1200;

/// All Morse durations, derived from a single dot length.
///
/// Only the unit is stored so the standard ratios (dash = 3 dots, letter gap
/// = 3 units, word gap = 7 units) cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    unit: Duration,
}

impl TimingProfile {
    pub fn new(unit: Duration) -> Result<Self, TimingError> {
        if unit.is_zero() {
            return Err(TimingError::ZeroUnit);
        }
        Ok(Self { unit })
    }

    pub fn from_millis(unit_ms: u64) -> Result<Self, TimingError> {
        Self::new(Duration::from_millis(unit_ms))
    }

    /// Unit length for a words-per-minute speed, PARIS standard.
    pub fn from_wpm(wpm: u32) -> Result<Self, TimingError> {
        if wpm == 0 {
            return Err(TimingError::ZeroWpm);
        }
        Self::new(Duration::from_micros(PARIS_UNIT_MS_AT_1_WPM * 1000 / wpm as u64))
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    pub fn dot(&self) -> Duration {
        self.unit
    }

    pub fn dash(&self) -> Duration {
        self.unit * 3
    }

    pub fn symbol_gap(&self) -> Duration {
        self.unit
    }

    pub fn letter_gap(&self) -> Duration {
        self.unit * 3
    }

    pub fn word_gap(&self) -> Duration {
        self.unit * 7
    }

    /// Pulse-high time for a symbol.
    pub fn pulse(&self, symbol: Symbol) -> Duration {
        match symbol {
            Symbol::Dot => self.dot(),
            Symbol::Dash => self.dash(),
        }
    }

    /// Silence after the last symbol of a letter, on top of its symbol gap.
    pub fn letter_tail(&self) -> Duration {
        self.letter_gap() - self.symbol_gap()
    }

    /// Silence for a word separator, on top of the preceding letter gap.
    pub fn word_tail(&self) -> Duration {
        self.word_gap() - self.letter_gap()
    }

    /// Wall time of one transmission pass over `message`.
    pub fn message_duration(&self, message: &str) -> Duration {
        message
            .chars()
            .map(|c| match encode(c) {
                Encoding::Code(code) => {
                    let pulses: Duration = code
                        .symbols()
                        .iter()
                        .map(|&s| self.pulse(s) + self.symbol_gap())
                        .sum();
                    pulses + self.letter_tail()
                }
                Encoding::WordBoundary => self.word_tail(),
                Encoding::Unsupported => Duration::ZERO,
            })
            .sum()
    }

    /// Approximate speed in words per minute.
    pub fn wpm(&self) -> f64 {
        PARIS_UNIT_MS_AT_1_WPM as f64 / (self.unit.as_secs_f64() * 1000.0)
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self { unit: Duration::from_millis(100) }
    }
}
