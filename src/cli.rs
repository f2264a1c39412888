// src/cli.rs - Command line surface
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{load_config, Backend, Config, ConfigError, TimingConfig};
use crate::request::{ArgumentError, TransmissionRequest};

pub const USAGE: &str = "Usage: morse-send <repetitions> <message>";
pub const EXAMPLE: &str = "Example: morse-send 4 \"hello ESP32\"";

/// Blink a message in Morse code on a GPIO pin.
#[derive(Debug, Parser)]
#[command(name = "morse-send", version)]
pub struct Cli {
    /// How many times to send the message
    #[arg(allow_negative_numbers = true)]
    pub repetitions: Option<String>,

    /// Text to send; letters, digits and spaces are keyed, anything else is skipped
    pub message: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output pin (BCM numbering)
    #[arg(long)]
    pub pin: Option<u8>,

    /// Dot length in milliseconds
    #[arg(long, conflicts_with = "wpm")]
    pub unit_ms: Option<u64>,

    /// Speed in words per minute (PARIS)
    #[arg(long)]
    pub wpm: Option<u32>,

    /// Output driver
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// LED is wired between the pin and 3V3
    #[arg(long)]
    pub active_low: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn request(&self) -> Result<TransmissionRequest, ArgumentError> {
        match (&self.repetitions, &self.message) {
            (Some(repetitions), Some(message)) => {
                TransmissionRequest::parse(repetitions, message.as_str())
            }
            _ => Err(ArgumentError::Count),
        }
    }

    /// Configuration file (or defaults) with command line overrides applied.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        if let Some(pin) = self.pin {
            config.output.pin = pin;
        }
        if let Some(backend) = self.backend {
            config.output.backend = backend;
        }
        if self.active_low {
            config.output.active_low = true;
        }
        if self.unit_ms.is_some() || self.wpm.is_some() {
            config.timing = TimingConfig {
                unit_ms: self.unit_ms,
                wpm: self.wpm,
            };
        }
        config.validate()?;
        Ok(config)
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
