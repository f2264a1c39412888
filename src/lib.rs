//! # morse-beacon
//!
//! Sends a text message as Morse code by blinking a single GPIO line.
//!
//! [`encoder`] maps characters to dot/dash sequences, [`transmitter`] turns
//! them into a timed pulse train on an [`OutputLine`], and [`hardware`]
//! provides the line drivers (Linux sysfs, Raspberry Pi via `rppal`, or a
//! log-only simulation).
//!
//! ```
//! use morse_beacon::{SimulatedLine, TimingProfile, TransmissionRequest, Transmitter, VirtualClock};
//!
//! let timing = TimingProfile::from_millis(60).unwrap();
//! let mut tx = Transmitter::with_clock(SimulatedLine::new(17), timing, VirtualClock::new());
//! let report = tx.run(&TransmissionRequest::new(3, "SOS").unwrap()).unwrap();
//! assert_eq!(report.pulses, 27);
//! ```

pub mod cli;
pub mod clock;
pub mod config;
pub mod encoder;
pub mod hardware;
pub mod request;
pub mod timing;
pub mod transmitter;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use config::{load_config, Backend, Config, ConfigError};
pub use encoder::{encode, Encoding, MorseCode, Symbol};
pub use hardware::{open_line, LineError, OutputLine, SimulatedLine, SysfsLine};
pub use request::{ArgumentError, TransmissionRequest};
pub use timing::{TimingError, TimingProfile};
pub use transmitter::{CancelToken, RunReport, RunState, TransmitError, TransmitEvent, Transmitter};
