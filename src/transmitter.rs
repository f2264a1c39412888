// src/transmitter.rs - Timed pulse train generation
//
// Gap accounting: every symbol ends with a symbol gap, every letter adds
// `letter_gap - symbol_gap` on top, and a space adds `word_gap - letter_gap`
// on top of that. Consecutive letters are therefore separated by exactly
// `letter_gap` and words by exactly `word_gap`.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::encoder::{encode, Encoding, MorseCode, Symbol};
use crate::hardware::{LineError, OutputLine};
use crate::request::{ArgumentError, TransmissionRequest};
use crate::timing::TimingProfile;

/// Longest uninterrupted sleep inside a hold.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error("Transmission interrupted")]
    Interrupted,
    #[error("Output line error: {0}")]
    Line(#[from] LineError),
}

/// Cooperative cancellation flag shared with a signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress notifications, delivered before the corresponding pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitEvent {
    Character { character: char, code: MorseCode },
    WordBoundary,
    PassComplete { pass: u64, total: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Acquiring,
    Transmitting,
    Releasing,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub passes: u64,
    pub pulses: u64,
    pub elapsed: Duration,
}

type Listener = Box<dyn FnMut(TransmitEvent) + Send>;

/// Drives one output line. Blocks the calling thread for the whole
/// transmission; exactly one transmitter may own a line.
pub struct Transmitter<L: OutputLine, C: Clock = SystemClock> {
    line: L,
    clock: C,
    timing: TimingProfile,
    cancel: CancelToken,
    listener: Option<Listener>,
    schedule: Option<Duration>,
    state: RunState,
    pulses: u64,
}

impl<L: OutputLine> Transmitter<L, SystemClock> {
    pub fn new(line: L, timing: TimingProfile) -> Self {
        Self::with_clock(line, timing, SystemClock::new())
    }
}

impl<L: OutputLine, C: Clock> Transmitter<L, C> {
    pub fn with_clock(line: L, timing: TimingProfile, clock: C) -> Self {
        Self {
            line,
            clock,
            timing,
            cancel: CancelToken::new(),
            listener: None,
            schedule: None,
            state: RunState::Idle,
            pulses: 0,
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_listener(mut self, listener: impl FnMut(TransmitEvent) + Send + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    /// Pulses emitted over the transmitter's lifetime.
    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    fn notify(&mut self, event: TransmitEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }

    fn check_cancelled(&self) -> Result<(), TransmitError> {
        if self.cancel.is_cancelled() {
            return Err(TransmitError::Interrupted);
        }
        Ok(())
    }

    fn set_state(&mut self, state: RunState) {
        tracing::trace!("Transmitter {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Stay in the current line state for `duration`.
    ///
    /// Deadlines follow a running schedule so driver latency is absorbed
    /// instead of accumulated. A schedule more than one unit behind the clock
    /// is re-anchored at the present. Pulses re-anchor on every late rise in
    /// `emit_symbol`.
    fn hold(&mut self, duration: Duration) -> Result<(), TransmitError> {
        let now = self.clock.now();
        let start = match self.schedule {
            Some(scheduled) if now <= scheduled + self.timing.unit() => scheduled,
            Some(scheduled) => {
                tracing::warn!("Fell {:?} behind schedule, re-anchoring", now - scheduled);
                now
            }
            None => now,
        };
        let deadline = start + duration;
        self.schedule = Some(deadline);

        loop {
            self.check_cancelled()?;
            let now = self.clock.now();
            if now >= deadline {
                return Ok(());
            }
            self.clock.sleep_until(deadline.min(now + CANCEL_POLL_INTERVAL));
        }
    }

    fn emit_symbol(&mut self, symbol: Symbol) -> Result<(), TransmitError> {
        self.check_cancelled()?;
        self.line.assert()?;
        self.pulses += 1;
        // The high period is timed from when the line actually rose. Lateness
        // is left in the preceding gap.
        let now = self.clock.now();
        if let Some(scheduled) = self.schedule {
            if scheduled < now {
                if now - scheduled > self.timing.unit() {
                    tracing::warn!("Assert landed {:?} late, re-anchoring", now - scheduled);
                }
                self.schedule = Some(now);
            }
        }
        self.hold(self.timing.pulse(symbol))?;
        self.line.deassert()?;
        self.hold(self.timing.symbol_gap())
    }

    pub fn emit_dot(&mut self) -> Result<(), TransmitError> {
        self.emit_symbol(Symbol::Dot)
    }

    pub fn emit_dash(&mut self) -> Result<(), TransmitError> {
        self.emit_symbol(Symbol::Dash)
    }

    pub fn emit_character(&mut self, character: char) -> Result<(), TransmitError> {
        match encode(character) {
            Encoding::WordBoundary => {
                self.notify(TransmitEvent::WordBoundary);
                self.hold(self.timing.word_tail())
            }
            Encoding::Unsupported => {
                tracing::trace!("Skipping unsupported character {:?}", character);
                Ok(())
            }
            Encoding::Code(code) => {
                tracing::debug!("{:?} -> {}", character, code);
                self.notify(TransmitEvent::Character { character, code });
                for &symbol in code.symbols() {
                    match symbol {
                        Symbol::Dot => self.emit_dot()?,
                        Symbol::Dash => self.emit_dash()?,
                    }
                }
                self.hold(self.timing.letter_tail())
            }
        }
    }

    pub fn emit_message(&mut self, message: &str) -> Result<(), TransmitError> {
        for character in message.chars() {
            self.emit_character(character)?;
        }
        Ok(())
    }

    /// Validate, acquire the line, send the message `repetitions` times and
    /// release the line again, whatever happens in between.
    pub fn run(&mut self, request: &TransmissionRequest) -> Result<RunReport, TransmitError> {
        request.validate()?;
        let total = request.passes();
        tracing::info!(
            "Transmitting {:?} x{} on GPIO {} ({:?} per pass)",
            request.message,
            total,
            self.line.pin(),
            self.timing.message_duration(&request.message)
        );

        let started = self.clock.now();
        let pulses_before = self.pulses;

        self.set_state(RunState::Acquiring);
        let outcome = self.transmit(request, total);
        let released = self.shutdown_line();
        self.set_state(RunState::Idle);

        let passes = outcome?;
        released?;
        let report = RunReport {
            passes,
            pulses: self.pulses - pulses_before,
            elapsed: self.clock.now() - started,
        };
        tracing::info!("Transmission complete: {:?}", report);
        Ok(report)
    }

    fn transmit(&mut self, request: &TransmissionRequest, total: u64) -> Result<u64, TransmitError> {
        self.line.initialize()?;
        self.set_state(RunState::Transmitting);
        self.schedule = None;
        for pass in 1..=total {
            self.emit_message(&request.message)?;
            self.notify(TransmitEvent::PassComplete { pass, total });
        }
        Ok(total)
    }

    /// Leave the line deasserted and hand it back to the driver. Both steps
    /// are attempted even if the first fails; the first error wins.
    fn shutdown_line(&mut self) -> Result<(), LineError> {
        self.set_state(RunState::Releasing);
        self.schedule = None;
        let deasserted = self.line.deassert();
        if let Err(e) = &deasserted {
            tracing::warn!("Failed to deassert GPIO {}: {}", self.line.pin(), e);
        }
        let released = self.line.release();
        if let Err(e) = &released {
            tracing::warn!("Failed to release GPIO {}: {}", self.line.pin(), e);
        }
        deasserted.and(released)
    }
}

impl<L: OutputLine, C: Clock> Drop for Transmitter<L, C> {
    fn drop(&mut self) {
        // A panic mid-run skips the normal release path.
        if matches!(self.state, RunState::Acquiring | RunState::Transmitting) {
            let _ = self.shutdown_line();
        }
    }
}
