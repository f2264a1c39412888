// Shared fixtures: a recording output line on a virtual timeline
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use morse_beacon::{CancelToken, Clock, LineError, OutputLine, VirtualClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    Initialize,
    Assert,
    Deassert,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub at: Duration,
    pub op: LineOp,
}

/// Output line that stamps every operation with the virtual clock time.
///
/// Clones share the log, so a test can keep a handle while the transmitter
/// owns the line.
#[derive(Debug, Clone)]
pub struct RecordingLine {
    pin: u8,
    clock: VirtualClock,
    log: Arc<Mutex<Vec<Edge>>>,
    write_latency: Duration,
    stall: Option<(usize, Duration)>,
    fail_on: Option<(LineOp, usize)>,
}

impl RecordingLine {
    pub fn new(clock: &VirtualClock) -> Self {
        Self {
            pin: 17,
            clock: clock.clone(),
            log: Arc::new(Mutex::new(Vec::new())),
            write_latency: Duration::ZERO,
            stall: None,
            fail_on: None,
        }
    }

    /// Every assert/deassert takes this long before the edge takes effect.
    pub fn with_write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = latency;
        self
    }

    /// The `nth` (1-based) assert blocks for `duration` before taking effect.
    pub fn with_stall_on_assert(mut self, nth: usize, duration: Duration) -> Self {
        self.stall = Some((nth, duration));
        self
    }

    /// The `nth` (1-based) call of `op` fails.
    pub fn failing_on(mut self, op: LineOp, nth: usize) -> Self {
        self.fail_on = Some((op, nth));
        self
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.log.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<LineOp> {
        self.edges().into_iter().map(|e| e.op).collect()
    }

    pub fn count(&self, op: LineOp) -> usize {
        self.edges().iter().filter(|e| e.op == op).count()
    }

    fn record(&mut self, op: LineOp) -> Result<(), LineError> {
        let nth = self.count(op) + 1;
        if self.fail_on == Some((op, nth)) {
            self.log.lock().unwrap().push(Edge { at: self.clock.now(), op });
            return Err(LineError::Io {
                pin: self.pin,
                action: "injected",
                source: std::io::Error::other("injected failure"),
            });
        }
        if matches!(op, LineOp::Assert | LineOp::Deassert) {
            self.clock.advance(self.write_latency);
        }
        if op == LineOp::Assert {
            if let Some((stall_nth, duration)) = self.stall {
                if stall_nth == nth {
                    self.clock.advance(duration);
                }
            }
        }
        self.log.lock().unwrap().push(Edge { at: self.clock.now(), op });
        Ok(())
    }
}

impl OutputLine for RecordingLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn initialize(&mut self) -> Result<(), LineError> {
        self.record(LineOp::Initialize)
    }

    fn assert(&mut self) -> Result<(), LineError> {
        self.record(LineOp::Assert)
    }

    fn deassert(&mut self) -> Result<(), LineError> {
        self.record(LineOp::Deassert)
    }

    fn release(&mut self) -> Result<(), LineError> {
        self.record(LineOp::Release)
    }
}

/// Virtual clock that raises the cancel token once time reaches `at`.
#[derive(Debug, Clone)]
pub struct InterruptingClock {
    pub inner: VirtualClock,
    pub at: Duration,
    pub token: CancelToken,
}

impl Clock for InterruptingClock {
    fn now(&self) -> Duration {
        self.inner.now()
    }

    fn sleep(&self, duration: Duration) {
        self.inner.sleep(duration);
        if self.inner.now() >= self.at {
            self.token.cancel();
        }
    }
}

/// High periods as (rise, fall) pairs. Deasserts of an already low line
/// are ignored.
pub fn pulses(edges: &[Edge]) -> Vec<(Duration, Duration)> {
    let mut out = Vec::new();
    let mut rise = None;
    for edge in edges {
        match edge.op {
            LineOp::Assert if rise.is_none() => rise = Some(edge.at),
            LineOp::Deassert => {
                if let Some(start) = rise.take() {
                    out.push((start, edge.at));
                }
            }
            _ => {}
        }
    }
    out
}

pub fn widths(edges: &[Edge]) -> Vec<Duration> {
    pulses(edges).iter().map(|(rise, fall)| *fall - *rise).collect()
}

/// Silent intervals between consecutive pulses.
pub fn gaps(edges: &[Edge]) -> Vec<Duration> {
    pulses(edges)
        .windows(2)
        .map(|w| w[1].0 - w[0].1)
        .collect()
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
