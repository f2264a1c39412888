// src/clock.rs - Monotonic time source for the transmitter
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Time source used for every hold. Times are offsets from the clock's
/// own origin so a virtual clock can stand in for the real one.
pub trait Clock: Send {
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);

    /// Block until `deadline`. Returns immediately if it has already passed.
    fn sleep_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            self.sleep(deadline - now);
        }
    }
}

/// Wall clock backed by `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration)
    }
}

/// Simulated clock. Sleeping advances time instantly.
///
/// Clones share the same timeline, so a recording output line can stamp
/// edges with the same time the transmitter sees.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    current_time: Arc<Mutex<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dt: Duration) {
        let mut t = self.current_time.lock().unwrap_or_else(PoisonError::into_inner);
        *t += dt;
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        *self.current_time.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_shared_timeline() {
        let clock = VirtualClock::new();
        let other = clock.clone();
        clock.sleep(Duration::from_millis(30));
        other.advance(Duration::from_millis(12));
        assert_eq!(clock.now(), Duration::from_millis(42));
    }

    #[test]
    fn test_sleep_until_past_deadline_is_noop() {
        let clock = VirtualClock::new();
        clock.advance(Duration::from_millis(10));
        clock.sleep_until(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(10));
        clock.sleep_until(Duration::from_millis(25));
        assert_eq!(clock.now(), Duration::from_millis(25));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        clock.sleep(Duration::from_millis(2));
        assert!(clock.now() >= a + Duration::from_millis(2));
    }
}
