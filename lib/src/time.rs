use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A source of monotonic timestamps. All countdown arithmetic is done on
/// differences between two readings, never on absolute time.
pub trait TimeSource {
    fn now(&self) -> Instant;
}

/// Reads `Instant::now()`, which is unaffected by system clock adjustments.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl TimeSource for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same timeline, so
/// a test can keep one handle and give the other to an engine.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use kingly_clock_lib::time::{ManualClock, TimeSource};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// let before = clock.now();
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(clock.now() - before, Duration::from_millis(250));
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves the shared timeline forward by `by`.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        // Saturates instead of wrapping, so time never runs backwards
        let _ = self
            .offset_nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |offset| {
                Some(offset.saturating_add(nanos))
            });
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Total time the clock has been advanced since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::Relaxed))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_saturates_instead_of_wrapping() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_nanos(u64::MAX - 10));
        let before = clock.elapsed();

        clock.advance_ms(1);
        assert_eq!(clock.elapsed(), Duration::from_nanos(u64::MAX));
        assert!(clock.elapsed() >= before);
    }

    #[test]
    fn clones_share_the_timeline() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance_ms(40);
        clock.advance_ms(2);
        assert_eq!(handle.elapsed(), Duration::from_millis(42));
    }
}
