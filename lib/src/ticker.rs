use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver};

/// How often the display is refreshed while a clock runs.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// The receiving side of a tick source.
pub type TickReceiver = Receiver<Instant>;

/// A single, cancellable periodic tick source.
///
/// Arming replaces the underlying channel, which drops the old one, so a tick
/// from a previous segment can never be delivered after a re-arm or cancel.
/// A disarmed ticker hands out a channel that never fires, which keeps it
/// usable as a `select!` arm.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    ticks: TickReceiver,
    armed: bool,
    generation: u64,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ticks: channel::never(),
            armed: false,
            generation: 0,
        }
    }

    /// Starts a fresh tick source, cancelling any previous one.
    pub fn arm(&mut self) {
        self.ticks = channel::tick(self.interval);
        self.armed = true;
        self.generation += 1;
        log::trace!("Ticker armed (generation {})", self.generation);
    }

    pub fn cancel(&mut self) {
        if self.armed {
            log::trace!("Ticker cancelled (generation {})", self.generation);
        }
        self.ticks = channel::never();
        self.armed = false;
    }

    pub fn ticks(&self) -> &TickReceiver {
        &self.ticks
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of times the ticker has been armed. Each arm is a new source.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}
