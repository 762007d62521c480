use std::time::Duration;

use crate::engine::{ClockEngine, DisplayState, Tick};
use crate::ticker::{TickReceiver, Ticker};
use crate::time::{MonotonicClock, TimeSource};
use crate::types::{ClockConfig, Player};

/// An external event driving the clock.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
    StartGame(ClockConfig),
    Tap(Player),
    BeginTurn(Player),
    SwitchTurn,
    Pause,
    Resume,
    TogglePause,
    Reset,
}

/// A clock engine together with the tick source that refreshes it.
///
/// The ticker is cancelled on every accepted event and re-armed only if the
/// engine is left running, so at most one tick source is ever live and it
/// always belongs to the current countdown segment.
pub struct Session<T = MonotonicClock> {
    engine: ClockEngine<T>,
    ticker: Ticker,
}

impl Session {
    pub fn new(tick_interval: Duration) -> Self {
        Self::with_engine(ClockEngine::new(), Ticker::new(tick_interval))
    }
}

impl<T: TimeSource> Session<T> {
    pub fn with_engine(engine: ClockEngine<T>, ticker: Ticker) -> Self {
        Self { engine, ticker }
    }

    /// Feeds an event to the engine. Returns whether the engine accepted it.
    pub fn apply(&mut self, event: Event) -> bool {
        let accepted = match event {
            Event::StartGame(config) => {
                self.engine.start_game(config);
                true
            }
            Event::Tap(area) => self.engine.tap(area),
            Event::BeginTurn(player) => self.engine.begin_turn(player),
            Event::SwitchTurn => self.engine.switch_turn(),
            Event::Pause => self.engine.pause(),
            Event::Resume => self.engine.resume(),
            Event::TogglePause => self.engine.toggle_pause(),
            Event::Reset => {
                self.engine.reset();
                true
            }
        };

        if accepted {
            self.reschedule();
        }
        accepted
    }

    /// Handles one tick from [`Session::ticks`].
    pub fn on_tick(&mut self) -> Tick {
        let tick = self.engine.tick();
        if !matches!(tick, Tick::Counting(_)) {
            self.ticker.cancel();
        }
        tick
    }

    /// The live tick channel, for use in `select!`.
    pub fn ticks(&self) -> &TickReceiver {
        self.ticker.ticks()
    }

    pub fn display_state(&self) -> DisplayState {
        self.engine.display_state()
    }

    pub fn engine(&self) -> &ClockEngine<T> {
        &self.engine
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    fn reschedule(&mut self) {
        self.ticker.cancel();
        if self.engine.is_running() {
            self.ticker.arm();
        }
    }
}
