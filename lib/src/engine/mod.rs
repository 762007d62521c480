use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::time::{MonotonicClock, TimeSource};
use crate::types::{ClockConfig, Player};


/// The state of the countdown.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// No player has moved yet, or the game was reset.
    Idle,
    Running(Player),
    Paused(Player),
    /// The player ran out of time. Only `reset` or `start_game` leave this.
    Expired(Player),
}

impl Phase {
    /// Returns the player whose clock is (or was last) counting down.
    pub fn active_player(self) -> Option<Player> {
        match self {
            Phase::Idle => None,
            Phase::Running(p) | Phase::Paused(p) | Phase::Expired(p) => Some(p),
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Phase::Running(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Running(p) => write!(f, "running {p}"),
            Phase::Paused(p) => write!(f, "paused {p}"),
            Phase::Expired(p) => write!(f, "expired {p}"),
        }
    }
}

/// Read-only snapshot for the presentation layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayState {
    pub remaining: [Duration; 2],
    pub active: Option<Player>,
    pub running: bool,
    pub expired: Option<Player>,
}

impl DisplayState {
    #[inline]
    pub fn remaining(&self, player: Player) -> Duration {
        self.remaining[player.index()]
    }

    /// The phase this snapshot was taken in.
    pub fn phase(&self) -> Phase {
        match (self.expired, self.active, self.running) {
            (Some(p), _, _) => Phase::Expired(p),
            (None, Some(p), true) => Phase::Running(p),
            (None, Some(p), false) => Phase::Paused(p),
            (None, None, _) => Phase::Idle,
        }
    }
}

/// The result of a single tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tick {
    /// No countdown is running, nothing was recomputed.
    Stopped,
    /// The active player's remaining time after recomputation.
    Counting(Duration),
    /// The active player's clock reached zero on this tick.
    Expired(Player),
}

/// The two-player clock state machine.
///
/// Every state changing method returns whether the event was accepted.
/// Events that make no sense in the current phase (tapping a waiting
/// player's clock, pausing twice, ..) are ignored rather than reported.
///
/// # Example
/// ```
/// use kingly_clock_lib::engine::{ClockEngine, Phase};
/// use kingly_clock_lib::time::ManualClock;
/// use kingly_clock_lib::types::{ClockConfig, IncrementPolicy, Player};
///
/// let clock = ManualClock::new();
/// let mut engine = ClockEngine::with_time_source(clock.clone());
/// engine.start_game(ClockConfig::new(10_000, 0, IncrementPolicy::Fischer));
///
/// assert!(engine.begin_turn(Player::First));
/// clock.advance_ms(3_000);
/// assert!(engine.switch_turn());
///
/// assert_eq!(engine.phase(), Phase::Running(Player::Second));
/// assert_eq!(engine.remaining(Player::First).as_millis(), 7_000);
/// ```
#[derive(Debug)]
pub struct ClockEngine<T = MonotonicClock> {
    time: T,
    config: Option<ClockConfig>,
    phase: Phase,
    remaining: [Duration; 2],
    /// Remaining time of the active player when the current segment began.
    turn_start_remaining: Duration,
    /// When the current segment began. `Some` exactly when running.
    turn_start: Option<Instant>,
}

impl ClockEngine {
    pub fn new() -> Self {
        Self::with_time_source(MonotonicClock)
    }
}

impl Default for ClockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> ClockEngine<T> {
    pub fn with_time_source(time: T) -> Self {
        Self {
            time,
            config: None,
            phase: Phase::Idle,
            remaining: [Duration::ZERO; 2],
            turn_start_remaining: Duration::ZERO,
            turn_start: None,
        }
    }

    /// Sets up a new game. Both players get the initial time and nobody's
    /// clock runs until the first tap.
    pub fn start_game(&mut self, config: ClockConfig) {
        info!(
            "Starting game: {:?} + {:?} ({})",
            config.initial, config.increment, config.policy
        );
        self.config = Some(config);
        self.phase = Phase::Idle;
        self.remaining = [config.initial; 2];
        self.turn_start_remaining = Duration::ZERO;
        self.turn_start = None;
    }

    /// Starts the very first countdown of the game.
    pub fn begin_turn(&mut self, player: Player) -> bool {
        if self.config.is_none() || self.phase != Phase::Idle {
            debug!("Ignoring begin turn for {player} in {:?}", self.phase);
            return false;
        }

        let now = self.time.now();
        self.start_segment(player, now);
        debug!("Player {player} starts with {:?}", self.turn_start_remaining);
        true
    }

    /// Ends the active player's turn, credits the increment and starts the
    /// opponent's countdown. Only accepted while running.
    pub fn switch_turn(&mut self) -> bool {
        let (Phase::Running(player), Some(config)) = (self.phase, self.config) else {
            debug!("Ignoring switch in {:?}", self.phase);
            return false;
        };

        // One reading, so no time falls between the two segments
        let now = self.time.now();
        let left = self.remaining_at(now);
        let credited = config
            .policy
            .apply(left, config.increment, self.turn_start_remaining);
        self.remaining[player.index()] = credited;
        debug!("Player {player} moved with {left:?} left, credited to {credited:?}");

        self.start_segment(!player, now);
        true
    }

    /// Freezes the active player's clock. Ignored unless running, so pausing
    /// twice is the same as pausing once.
    pub fn pause(&mut self) -> bool {
        let Phase::Running(player) = self.phase else {
            return false;
        };

        let now = self.time.now();
        self.remaining[player.index()] = self.remaining_at(now);
        self.phase = Phase::Paused(player);
        self.turn_start = None;
        debug!("Paused with {:?} left for {player}", self.remaining[player.index()]);
        true
    }

    /// Restarts a paused countdown from the frozen remaining time.
    ///
    /// The new segment's snapshot is the frozen value, which also becomes the
    /// Bronstein cap for the rest of the turn.
    pub fn resume(&mut self) -> bool {
        let Phase::Paused(player) = self.phase else {
            return false;
        };

        let now = self.time.now();
        self.start_segment(player, now);
        debug!("Resumed {player} at {:?}", self.turn_start_remaining);
        true
    }

    /// Pauses when running and resumes when paused.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running(_) => self.pause(),
            Phase::Paused(_) => self.resume(),
            Phase::Idle | Phase::Expired(_) => false,
        }
    }

    /// Handles a tap on `area`, the clock of the player who just moved.
    ///
    /// Before the first move the tap starts the opponent's clock. During the
    /// game only the running player's own area switches the turn.
    pub fn tap(&mut self, area: Player) -> bool {
        match self.phase {
            Phase::Idle => self.begin_turn(!area),
            Phase::Running(active) if active == area => self.switch_turn(),
            _ => false,
        }
    }

    /// Recomputes the active player's remaining time and detects expiry.
    /// Never touches the segment snapshot.
    pub fn tick(&mut self) -> Tick {
        let Phase::Running(player) = self.phase else {
            return Tick::Stopped;
        };

        let left = self.remaining_at(self.time.now());
        self.remaining[player.index()] = left;
        trace!("Tick: {player} has {left:?}");

        if left.is_zero() {
            info!("Player {player} ran out of time");
            self.phase = Phase::Expired(player);
            self.turn_start = None;
            Tick::Expired(player)
        } else {
            Tick::Counting(left)
        }
    }

    /// Throws the game away and goes back to the pre-game state.
    pub fn reset(&mut self) {
        info!("Resetting clock");
        self.config = None;
        self.phase = Phase::Idle;
        self.remaining = [Duration::ZERO; 2];
        self.turn_start_remaining = Duration::ZERO;
        self.turn_start = None;
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            remaining: self.remaining,
            active: self.phase.active_player(),
            running: self.phase.is_running(),
            expired: match self.phase {
                Phase::Expired(p) => Some(p),
                _ => None,
            },
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn config(&self) -> Option<&ClockConfig> {
        self.config.as_ref()
    }

    /// Remaining time as of the last event or tick.
    #[inline]
    pub fn remaining(&self, player: Player) -> Duration {
        self.remaining[player.index()]
    }

    pub fn time_source(&self) -> &T {
        &self.time
    }

    fn start_segment(&mut self, player: Player, now: Instant) {
        self.phase = Phase::Running(player);
        self.turn_start_remaining = self.remaining[player.index()];
        self.turn_start = Some(now);
    }

    fn remaining_at(&self, now: Instant) -> Duration {
        let elapsed = self
            .turn_start
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
        self.turn_start_remaining.saturating_sub(elapsed)
    }
}
