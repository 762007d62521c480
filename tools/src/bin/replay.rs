use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use kingly_clock_lib::engine::{ClockEngine, Tick};
use kingly_clock_lib::ticker::Ticker;
use kingly_clock_lib::time::ManualClock;
use kingly_clock_lib::types::{ClockConfig, Player, SetupFields};
use kingly_clock_lib::{format_time, Event, Session};
use serde::Deserialize;

/// Replays a scripted game on a simulated clock and prints both clocks
/// after every step.
#[derive(Parser)]
struct App {
    scenario: PathBuf,
    /// Also tick every this many milliseconds between steps
    #[clap(short, long = "tick-every", value_parser = clap::value_parser!(u64).range(1..))]
    tick_every_ms: Option<u64>,
}

#[derive(Deserialize)]
struct Scenario {
    steps: Vec<Step>,
}

#[derive(Deserialize)]
struct Step {
    /// Milliseconds since the start of the scenario
    at_ms: u64,
    #[serde(flatten)]
    action: Action,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Action {
    Start {
        #[serde(default)]
        hours: String,
        #[serde(default)]
        minutes: String,
        #[serde(default)]
        seconds: String,
        #[serde(default)]
        increment_minutes: String,
        #[serde(default)]
        increment_seconds: String,
        #[serde(default)]
        policy: String,
    },
    Tap { player: usize },
    BeginTurn { player: usize },
    Switch,
    Pause,
    Resume,
    Toggle,
    Tick,
    Back,
}

impl Action {
    fn label(&self) -> String {
        match self {
            Action::Start { policy, .. } if !policy.is_empty() => format!("start ({policy})"),
            Action::Start { .. } => "start".to_string(),
            Action::Tap { player } => format!("tap {player}"),
            Action::BeginTurn { player } => format!("begin {player}"),
            Action::Switch => "switch".to_string(),
            Action::Pause => "pause".to_string(),
            Action::Resume => "resume".to_string(),
            Action::Toggle => "toggle".to_string(),
            Action::Tick => "tick".to_string(),
            Action::Back => "back".to_string(),
        }
    }

    fn to_event(&self) -> anyhow::Result<Option<Event>> {
        let player = |index: usize| {
            Player::from_index(index).with_context(|| format!("invalid player {index}"))
        };

        let event = match self {
            Action::Start {
                hours,
                minutes,
                seconds,
                increment_minutes,
                increment_seconds,
                policy,
            } => Event::StartGame(ClockConfig::from_setup(&SetupFields {
                hours,
                minutes,
                seconds,
                increment_minutes,
                increment_seconds,
                policy,
            })),
            Action::Tap { player: p } => Event::Tap(player(*p)?),
            Action::BeginTurn { player: p } => Event::BeginTurn(player(*p)?),
            Action::Switch => Event::SwitchTurn,
            Action::Pause => Event::Pause,
            Action::Resume => Event::Resume,
            Action::Toggle => Event::TogglePause,
            Action::Back => Event::Reset,
            Action::Tick => return Ok(None),
        };
        Ok(Some(event))
    }
}

struct Replay<W> {
    session: Session<ManualClock>,
    clock: ManualClock,
    tick_every: Option<Duration>,
    next_tick: Duration,
    out: W,
}

impl<W: Write> Replay<W> {
    fn new(tick_every: Option<Duration>, out: W) -> Self {
        let clock = ManualClock::new();
        let engine = ClockEngine::with_time_source(clock.clone());
        Self {
            session: Session::with_engine(engine, Ticker::default()),
            clock,
            tick_every,
            next_tick: Duration::ZERO,
            out,
        }
    }

    fn run(&mut self, scenario: &Scenario) -> anyhow::Result<()> {
        if let Some((a, b)) = scenario
            .steps
            .iter()
            .tuple_windows()
            .find(|(a, b)| b.at_ms < a.at_ms)
        {
            anyhow::bail!("step at {} ms comes after step at {} ms", b.at_ms, a.at_ms);
        }

        writeln!(
            self.out,
            "{:>8}  {:<18}{:>10}{:>10}  phase",
            "at_ms", "action", "P0", "P1"
        )?;
        for step in &scenario.steps {
            let at = Duration::from_millis(step.at_ms);
            self.synthetic_ticks_until(at)?;
            self.clock.advance(at - self.clock.elapsed());

            let accepted = match step.action.to_event()? {
                Some(event) => {
                    let accepted = self.session.apply(event);
                    if accepted && self.session.engine().is_running() {
                        self.next_tick = at;
                    }
                    accepted
                }
                None => !matches!(self.session.on_tick(), Tick::Stopped),
            };

            let label = if accepted {
                step.action.label()
            } else {
                format!("{} (ignored)", step.action.label())
            };
            self.print_row(step.at_ms, &label)?;
        }
        Ok(())
    }

    /// Stands in for the live tick source, which a simulated clock cannot drive.
    fn synthetic_ticks_until(&mut self, until: Duration) -> anyhow::Result<()> {
        let Some(interval) = self.tick_every else {
            return Ok(());
        };
        anyhow::ensure!(!interval.is_zero(), "tick interval must be positive");

        while self.session.engine().is_running() && self.next_tick + interval <= until {
            self.next_tick += interval;
            self.clock.advance(self.next_tick - self.clock.elapsed());
            if let Tick::Expired(player) = self.session.on_tick() {
                let label = format!("flag {player}");
                self.print_row(self.next_tick.as_millis() as u64, &label)?;
            }
        }
        Ok(())
    }

    fn print_row(&mut self, at_ms: u64, label: &str) -> io::Result<()> {
        let state = self.session.display_state();
        writeln!(
            self.out,
            "{:>8}  {:<18}{:>10}{:>10}  {}",
            at_ms,
            label,
            format_time(state.remaining(Player::First)),
            format_time(state.remaining(Player::Second)),
            state.phase(),
        )
    }
}

fn main() -> anyhow::Result<()> {
    let app = App::parse();

    let file = File::open(&app.scenario)
        .with_context(|| format!("failed to open {}", app.scenario.display()))?;
    let scenario: Scenario = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", app.scenario.display()))?;

    let tick_every = app.tick_every_ms.map(Duration::from_millis);
    Replay::new(tick_every, io::stdout().lock()).run(&scenario)
}
