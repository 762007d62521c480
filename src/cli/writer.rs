use std::fmt::Display;
use std::io;

use itertools::Itertools;
use kingly_clock_lib::engine::Phase;
use kingly_clock_lib::types::Player;
use kingly_clock_lib::{format_time, DisplayState};
use strum::IntoEnumIterator;

use crate::io::Output;

pub struct Writer<O> {
    output: O,
}

impl<O: Output> Writer<O> {
    pub fn new(output: O) -> Self {
        Self { output }
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        writeln!(self.output, "Kingly Clock ver. {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.output, "Type 'help' for a list of commands\n")
    }

    pub fn help(&mut self) -> io::Result<()> {
        writeln!(self.output, "Commands:")?;
        writeln!(self.output, "start [h] [m] [s] [inc_m] [inc_s] [fischer|bronstein]")?;
        writeln!(self.output, "\t\t\tSets up a new game (default 5 minutes, Fischer)")?;
        writeln!(self.output, "tap <0|1>, 0, 1\t\tTaps a player's clock after their move")?;
        writeln!(self.output, "pause, resume, p\tPauses, resumes or toggles the clock")?;
        writeln!(self.output, "back\t\t\tStops the game and clears both clocks")?;
        writeln!(self.output, "show\t\t\tShows both clocks")?;
        writeln!(self.output, "quit\t\t\tExits")?;
        writeln!(self.output)
    }

    pub fn state(&mut self, state: &DisplayState) -> io::Result<()> {
        writeln!(self.output, "{}", render_state(state))
    }

    /// Redraws the status line in place.
    pub fn live_state(&mut self, state: &DisplayState) -> io::Result<()> {
        write!(self.output, "\r{}", render_state(state))?;
        self.output.flush()
    }

    pub fn flagged(&mut self, player: Player) -> io::Result<()> {
        writeln!(self.output, "\nPlayer {player} is out of time")
    }

    pub fn error(&mut self, err: &impl Display) -> io::Result<()> {
        writeln!(self.output, "Error: {err}")
    }
}

/// Renders both clocks on one line. The running clock is marked with `>`,
/// a paused one with `=`, and a flag that fell with `FLAG`.
pub fn render_state(state: &DisplayState) -> String {
    let clocks = Player::iter()
        .map(|player| {
            let marker = match (state.active, state.running) {
                (Some(active), true) if active == player => '>',
                (Some(active), false) if active == player && state.expired.is_none() => '=',
                _ => ' ',
            };
            let flag = if state.expired == Some(player) { " FLAG" } else { "" };
            format!("{marker} P{player} {}{flag}", format_time(state.remaining(player)))
        })
        .join(" | ");

    let status = match state.phase() {
        Phase::Expired(_) => "game over",
        Phase::Running(_) => "running",
        Phase::Paused(_) => "paused",
        Phase::Idle => "waiting",
    };
    format!("{clocks}  [{status}]")
}
