use std::io;
use std::str::FromStr;

use crossbeam::select;
use itertools::Itertools;
use kingly_clock_lib::types::{ClockConfig, IncrementPolicy, ParsePlayerError, Player, SetupFields};
use kingly_clock_lib::{Event, Session, Tick};
use log::{debug, warn};

use crate::io::{spawn_reader, Input, Output};

#[cfg(test)]
mod tests;
mod writer;
use writer::Writer;

/// Minutes used by `start` when no time is given at all.
const DEFAULT_MINUTES: &str = "5";

pub struct Cli<I, O> {
    session: Session,
    input: I,
    writer: Writer<O>,
    live: bool,
}

impl<I, O> Cli<I, O>
where
    I: Input + Send + 'static,
    O: Output,
{
    pub fn new(session: Session, input: I, output: O, live: bool) -> Self {
        Self {
            session,
            input,
            writer: Writer::new(output),
            live,
        }
    }

    /// Runs the command loop until `quit` or end of input.
    pub fn start(self) -> io::Result<()> {
        let Self {
            mut session,
            input,
            mut writer,
            live,
        } = self;

        writer.welcome()?;
        let lines = spawn_reader(input);

        loop {
            // A re-armed ticker hands out a new channel, so fetch it every round
            let ticks = session.ticks().clone();

            select! {
                recv(lines) -> line => match line {
                    Ok(line) => {
                        if !on_line(&mut session, &mut writer, &line?)? {
                            return Ok(());
                        }
                    }
                    Err(_) => return Ok(()),
                },
                recv(ticks) -> _ => on_tick(&mut session, &mut writer, live)?,
            }
        }
    }
}

/// Handles one line of input. Returns `false` once the loop should stop.
fn on_line<O: Output>(session: &mut Session, writer: &mut Writer<O>, line: &str) -> io::Result<bool> {
    if line.is_empty() {
        return Ok(false);
    }
    if line.trim().is_empty() {
        return Ok(true);
    }

    match line.parse::<Command>() {
        Ok(Command::Quit) => return Ok(false),
        Ok(cmd) => execute(session, writer, cmd)?,
        Err(err) => writer.error(&err)?,
    }
    Ok(true)
}

fn execute<O: Output>(session: &mut Session, writer: &mut Writer<O>, cmd: Command) -> io::Result<()> {
    let event = match cmd {
        Command::Start(config) => Event::StartGame(config),
        Command::Tap(area) => Event::Tap(area),
        Command::Pause => Event::Pause,
        Command::Resume => Event::Resume,
        Command::Toggle => Event::TogglePause,
        Command::Back => Event::Reset,
        Command::Show => return writer.state(&session.display_state()),
        Command::Help => return writer.help(),
        Command::Quit => return Ok(()),
    };

    if !session.apply(event) {
        debug!("Ignored {event:?} in {:?}", session.engine().phase());
    }
    writer.state(&session.display_state())
}

fn on_tick<O: Output>(session: &mut Session, writer: &mut Writer<O>, live: bool) -> io::Result<()> {
    match session.on_tick() {
        Tick::Expired(player) => {
            writer.flagged(player)?;
            writer.state(&session.display_state())
        }
        Tick::Counting(_) if live => writer.live_state(&session.display_state()),
        Tick::Counting(_) => Ok(()),
        Tick::Stopped => {
            warn!("Tick received without a running clock");
            Ok(())
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("missing command")]
    MissingCommand,
    #[error("unrecognized command '{0}', try 'help'")]
    UnrecognizedCommand(String),
    #[error("missing argument")]
    MissingArgument,
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error(transparent)]
    InvalidPlayer(#[from] ParsePlayerError),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Start(ClockConfig),
    Tap(Player),
    Pause,
    Resume,
    Toggle,
    Back,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cmds = s.split_ascii_whitespace().collect_vec();
        let Some((&name, args)) = cmds.split_first() else {
            return Err(ParseCommandError::MissingCommand);
        };

        match name {
            "start" | "new" => parse_start(args).map(Command::Start),
            "tap" => match args {
                [player] => Ok(Command::Tap(player.parse()?)),
                [] => Err(ParseCommandError::MissingArgument),
                [_, extra, ..] => Err(ParseCommandError::UnexpectedArgument(extra.to_string())),
            },
            // A bare index is a tap
            "0" | "1" => no_args(args, Command::Tap(name.parse()?)),
            "pause" => no_args(args, Command::Pause),
            "resume" => no_args(args, Command::Resume),
            "toggle" | "p" => no_args(args, Command::Toggle),
            "back" | "reset" => no_args(args, Command::Back),
            "show" | "status" => no_args(args, Command::Show),
            "help" => no_args(args, Command::Help),
            "quit" | "exit" => no_args(args, Command::Quit),
            _ => Err(ParseCommandError::UnrecognizedCommand(name.to_string())),
        }
    }
}

fn no_args(args: &[&str], cmd: Command) -> Result<Command, ParseCommandError> {
    match args.first() {
        None => Ok(cmd),
        Some(arg) => Err(ParseCommandError::UnexpectedArgument(arg.to_string())),
    }
}

/// `start [h] [m] [s] [inc_m] [inc_s] [policy]`, the policy may appear anywhere.
fn parse_start(args: &[&str]) -> Result<ClockConfig, ParseCommandError> {
    let (policies, numbers): (Vec<&str>, Vec<&str>) = args
        .iter()
        .copied()
        .partition(|arg| arg.parse::<IncrementPolicy>().is_ok());

    if let Some(extra) = policies.get(1).or_else(|| numbers.get(5)) {
        return Err(ParseCommandError::UnexpectedArgument(extra.to_string()));
    }

    let field = |i: usize| numbers.get(i).copied().unwrap_or("");
    let fields = SetupFields {
        hours: field(0),
        minutes: if numbers.is_empty() { DEFAULT_MINUTES } else { field(1) },
        seconds: field(2),
        increment_minutes: field(3),
        increment_seconds: field(4),
        policy: policies.first().copied().unwrap_or(""),
    };
    Ok(ClockConfig::from_setup(&fields))
}
