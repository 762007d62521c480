use std::time::Duration;

use kingly_clock_lib::types::{ClockConfig, IncrementPolicy, ParsePlayerError, Player};
use kingly_clock_lib::{DisplayState, Event, Session};

use super::writer::{render_state, Writer};
use super::*;

fn idle_session() -> Session {
    Session::new(Duration::from_secs(3600))
}

#[test]
fn test_parse_start_full() {
    let input = "start 1 30 0 0 30 bronstein";
    let expected = Command::Start(ClockConfig::new(5_400_000, 30_000, IncrementPolicy::Bronstein));
    assert_eq!(input.parse::<Command>(), Ok(expected));
}

#[test]
fn test_parse_start_policy_first() {
    let input = "start Fischer 0 3 0 0 2";
    let expected = Command::Start(ClockConfig::new(180_000, 2_000, IncrementPolicy::Fischer));
    assert_eq!(input.parse::<Command>(), Ok(expected));
}

#[test]
fn test_parse_start_defaults_to_five_minutes() {
    let input = "start";
    let expected = Command::Start(ClockConfig::new(300_000, 0, IncrementPolicy::Fischer));
    assert_eq!(input.parse::<Command>(), Ok(expected));
}

#[test]
fn test_parse_start_coerces_garbage() {
    let input = "start x -4 10";
    let expected = Command::Start(ClockConfig::new(10_000, 0, IncrementPolicy::Fischer));
    assert_eq!(input.parse::<Command>(), Ok(expected));
}

#[test]
fn test_parse_start_too_many_numbers() {
    let input = "start 0 5 0 0 0 7";
    let expected = ParseCommandError::UnexpectedArgument("7".into());
    assert_eq!(input.parse::<Command>(), Err(expected));
}

#[test]
fn test_parse_start_two_policies() {
    let input = "start 0 5 fischer bronstein";
    let expected = ParseCommandError::UnexpectedArgument("bronstein".into());
    assert_eq!(input.parse::<Command>(), Err(expected));
}

#[test]
fn test_parse_tap() {
    let input = "tap 1";
    let expected = Command::Tap(Player::Second);
    assert_eq!(input.parse::<Command>(), Ok(expected));
}

#[test]
fn test_parse_bare_tap() {
    let input = "0";
    let expected = Command::Tap(Player::First);
    assert_eq!(input.parse::<Command>(), Ok(expected));
}

#[test]
fn test_parse_tap_missing_player() {
    let input = "tap";
    let expected = ParseCommandError::MissingArgument;
    assert_eq!(input.parse::<Command>(), Err(expected));
}

#[test]
fn test_parse_tap_invalid_player() {
    let input = "tap 2";
    let expected = ParseCommandError::InvalidPlayer(ParsePlayerError("2".into()));
    assert_eq!(input.parse::<Command>(), Err(expected));
}

#[test]
fn test_parse_simple_commands() {
    assert_eq!("pause".parse::<Command>(), Ok(Command::Pause));
    assert_eq!("resume".parse::<Command>(), Ok(Command::Resume));
    assert_eq!("p".parse::<Command>(), Ok(Command::Toggle));
    assert_eq!("back".parse::<Command>(), Ok(Command::Back));
    assert_eq!("show".parse::<Command>(), Ok(Command::Show));
    assert_eq!("help".parse::<Command>(), Ok(Command::Help));
    assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
}

#[test]
fn test_parse_pause_with_argument() {
    let input = "pause now";
    let expected = ParseCommandError::UnexpectedArgument("now".into());
    assert_eq!(input.parse::<Command>(), Err(expected));
}

#[test]
fn test_parse_unrecognized_command() {
    let input = "flip";
    let expected = ParseCommandError::UnrecognizedCommand("flip".into());
    assert_eq!(input.parse::<Command>(), Err(expected));
}

#[test]
fn test_parse_empty() {
    assert_eq!("   ".parse::<Command>(), Err(ParseCommandError::MissingCommand));
}

#[test]
fn render_waiting_game() {
    let state = DisplayState {
        remaining: [Duration::from_secs(300); 2],
        active: None,
        running: false,
        expired: None,
    };
    assert_eq!(render_state(&state), "  P0 5:00 |   P1 5:00  [waiting]");
}

#[test]
fn render_running_and_paused() {
    let mut state = DisplayState {
        remaining: [Duration::from_millis(61_200), Duration::from_secs(3_600)],
        active: Some(Player::Second),
        running: true,
        expired: None,
    };
    assert_eq!(render_state(&state), "  P0 1:01.2 | > P1 1:00:00  [running]");

    state.running = false;
    assert_eq!(render_state(&state), "  P0 1:01.2 | = P1 1:00:00  [paused]");
}

#[test]
fn render_flag() {
    let state = DisplayState {
        remaining: [Duration::ZERO, Duration::from_secs(42)],
        active: Some(Player::First),
        running: false,
        expired: Some(Player::First),
    };
    assert_eq!(render_state(&state), "  P0 0:00.0 FLAG |   P1 0:42.0  [game over]");
}

#[test]
fn cli_runs_commands_until_quit() {
    let mut output = String::new();
    let input = "start 0 0 10\n\nflip\n1\nshow\nquit\nshow\n".to_string();
    Cli::new(idle_session(), input, &mut output, false)
        .start()
        .unwrap();

    let lines = output.lines().skip(3).collect::<Vec<_>>();
    assert_eq!(
        lines,
        [
            "  P0 0:10.0 |   P1 0:10.0  [waiting]",
            "Error: unrecognized command 'flip', try 'help'",
            "> P0 0:10.0 |   P1 0:10.0  [running]",
            "> P0 0:10.0 |   P1 0:10.0  [running]",
        ]
    );
}

#[test]
fn cli_stops_at_end_of_input() {
    let mut output = String::new();
    Cli::new(idle_session(), "start\nback\n".to_string(), &mut output, false)
        .start()
        .unwrap();

    assert!(output.ends_with("  P0 0:00.0 |   P1 0:00.0  [waiting]\n"));
}

#[test]
fn tick_reports_fallen_flag() {
    let mut session = Session::new(Duration::from_millis(1));
    session.apply(Event::StartGame(ClockConfig::new(0, 0, IncrementPolicy::Fischer)));
    session.apply(Event::Tap(Player::First));
    session.ticks().recv_timeout(Duration::from_secs(5)).unwrap();

    let mut output = String::new();
    let mut writer = Writer::new(&mut output);
    on_tick(&mut session, &mut writer, false).unwrap();

    assert!(output.contains("Player 1 is out of time"));
    assert!(output.contains("P1 0:00.0 FLAG"));
    assert!(!session.ticker().is_armed());
}
