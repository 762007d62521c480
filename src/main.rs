use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use cli::Cli;
use io::Logging;
use kingly_clock_lib::Session;
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

mod cli;
mod io;

#[derive(Parser)]
#[command(version, about = "A two player chess clock for the terminal")]
struct App {
    /// File the log is written to
    #[arg(long, default_value = "./clock.log")]
    log_file: PathBuf,
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    /// Display refresh interval in milliseconds
    #[arg(long = "tick-ms", default_value_t = 100)]
    tick_ms: u64,
    /// Redraw the clocks on every tick
    #[arg(long)]
    live: bool,
}

fn main() -> std::io::Result<()> {
    let app = App::parse();

    WriteLogger::init(app.log_level, Config::default(), File::create(&app.log_file)?)
        .map_err(std::io::Error::other)?;

    let session = Session::new(Duration::from_millis(app.tick_ms.max(1)));
    Cli::new(
        session,
        Logging(std::io::stdin()),
        Logging(std::io::stdout()),
        app.live,
    )
    .start()
}
