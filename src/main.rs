mod app;
mod calendar;
mod clock;
mod config;
mod help;
mod theme;
use crate::app::App;
use crate::calendar::{parse_iso_date, DatePicker};
use crate::clock::{Clock, FixedClock, LocalClock};
use crate::config::Config;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::Date;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    months_in_advance: Option<u32>,
    unavailable: Vec<Date>,
    today: Option<Date>,
    log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('m') | Arg::Long("months-in-advance") => {
                    opts.months_in_advance = Some(parser.value()?.parse()?);
                }
                Arg::Short('u') | Arg::Long("unavailable") => {
                    opts.unavailable.push(parse_date(parser.value()?.string()?)?);
                }
                Arg::Long("today") => {
                    opts.today = Some(parse_date(parser.value()?.string()?)?);
                }
                Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                init_logging(opts.log_file.as_deref())?;
                let mut config = match opts.config {
                    Some(ref path) => Config::load(path)?,
                    None => Config::default(),
                };
                if let Some(months) = opts.months_in_advance {
                    config.months_in_advance = months;
                }
                let mut unavailable = config
                    .unavailable_dates()
                    .context("invalid unavailable date in configuration")?;
                unavailable.extend(opts.unavailable);
                let months = config.months_in_advance;
                match opts.today {
                    Some(today) => run_picker(FixedClock(today), months, unavailable),
                    None => {
                        let clock = LocalClock::new().context("failed to determine local date")?;
                        run_picker(clock, months, unavailable)
                    }
                }
            }
            Command::Help => {
                println!("Usage: resvcal [<options>]");
                println!();
                println!("Terminal booking calendar for picking and reserving available dates");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>       Read listing settings from a TOML file");
                println!("  -m, --months-in-advance <N>");
                println!("                            Open the calendar N months after the current one");
                println!("  -u, --unavailable <YYYY-MM-DD>");
                println!("                            Mark a date as unavailable (may be repeated)");
                println!("  --today <YYYY-MM-DD>      Treat the given date as today");
                println!("  --log-file <FILE>         Write log messages to the given file");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn parse_date(value: String) -> Result<Date, lexopt::Error> {
    parse_iso_date(&value).map_err(|e| lexopt::Error::ParsingFailed {
        value,
        error: Box::new(e),
    })
}

// Logging goes to a file, if at all, as the terminal belongs to the calendar
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_picker<C: Clock>(clock: C, months_in_advance: u32, unavailable: Vec<Date>) -> anyhow::Result<()> {
    let today = clock.today();
    info!(%today, months_in_advance, unavailable = unavailable.len(), "Starting calendar");
    let picker = DatePicker::new(today, months_in_advance, unavailable);
    let bookings = with_terminal(|mut terminal| {
        terminal.hide_cursor().context("failed to hide cursor")?;
        let bookings = App::new(picker, clock).run(terminal)?;
        Ok(bookings)
    })?;
    for booking in bookings {
        println!("Reserved {booking}");
    }
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
