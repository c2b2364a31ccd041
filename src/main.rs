use std::path::PathBuf;
use std::time::Instant;

use chrono::{Datelike, Local};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use dancalendar::calendar::{parse_year_spec, CalendarOptions, DenmarkCalendar};
use dancalendar::config::Config;
use dancalendar::error::Result;
use dancalendar::ical;

/// Generate comprehensive calendars for Denmark.
#[derive(Parser)]
#[command(name = "dancalendar", version, about)]
struct Cli {
    /// Calendar year, inclusive range ("2024-2026") or comma-separated
    /// list; defaults to the current year
    years: Option<String>,

    /// Leave out moon phases
    #[arg(long)]
    no_moon: bool,

    /// Leave out sunrise and sunset times
    #[arg(long)]
    no_sun: bool,

    /// Sample sun times every day instead of every Monday
    #[arg(long)]
    daily_sun: bool,

    /// Put ISO week numbers on Mondays
    #[arg(long)]
    weeks: bool,

    /// Show clock times of astronomical events
    #[arg(short = 't', long)]
    times: bool,

    /// Prefix moon phases with their symbol
    #[arg(short = 's', long)]
    symbols: bool,

    /// Write an iCalendar file instead of printing
    #[arg(short = 'i', long, value_name = "FILE")]
    ical: Option<PathBuf>,

    /// Print info (-vv for debug info)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "dancalendar=info",
        _ => "dancalendar=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_env()?;
    let years = match &cli.years {
        Some(spec) => parse_year_spec(spec)?,
        None => vec![Local::now().year()],
    };
    let options = CalendarOptions {
        moon: !cli.no_moon,
        sun: !cli.no_sun,
        daily_sun: cli.daily_sun,
        weeks: cli.weeks,
    };

    let started = Instant::now();
    let calendar = DenmarkCalendar::for_years(&years, &config.observer(), &options)?;
    tracing::debug!(
        years = ?years,
        entries = calendar.len(),
        elapsed = ?started.elapsed(),
        "calendar built"
    );

    match &cli.ical {
        Some(path) => {
            ical::write_ical(&calendar, &config.calendar_name, path)?;
            tracing::info!(path = %path.display(), entries = calendar.len(), "wrote iCalendar file");
        }
        None => {
            for line in calendar.lines(cli.times, cli.symbols) {
                println!("{line}");
            }
        }
    }
    Ok(())
}
