//! CLI definition and dispatch.

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::clock_adapter::SystemClock;
use crate::adapters::csv_adapter::CsvCalendarAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::breaks::Direction;
use crate::domain::calendar::CalendarContext;
use crate::domain::convert::{DateInput, TimeInput};
use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use crate::domain::session::SessionContext;
use crate::domain::settings::{build_calendar_settings, build_session_options};
use crate::domain::trading_date::TradingDate;
use crate::domain::trading_time::TradingTime;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "tradetime", about = "Trading calendar and session arithmetic")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the known trading range and bar counts
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Check whether a date trades and how each frequency sees it
    Check {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        date: String,
    },
    /// Print the open and close of the bar enclosing a date
    Bar {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        date: String,
        #[arg(long)]
        freq: Option<FrequencySpec>,
        /// past or future
        #[arg(long)]
        if_break: Option<String>,
    },
    /// Shift a bar close by a number of bars
    Shift {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        date: String,
        #[arg(long, allow_hyphen_values = true)]
        bars: i64,
        #[arg(long)]
        freq: Option<FrequencySpec>,
    },
    /// List the bars between two dates
    Between {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        freq: Option<FrequencySpec>,
        /// Print bar opens instead of closes
        #[arg(long)]
        open: bool,
        /// Keep a final bar that closes after the end date
        #[arg(long)]
        overflow: bool,
    },
    /// List quarter labels between two dates
    Quarters {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Label layout, (y) and (q) are substituted
        #[arg(long)]
        format: Option<String>,
    },
    /// List the intraday session, or resolve or shift a time within it
    Session {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        freq: Option<FrequencySpec>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        bars: Option<i64>,
        /// past or future
        #[arg(long)]
        if_break: Option<String>,
    },
}

/// Both registries, configured from one config file.
pub struct Registries {
    pub calendar: CalendarContext,
    pub session: SessionContext,
}

pub fn run(cli: Cli) -> ExitCode {
    let (config, result) = match cli.command {
        Command::Info { config } => {
            let lines = with_registries(&config, info_lines);
            (config, lines)
        }
        Command::Check { config, date } => {
            let lines = with_registries(&config, |reg| check_lines(reg, &date));
            (config, lines)
        }
        Command::Bar {
            config,
            date,
            freq,
            if_break,
        } => {
            let lines = with_registries(&config, |reg| {
                bar_lines(reg, &date, freq, if_break.as_deref())
            });
            (config, lines)
        }
        Command::Shift {
            config,
            date,
            bars,
            freq,
        } => {
            let lines = with_registries(&config, |reg| shift_lines(reg, &date, bars, freq));
            (config, lines)
        }
        Command::Between {
            config,
            start,
            end,
            freq,
            open,
            overflow,
        } => {
            let lines = with_registries(&config, |reg| {
                between_lines(reg, &start, &end, freq, open, overflow)
            });
            (config, lines)
        }
        Command::Quarters {
            config,
            start,
            end,
            format,
        } => {
            let lines = with_registries(&config, |reg| {
                quarter_lines(reg, &start, &end, format.as_deref())
            });
            (config, lines)
        }
        Command::Session {
            config,
            freq,
            time,
            bars,
            if_break,
        } => {
            let lines = with_registries(&config, |reg| {
                session_lines(reg, freq, time.as_deref(), bars, if_break.as_deref())
            });
            (config, lines)
        }
    };

    match result {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            tracing::debug!(config = %config.display(), "command failed");
            (&e).into()
        }
    }
}

fn with_registries(
    config_path: &Path,
    command: impl FnOnce(&Registries) -> Result<Vec<String>, TradeTimeError>,
) -> Result<Vec<String>, TradeTimeError> {
    let config = FileConfigAdapter::from_file(config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    let registries = build_registries(&config, base)?;
    command(&registries)
}

/// Configures both registries. A relative `data_path` resolves against
/// `config_dir`.
pub fn build_registries(config: &dyn ConfigPort, config_dir: &Path) -> Result<Registries, TradeTimeError> {
    let settings = build_calendar_settings(config)?;
    let session_options = build_session_options(config)?;

    let source = CsvCalendarAdapter::new(settings.resolve_data_path(config_dir));
    let calendar = CalendarContext::new();
    calendar.configure_from(&source, settings.options)?;
    let session = SessionContext::configured(session_options)?;

    Ok(Registries { calendar, session })
}

pub fn parse_date_arg(value: &str) -> Result<NaiveDate, TradeTimeError> {
    DateInput::Text(value).to_date(&SystemClock)
}

pub fn parse_time_arg(value: &str) -> Result<NaiveTime, TradeTimeError> {
    TimeInput::Text(value).to_time(&SystemClock)
}

pub fn parse_direction_arg(value: Option<&str>) -> Result<Option<Direction>, TradeTimeError> {
    value
        .map(|raw| {
            Direction::parse(raw).ok_or_else(|| TradeTimeError::InvalidFormat {
                value: raw.to_string(),
                reason: "expected past or future".into(),
            })
        })
        .transpose()
}

pub fn info_lines(reg: &Registries) -> Result<Vec<String>, TradeTimeError> {
    let calendar = &reg.calendar;
    let session = &reg.session;
    let mut lines = vec![format!(
        "calendar: {} to {}, {} trading days",
        calendar.first_day()?,
        calendar.last_day()?,
        calendar.table(FrequencySpec::DAY)?.len()
    )];
    for freq in FrequencySpec::DATE_FREQUENCIES {
        lines.push(format!("  {freq}: {} bars", calendar.table(freq)?.len()));
    }

    let hours = session.hours()?;
    lines.push(format!(
        "session: {}-{}, {}-{}",
        hours.morning_open, hours.morning_close, hours.afternoon_open, hours.afternoon_close
    ));
    for freq in FrequencySpec::SESSION_FREQUENCIES {
        lines.push(format!("  {freq}: {} bars", session.bar_count(freq)?));
    }
    Ok(lines)
}

pub fn check_lines(reg: &Registries, date: &str) -> Result<Vec<String>, TradeTimeError> {
    let calendar = &reg.calendar;
    let day = parse_date_arg(date)?;
    let trading = calendar.is_trading_day(day)?;
    let mut lines = vec![format!(
        "{day}: {}",
        if trading { "trading day" } else { "not a trading day" }
    )];
    for freq in FrequencySpec::DATE_FREQUENCIES {
        let status = match calendar.classify_break(day, freq)? {
            Some(kind) => kind.to_string(),
            None if calendar.is_close(day, freq)? => "bar close".to_string(),
            None if calendar.is_open(day, freq)? => "bar open".to_string(),
            None => "inside bar".to_string(),
        };
        lines.push(format!("  {freq}: {status}"));
    }
    Ok(lines)
}

pub fn bar_lines(
    reg: &Registries,
    date: &str,
    freq: Option<FrequencySpec>,
    if_break: Option<&str>,
) -> Result<Vec<String>, TradeTimeError> {
    let day = TradingDate::permissive(parse_date_arg(date)?, reg.calendar.default_frequency()?);
    let (open, close) = day.range(&reg.calendar, freq, parse_direction_arg(if_break)?)?;
    Ok(vec![format!("{open} {close}")])
}

pub fn shift_lines(
    reg: &Registries,
    date: &str,
    bars: i64,
    freq: Option<FrequencySpec>,
) -> Result<Vec<String>, TradeTimeError> {
    let day = TradingDate::new(&reg.calendar, parse_date_arg(date)?, freq)?;
    Ok(vec![day.add_bars(&reg.calendar, bars)?.to_string()])
}

pub fn between_lines(
    reg: &Registries,
    start: &str,
    end: &str,
    freq: Option<FrequencySpec>,
    include_open: bool,
    overflow: bool,
) -> Result<Vec<String>, TradeTimeError> {
    let bars = TradingDate::bars_between(
        &reg.calendar,
        parse_date_arg(start)?,
        parse_date_arg(end)?,
        freq,
        include_open,
        overflow,
    )?;
    Ok(bars.iter().map(ToString::to_string).collect())
}

pub fn quarter_lines(
    reg: &Registries,
    start: &str,
    end: &str,
    format: Option<&str>,
) -> Result<Vec<String>, TradeTimeError> {
    reg.calendar
        .quarter_labels(parse_date_arg(start)?, parse_date_arg(end)?, format)
}

/// Without `time`: every bar as `open close`. With `time` only: the bar
/// enclosing it. With `time` and `bars`: the bar close `bars` steps away.
pub fn session_lines(
    reg: &Registries,
    freq: Option<FrequencySpec>,
    time: Option<&str>,
    bars: Option<i64>,
    if_break: Option<&str>,
) -> Result<Vec<String>, TradeTimeError> {
    let session = &reg.session;
    let freq = match freq {
        Some(freq) => freq,
        None => session.default_frequency()?,
    };

    let Some(time) = time else {
        let table = session.table(freq)?;
        return Ok(table
            .opens()
            .iter()
            .zip(table.closes())
            .map(|(open, close)| {
                format!(
                    "{} {}",
                    TradingTime::permissive(*open, freq),
                    TradingTime::permissive(*close, freq)
                )
            })
            .collect());
    };

    let value = TradingTime::permissive(parse_time_arg(time)?, freq);
    match bars {
        Some(bars) => {
            let close = value.close(session, parse_direction_arg(if_break)?)?;
            Ok(vec![close.add_bars(session, bars)?.to_string()])
        }
        None => {
            let (open, close) = value.range(session, parse_direction_arg(if_break)?)?;
            Ok(vec![format!("{open} {close}")])
        }
    }
}
