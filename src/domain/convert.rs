//! Conversion of external date/time representations.
//!
//! One variant per accepted representation, each with its own parsing rule.
//! Conversion never validates against a registry; callers decide whether the
//! result must be a bar boundary.

use crate::domain::error::TradeTimeError;
use crate::ports::clock_port::ClockPort;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Anything that can stand for a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    /// The clock's current date.
    Today,
    /// `YYYYMMDD`.
    Int(i64),
    /// `YYYYMMDD`, or `YYYY-MM-DD` optionally followed by anything (a time).
    Text(&'a str),
    Date(NaiveDate),
    /// Date part kept.
    DateTime(NaiveDateTime),
    /// A bare time of day stands for today.
    Time(NaiveTime),
}

/// Anything that can stand for a time of day. Sub-second parts are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInput<'a> {
    /// The clock's current time.
    Now,
    /// `HHMMSS`.
    Int(i64),
    /// `HHMMSS`, `HHMM`, `HH:MM` or `HH:MM:SS` optionally followed by a fraction.
    Text(&'a str),
    Time(NaiveTime),
    /// Time part kept.
    DateTime(NaiveDateTime),
    /// A bare date stands for now.
    Date(NaiveDate),
}

fn invalid(value: impl ToString, reason: &str) -> TradeTimeError {
    TradeTimeError::InvalidFormat {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn parse_date_text(text: &str) -> Result<NaiveDate, TradeTimeError> {
    let trimmed = text.trim();
    if trimmed.contains('-') {
        let head = trimmed.get(..10).unwrap_or(trimmed);
        return NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .map_err(|e| invalid(text, &format!("expected YYYY-MM-DD: {e}")));
    }
    if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(text, "expected YYYYMMDD or YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y%m%d")
        .map_err(|e| invalid(text, &format!("expected YYYYMMDD: {e}")))
}

fn parse_time_text(text: &str) -> Result<NaiveTime, TradeTimeError> {
    let trimmed = text.trim();
    if trimmed.contains(':') {
        let head = trimmed.get(..8).unwrap_or(trimmed);
        return NaiveTime::parse_from_str(head, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(head, "%H:%M"))
            .map_err(|e| invalid(text, &format!("expected HH:MM[:SS]: {e}")));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(text, "expected HHMMSS or HH:MM:SS"));
    }
    let format = match trimmed.len() {
        6 => "%H%M%S",
        4 => "%H%M",
        _ => return Err(invalid(text, "expected HHMMSS or HH:MM:SS")),
    };
    NaiveTime::parse_from_str(trimmed, format).map_err(|e| invalid(text, &e.to_string()))
}

/// Drops sub-second precision.
pub(crate) fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

impl DateInput<'_> {
    pub fn to_date(&self, clock: &dyn ClockPort) -> Result<NaiveDate, TradeTimeError> {
        match *self {
            Self::Today | Self::Time(_) => Ok(clock.today()),
            Self::Int(n) => {
                if n < 0 {
                    return Err(invalid(n, "negative date"));
                }
                parse_date_text(&format!("{n:08}"))
            }
            Self::Text(text) => parse_date_text(text),
            Self::Date(date) => Ok(date),
            Self::DateTime(datetime) => Ok(datetime.date()),
        }
    }
}

impl TimeInput<'_> {
    pub fn to_time(&self, clock: &dyn ClockPort) -> Result<NaiveTime, TradeTimeError> {
        match *self {
            Self::Now | Self::Date(_) => Ok(whole_seconds(clock.now())),
            Self::Int(n) => {
                if n < 0 {
                    return Err(invalid(n, "negative time"));
                }
                parse_time_text(&format!("{n:06}"))
            }
            Self::Text(text) => parse_time_text(text).map(whole_seconds),
            Self::Time(time) => Ok(whole_seconds(time)),
            Self::DateTime(datetime) => Ok(whole_seconds(datetime.time())),
        }
    }
}
