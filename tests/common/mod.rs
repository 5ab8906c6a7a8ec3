#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use std::cell::Cell;
use tradetime::domain::calendar::{CalendarContext, CalendarOptions};
use tradetime::domain::error::TradeTimeError;
use tradetime::domain::session::{SessionContext, SessionOptions};
use tradetime::ports::calendar_port::CalendarPort;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn t(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

/// Exchange holidays inside the fixture range.
pub const HOLIDAYS: [(i32, u32, u32); 8] = [
    (2023, 12, 25),
    (2024, 1, 1),
    (2024, 2, 9),
    (2024, 2, 12),
    (2024, 2, 13),
    (2024, 2, 14),
    (2024, 2, 15),
    (2024, 2, 16),
];

/// Weekdays from 2023-10-02 through 2024-06-28, minus [`HOLIDAYS`].
pub fn trading_days() -> Vec<NaiveDate> {
    let holidays: Vec<NaiveDate> = HOLIDAYS.iter().map(|&(y, m, day)| d(y, m, day)).collect();
    d(2023, 10, 2)
        .iter_days()
        .take_while(|day| *day <= d(2024, 6, 28))
        .filter(|day| {
            use chrono::Datelike;
            day.weekday().number_from_monday() <= 5 && !holidays.contains(day)
        })
        .collect()
}

pub fn calendar() -> CalendarContext {
    calendar_with(CalendarOptions::default())
}

pub fn calendar_with(options: CalendarOptions) -> CalendarContext {
    CalendarContext::configured(&trading_days(), options).unwrap()
}

pub fn session() -> SessionContext {
    SessionContext::configured(SessionOptions::default()).unwrap()
}

pub fn session_with(options: SessionOptions) -> SessionContext {
    SessionContext::configured(options).unwrap()
}

/// In-memory trading-day source that counts how often it is read.
pub struct MockCalendarPort {
    pub days: Vec<NaiveDate>,
    pub error: Option<String>,
    pub calls: Cell<usize>,
}

impl MockCalendarPort {
    pub fn new() -> Self {
        Self {
            days: Vec::new(),
            error: None,
            calls: Cell::new(0),
        }
    }

    pub fn with_days(mut self, days: Vec<NaiveDate>) -> Self {
        self.days = days;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl CalendarPort for MockCalendarPort {
    fn trading_days(&self) -> Result<Vec<NaiveDate>, TradeTimeError> {
        self.calls.set(self.calls.get() + 1);
        match &self.error {
            Some(reason) => Err(TradeTimeError::CalendarSource {
                reason: reason.clone(),
            }),
            None => Ok(self.days.clone()),
        }
    }
}

/// Trading days as a one-column CSV with a `time` header.
pub fn trading_days_csv() -> String {
    let mut csv = String::from("time\n");
    for day in trading_days() {
        csv.push_str(&day.format("%Y-%m-%d").to_string());
        csv.push('\n');
    }
    csv
}
