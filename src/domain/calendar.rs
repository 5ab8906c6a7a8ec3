//! Calendar registry: one bar table per date frequency.
//!
//! Built once from the master trading-day list, then read-only. Every query
//! goes through [`OrderedBarTable::locate`] on the table of the requested
//! frequency; non-trading days are first classified as internal or external
//! breaks and resolved to a neighbouring trading day.

use crate::domain::bar_table::{OrderedBarTable, ShiftMode};
use crate::domain::breaks::{BreakKind, Direction};
use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use crate::domain::registry::InitOnce;
use crate::domain::resample;
use crate::ports::calendar_port::CalendarPort;
use crate::ports::clock_port::ClockPort;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const REGISTRY: &str = "calendar";

/// Default label layout for [`CalendarContext::quarter_labels`].
pub const DEFAULT_QUARTER_FORMAT: &str = "(y)Q(q)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarOptions {
    pub default_frequency: FrequencySpec,
    /// Lets a bare offset appear on the left of date arithmetic.
    pub allow_reverse_arithmetic: bool,
    pub shift_mode: ShiftMode,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            default_frequency: FrequencySpec::DAY,
            allow_reverse_arithmetic: false,
            shift_mode: ShiftMode::Wrap,
        }
    }
}

/// Selects a month (1-12) or quarter (1-4) of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month(u32),
    Quarter(u32),
}

impl Period {
    fn frequency(self) -> FrequencySpec {
        match self {
            Self::Month(_) => FrequencySpec::MONTH,
            Self::Quarter(_) => FrequencySpec::QUARTER,
        }
    }

    fn last_month(self) -> Result<u32, TradeTimeError> {
        match self {
            Self::Month(m @ 1..=12) => Ok(m),
            Self::Quarter(q @ 1..=4) => Ok(q * 3),
            Self::Month(m) => Err(TradeTimeError::InvalidFormat {
                value: m.to_string(),
                reason: "month must be 1-12".into(),
            }),
            Self::Quarter(q) => Err(TradeTimeError::InvalidFormat {
                value: q.to_string(),
                reason: "quarter must be 1-4".into(),
            }),
        }
    }
}

#[derive(Debug)]
struct CalendarState {
    options: CalendarOptions,
    tables: BTreeMap<FrequencySpec, OrderedBarTable<NaiveDate>>,
}

impl CalendarState {
    fn build(days: &[NaiveDate], options: CalendarOptions) -> Result<Self, TradeTimeError> {
        if !options.default_frequency.is_date() {
            return Err(TradeTimeError::InvalidFrequency {
                token: options.default_frequency.to_string(),
                reason: "calendar default frequency must be D, W, M, Q or Y".into(),
            });
        }

        let mut sorted = days.to_vec();
        if days.windows(2).any(|pair| pair[0] >= pair[1]) {
            sorted.sort_unstable();
            sorted.dedup();
            warn!(
                received = days.len(),
                kept = sorted.len(),
                "trading days were unsorted or duplicated, normalized"
            );
        }

        let mut tables = BTreeMap::new();
        for freq in FrequencySpec::DATE_FREQUENCIES {
            let table = OrderedBarTable::build(freq, resample::date_bars(&sorted, freq)?)?;
            debug!(frequency = %freq, bars = table.len(), "built calendar table");
            tables.insert(freq, table);
        }

        Ok(Self { options, tables })
    }
}

/// Date-side registry. Construct once, configure once, share by reference.
#[derive(Debug, Default)]
pub struct CalendarContext {
    state: InitOnce<CalendarState>,
}

impl CalendarContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context configured from `days` in one step.
    pub fn configured(days: &[NaiveDate], options: CalendarOptions) -> Result<Self, TradeTimeError> {
        let ctx = Self::new();
        ctx.configure(days, options)?;
        Ok(ctx)
    }

    /// Builds every date table. Returns `false` without touching the
    /// existing tables when the context is already configured.
    pub fn configure(&self, days: &[NaiveDate], options: CalendarOptions) -> Result<bool, TradeTimeError> {
        let built = self.state.init_with(|| CalendarState::build(days, options))?;
        if !built {
            debug!("calendar already configured, keeping existing tables");
        }
        Ok(built)
    }

    /// Like [`configure`](Self::configure), fetching the days from `source`
    /// only when a build is actually needed.
    pub fn configure_from(
        &self,
        source: &dyn CalendarPort,
        options: CalendarOptions,
    ) -> Result<bool, TradeTimeError> {
        let built = self
            .state
            .init_with(|| CalendarState::build(&source.trading_days()?, options))?;
        if !built {
            debug!("calendar already configured, keeping existing tables");
        }
        Ok(built)
    }

    /// Drops the tables so the next `configure` rebuilds them.
    pub fn reset(&mut self) {
        if self.state.reset().is_some() {
            info!("calendar registry reset");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.state.get().is_some()
    }

    fn state(&self) -> Result<&CalendarState, TradeTimeError> {
        self.state
            .get()
            .ok_or(TradeTimeError::NotConfigured { registry: REGISTRY })
    }

    pub fn options(&self) -> Result<CalendarOptions, TradeTimeError> {
        Ok(self.state()?.options)
    }

    pub fn default_frequency(&self) -> Result<FrequencySpec, TradeTimeError> {
        Ok(self.state()?.options.default_frequency)
    }

    pub fn table(&self, freq: FrequencySpec) -> Result<&OrderedBarTable<NaiveDate>, TradeTimeError> {
        let state = self.state()?;
        state
            .tables
            .get(&freq)
            .ok_or_else(|| TradeTimeError::InvalidFrequency {
                token: freq.to_string(),
                reason: "not a calendar frequency".into(),
            })
    }

    fn days(&self) -> Result<&OrderedBarTable<NaiveDate>, TradeTimeError> {
        self.table(FrequencySpec::DAY)
    }

    pub fn first_day(&self) -> Result<NaiveDate, TradeTimeError> {
        Ok(self.days()?.first().1)
    }

    pub fn last_day(&self) -> Result<NaiveDate, TradeTimeError> {
        Ok(self.days()?.last().1)
    }

    pub fn is_trading_day(&self, day: NaiveDate) -> Result<bool, TradeTimeError> {
        Ok(self.days()?.contains(&day))
    }

    /// `day` itself when it trades, otherwise the closest trading day on the
    /// given side. `OutOfRange` when no such day is known.
    pub fn nearest_trading_day(
        &self,
        day: NaiveDate,
        direction: Direction,
    ) -> Result<NaiveDate, TradeTimeError> {
        let days = self.days()?;
        let i = days.locate(&day);
        let found = match direction {
            _ if days.contains(&day) => Some(day),
            Direction::Future => days.get(i).map(|bar| bar.1),
            Direction::Past => i.checked_sub(1).and_then(|j| days.get(j)).map(|bar| bar.1),
        };
        found.ok_or_else(|| TradeTimeError::OutOfRange {
            value: day.to_string(),
            frequency: FrequencySpec::DAY.to_string(),
        })
    }

    /// `None` for trading days. Otherwise `Internal` when the nearest trading
    /// days on both sides fall in the same `freq` bar, `External` when they
    /// fall in different bars or one side lies beyond the known range.
    pub fn classify_break(
        &self,
        day: NaiveDate,
        freq: FrequencySpec,
    ) -> Result<Option<BreakKind>, TradeTimeError> {
        let table = self.table(freq)?;
        if self.is_trading_day(day)? {
            return Ok(None);
        }
        let past = self.nearest_trading_day(day, Direction::Past).ok();
        let future = self.nearest_trading_day(day, Direction::Future).ok();
        let kind = match (past, future) {
            (Some(past), Some(future)) if table.locate(&past) == table.locate(&future) => {
                BreakKind::Internal
            }
            _ => BreakKind::External,
        };
        Ok(Some(kind))
    }

    fn out_of_range(day: NaiveDate, freq: FrequencySpec) -> TradeTimeError {
        TradeTimeError::OutOfRange {
            value: day.to_string(),
            frequency: freq.to_string(),
        }
    }

    /// Index of the `freq` bar `day` resolves to.
    ///
    /// Trading days map to their enclosing bar. An internal break starts from
    /// the bar of the nearest past trading day and steps one bar back
    /// (`Past`) or forward (`Future`). An external break takes the nearest
    /// trading day on the requested side and fails without a direction.
    fn resolve_index(
        &self,
        day: NaiveDate,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<usize, TradeTimeError> {
        let table = self.table(freq)?;
        match self.classify_break(day, freq)? {
            None => Ok(table.locate(&day)),
            Some(BreakKind::Internal) => {
                let base = table.locate(&self.nearest_trading_day(day, Direction::Past)?);
                let step = match if_break {
                    None => return Ok(base),
                    Some(Direction::Past) => -1,
                    Some(Direction::Future) => 1,
                };
                table
                    .shift_with(base, step, self.state()?.options.shift_mode)
                    .ok_or_else(|| Self::out_of_range(day, freq))
            }
            Some(BreakKind::External) => {
                let direction = if_break.ok_or_else(|| TradeTimeError::AmbiguousBreak {
                    value: day.to_string(),
                })?;
                Ok(table.locate(&self.nearest_trading_day(day, direction)?))
            }
        }
    }

    pub fn resolve_close(
        &self,
        day: NaiveDate,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<NaiveDate, TradeTimeError> {
        let i = self.resolve_index(day, freq, if_break)?;
        Ok(self.table(freq)?.at(i as i64).1)
    }

    pub fn resolve_open(
        &self,
        day: NaiveDate,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<NaiveDate, TradeTimeError> {
        let i = self.resolve_index(day, freq, if_break)?;
        Ok(self.table(freq)?.at(i as i64).0)
    }

    /// `(open, close)` of the bar `day` resolves to.
    pub fn resolve_range(
        &self,
        day: NaiveDate,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<(NaiveDate, NaiveDate), TradeTimeError> {
        let i = self.resolve_index(day, freq, if_break)?;
        Ok(self.table(freq)?.at(i as i64))
    }

    /// Closes (or opens) of the `freq` bars from the one `start` resolves to
    /// through the last one ending by `end`.
    ///
    /// `start` resolves directionless inside an internal break and toward the
    /// future otherwise; `end` resolves toward the past. Without `overflow`
    /// a final bar still open after `end` is dropped. A window that resolves
    /// to nothing, or lies beyond the known range, yields an empty list.
    pub fn bars_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        freq: FrequencySpec,
        include_open: bool,
        overflow: bool,
    ) -> Result<Vec<NaiveDate>, TradeTimeError> {
        let table = self.table(freq)?;

        let start_hint = match self.classify_break(start, freq)? {
            Some(BreakKind::Internal) => None,
            _ => Some(Direction::Future),
        };
        let start_id = match self.resolve_index(start, freq, start_hint) {
            Ok(i) => i,
            Err(TradeTimeError::OutOfRange { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut end_id = match self.resolve_index(end, freq, Some(Direction::Past)) {
            Ok(i) => i,
            Err(TradeTimeError::OutOfRange { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        if table.at(end_id as i64).1 > end && !overflow {
            match end_id.checked_sub(1) {
                Some(i) => end_id = i,
                None => return Ok(Vec::new()),
            }
        }
        Ok(table.slice(start_id, end_id, include_open))
    }

    /// Index of the bar closing exactly on `day`.
    pub fn index_of(&self, day: NaiveDate, freq: FrequencySpec) -> Result<usize, TradeTimeError> {
        self.table(freq)?
            .position(&day)
            .ok_or_else(|| TradeTimeError::NotInFrequency {
                value: day.to_string(),
                frequency: freq.to_string(),
            })
    }

    /// Close of the bar `bars` steps from the bar closing on `day`, under the
    /// configured shift mode.
    pub fn shift(&self, day: NaiveDate, freq: FrequencySpec, bars: i64) -> Result<NaiveDate, TradeTimeError> {
        let table = self.table(freq)?;
        let i = self.index_of(day, freq)?;
        let target = table
            .shift_with(i, bars, self.state()?.options.shift_mode)
            .ok_or_else(|| Self::out_of_range(day, freq))?;
        Ok(table.at(target as i64).1)
    }

    pub fn is_open(&self, day: NaiveDate, freq: FrequencySpec) -> Result<bool, TradeTimeError> {
        Ok(self.table(freq)?.opens().binary_search(&day).is_ok())
    }

    pub fn is_close(&self, day: NaiveDate, freq: FrequencySpec) -> Result<bool, TradeTimeError> {
        Ok(self.table(freq)?.contains(&day))
    }

    /// Last trading day on or before the final calendar day of the period.
    pub fn period_close(&self, year: i32, period: Period) -> Result<NaiveDate, TradeTimeError> {
        let month = period.last_month()?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let month_end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .ok_or_else(|| TradeTimeError::InvalidFormat {
                value: format!("{year}-{month:02}"),
                reason: "date out of supported range".into(),
            })?;
        self.nearest_trading_day(month_end, Direction::Past)
    }

    /// Open of the month or quarter bar that [`period_close`](Self::period_close) lands in.
    pub fn period_open(&self, year: i32, period: Period) -> Result<NaiveDate, TradeTimeError> {
        let close = self.period_close(year, period)?;
        self.resolve_open(close, period.frequency(), None)
    }

    /// Quarter bars between `start` and `end`, rendered through `format`
    /// with `(y)` replaced by the year and `(q)` by the quarter number.
    pub fn quarter_labels(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        format: Option<&str>,
    ) -> Result<Vec<String>, TradeTimeError> {
        let format = format.unwrap_or(DEFAULT_QUARTER_FORMAT);
        Ok(self
            .bars_between(start, end, FrequencySpec::QUARTER, false, false)?
            .into_iter()
            .map(|close| {
                format
                    .replace("(y)", &close.year().to_string())
                    .replace("(q)", &((close.month() - 1) / 3 + 1).to_string())
            })
            .collect())
    }

    /// Close of the `freq` bar today belongs to.
    pub fn current(
        &self,
        clock: &dyn ClockPort,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<NaiveDate, TradeTimeError> {
        self.resolve_close(clock.today(), freq, if_break)
    }

    pub fn future(&self, clock: &dyn ClockPort, freq: FrequencySpec, bars: i64) -> Result<NaiveDate, TradeTimeError> {
        let current = self.current(clock, freq, None)?;
        self.shift(current, freq, bars)
    }

    pub fn previous(&self, clock: &dyn ClockPort, freq: FrequencySpec, bars: i64) -> Result<NaiveDate, TradeTimeError> {
        self.future(clock, freq, bars.saturating_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Weekdays of Jan-Feb 2024, minus New Year's Day.
    fn ctx() -> CalendarContext {
        let days: Vec<NaiveDate> = d(2024, 1, 2)
            .iter_days()
            .take_while(|day| *day <= d(2024, 2, 29))
            .filter(|day| day.weekday().num_days_from_monday() < 5)
            .collect();
        CalendarContext::configured(&days, CalendarOptions::default()).unwrap()
    }

    #[test]
    fn queries_before_configure_fail() {
        let ctx = CalendarContext::new();
        assert!(!ctx.is_configured());
        assert!(matches!(
            ctx.is_trading_day(d(2024, 1, 2)),
            Err(TradeTimeError::NotConfigured { registry: "calendar" })
        ));
    }

    #[test]
    fn second_configure_is_a_no_op() {
        let ctx = ctx();
        let other = [d(2030, 1, 2)];
        assert!(!ctx.configure(&other, CalendarOptions::default()).unwrap());
        assert_eq!(ctx.first_day().unwrap(), d(2024, 1, 2));
    }

    #[test]
    fn reset_then_reconfigure() {
        let mut ctx = ctx();
        ctx.reset();
        assert!(!ctx.is_configured());
        assert!(ctx.configure(&[d(2030, 1, 2)], CalendarOptions::default()).unwrap());
        assert_eq!(ctx.last_day().unwrap(), d(2030, 1, 2));
    }

    #[test]
    fn unsorted_input_is_normalized() {
        let days = [d(2024, 1, 3), d(2024, 1, 2), d(2024, 1, 3)];
        let ctx = CalendarContext::configured(&days, CalendarOptions::default()).unwrap();
        assert_eq!(ctx.table(FrequencySpec::DAY).unwrap().len(), 2);
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = CalendarContext::configured(&[], CalendarOptions::default()).unwrap_err();
        assert!(matches!(err, TradeTimeError::MalformedTable { .. }));
    }

    #[test]
    fn intraday_default_frequency_is_rejected() {
        let options = CalendarOptions {
            default_frequency: FrequencySpec::FIVE_MINUTES,
            ..CalendarOptions::default()
        };
        assert!(CalendarContext::configured(&[d(2024, 1, 2)], options).is_err());
    }

    #[test]
    fn intraday_table_lookup_is_rejected() {
        let ctx = ctx();
        assert!(matches!(
            ctx.table(FrequencySpec::ONE_HOUR),
            Err(TradeTimeError::InvalidFrequency { .. })
        ));
    }

    #[test]
    fn nearest_trading_day_walks_to_either_side() {
        let ctx = ctx();
        let saturday = d(2024, 1, 6);
        assert_eq!(ctx.nearest_trading_day(saturday, Direction::Past).unwrap(), d(2024, 1, 5));
        assert_eq!(ctx.nearest_trading_day(saturday, Direction::Future).unwrap(), d(2024, 1, 8));
        assert!(ctx.nearest_trading_day(d(2024, 1, 1), Direction::Past).is_err());
        assert!(ctx.nearest_trading_day(d(2024, 3, 2), Direction::Future).is_err());
    }

    #[test]
    fn weekend_break_kind_depends_on_frequency() {
        let ctx = ctx();
        let saturday = d(2024, 1, 13);
        assert_eq!(ctx.classify_break(saturday, FrequencySpec::MONTH).unwrap(), Some(BreakKind::Internal));
        assert_eq!(ctx.classify_break(saturday, FrequencySpec::DAY).unwrap(), Some(BreakKind::External));
        assert_eq!(ctx.classify_break(saturday, FrequencySpec::WEEK).unwrap(), Some(BreakKind::External));
        assert_eq!(ctx.classify_break(d(2024, 1, 12), FrequencySpec::DAY).unwrap(), None);
    }

    #[test]
    fn days_outside_the_range_are_external() {
        let ctx = ctx();
        assert_eq!(
            ctx.classify_break(d(2024, 1, 1), FrequencySpec::YEAR).unwrap(),
            Some(BreakKind::External)
        );
    }

    #[test]
    fn resolve_close_on_weekends() {
        let ctx = ctx();
        let saturday = d(2024, 1, 13);
        assert_eq!(
            ctx.resolve_close(saturday, FrequencySpec::DAY, Some(Direction::Past)).unwrap(),
            d(2024, 1, 12)
        );
        assert_eq!(
            ctx.resolve_close(saturday, FrequencySpec::DAY, Some(Direction::Future)).unwrap(),
            d(2024, 1, 15)
        );
        assert!(matches!(
            ctx.resolve_close(saturday, FrequencySpec::DAY, None),
            Err(TradeTimeError::AmbiguousBreak { .. })
        ));
        assert_eq!(ctx.resolve_close(saturday, FrequencySpec::MONTH, None).unwrap(), d(2024, 1, 31));
        assert_eq!(
            ctx.resolve_close(saturday, FrequencySpec::MONTH, Some(Direction::Future)).unwrap(),
            d(2024, 2, 29)
        );
    }

    #[test]
    fn resolve_open_and_range() {
        let ctx = ctx();
        assert_eq!(ctx.resolve_open(d(2024, 1, 17), FrequencySpec::WEEK, None).unwrap(), d(2024, 1, 15));
        assert_eq!(
            ctx.resolve_range(d(2024, 2, 14), FrequencySpec::MONTH, None).unwrap(),
            (d(2024, 2, 1), d(2024, 2, 29))
        );
    }

    #[test]
    fn strict_mode_reports_internal_step_past_the_table() {
        let days = [d(2024, 1, 5), d(2024, 1, 8)];
        let options = CalendarOptions {
            shift_mode: ShiftMode::Strict,
            ..CalendarOptions::default()
        };
        let ctx = CalendarContext::configured(&days, options).unwrap();
        assert!(matches!(
            ctx.resolve_close(d(2024, 1, 6), FrequencySpec::MONTH, Some(Direction::Past)),
            Err(TradeTimeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn bars_between_trims_unfinished_bar() {
        let ctx = ctx();
        let weeks = ctx
            .bars_between(d(2024, 1, 6), d(2024, 1, 24), FrequencySpec::WEEK, false, false)
            .unwrap();
        assert_eq!(weeks, vec![d(2024, 1, 12), d(2024, 1, 19)]);

        let with_overflow = ctx
            .bars_between(d(2024, 1, 6), d(2024, 1, 24), FrequencySpec::WEEK, false, true)
            .unwrap();
        assert_eq!(with_overflow.last(), Some(&d(2024, 1, 26)));

        let opens = ctx
            .bars_between(d(2024, 1, 6), d(2024, 1, 24), FrequencySpec::WEEK, true, false)
            .unwrap();
        assert_eq!(opens, vec![d(2024, 1, 8), d(2024, 1, 15)]);
    }

    #[test]
    fn bars_between_outside_range_is_empty() {
        let ctx = ctx();
        assert!(ctx
            .bars_between(d(2023, 1, 1), d(2023, 6, 1), FrequencySpec::DAY, false, false)
            .unwrap()
            .is_empty());
        assert!(ctx
            .bars_between(d(2024, 5, 1), d(2024, 6, 1), FrequencySpec::DAY, false, false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn shift_wraps_by_default() {
        let ctx = ctx();
        assert_eq!(ctx.shift(d(2024, 1, 5), FrequencySpec::DAY, 1).unwrap(), d(2024, 1, 8));
        assert_eq!(ctx.shift(d(2024, 2, 29), FrequencySpec::DAY, 1).unwrap(), d(2024, 1, 2));
        assert!(matches!(
            ctx.shift(d(2024, 1, 6), FrequencySpec::DAY, 1),
            Err(TradeTimeError::NotInFrequency { .. })
        ));
    }

    #[test]
    fn opens_and_closes() {
        let ctx = ctx();
        assert!(ctx.is_open(d(2024, 1, 2), FrequencySpec::MONTH).unwrap());
        assert!(!ctx.is_close(d(2024, 1, 2), FrequencySpec::MONTH).unwrap());
        assert!(ctx.is_close(d(2024, 1, 31), FrequencySpec::MONTH).unwrap());
    }

    #[test]
    fn period_boundaries() {
        let ctx = ctx();
        assert_eq!(ctx.period_close(2024, Period::Month(1)).unwrap(), d(2024, 1, 31));
        assert_eq!(ctx.period_close(2024, Period::Month(2)).unwrap(), d(2024, 2, 29));
        assert_eq!(ctx.period_close(2024, Period::Quarter(1)).unwrap(), d(2024, 2, 29));
        assert_eq!(ctx.period_open(2024, Period::Month(2)).unwrap(), d(2024, 2, 1));
        assert!(matches!(
            ctx.period_close(2024, Period::Quarter(5)),
            Err(TradeTimeError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn quarter_labels_use_the_format() {
        let ctx = ctx();
        let labels = ctx.quarter_labels(d(2024, 1, 1), d(2024, 12, 31), None).unwrap();
        assert_eq!(labels, vec!["2024Q1".to_string()]);
        let custom = ctx
            .quarter_labels(d(2024, 1, 1), d(2024, 12, 31), Some("Q(q)/(y)"))
            .unwrap();
        assert_eq!(custom, vec!["Q1/2024".to_string()]);
    }
}
