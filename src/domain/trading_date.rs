//! Frequency-tagged trading date.

use crate::domain::bar_delta::BarDelta;
use crate::domain::breaks::Direction;
use crate::domain::calendar::CalendarContext;
use crate::domain::convert::DateInput;
use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use crate::ports::clock_port::ClockPort;
use chrono::{Datelike, Duration, NaiveDate};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Whether a constructed value must be a bar close of its frequency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    #[default]
    Strict,
    Permissive,
}

/// Right-hand operand of date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOffset {
    /// Bars of the date's own frequency.
    Bars(i64),
    Delta(BarDelta),
    /// Plain calendar days; the result is not validated.
    Days(i64),
}

/// A calendar date tagged with a date frequency.
///
/// Equality, ordering and hashing look at the date only.
#[derive(Debug, Clone, Copy)]
pub struct TradingDate {
    date: NaiveDate,
    frequency: FrequencySpec,
}

fn frequency_or_default(
    ctx: &CalendarContext,
    freq: Option<FrequencySpec>,
) -> Result<FrequencySpec, TradeTimeError> {
    match freq {
        Some(freq) => Ok(freq),
        None => ctx.default_frequency(),
    }
}

impl TradingDate {
    /// A date that must close a bar of `freq` (the registry default when
    /// `None`).
    pub fn new(
        ctx: &CalendarContext,
        date: NaiveDate,
        freq: Option<FrequencySpec>,
    ) -> Result<Self, TradeTimeError> {
        let frequency = frequency_or_default(ctx, freq)?;
        let value = Self { date, frequency };
        value.validate(ctx)?;
        Ok(value)
    }

    pub fn from_ymd(
        ctx: &CalendarContext,
        year: i32,
        month: u32,
        day: u32,
        freq: Option<FrequencySpec>,
    ) -> Result<Self, TradeTimeError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            TradeTimeError::InvalidFormat {
                value: format!("{year}-{month}-{day}"),
                reason: "no such calendar date".into(),
            }
        })?;
        Self::new(ctx, date, freq)
    }

    /// Skips membership validation.
    pub fn permissive(date: NaiveDate, frequency: FrequencySpec) -> Self {
        Self { date, frequency }
    }

    pub fn from_input(
        ctx: &CalendarContext,
        input: DateInput<'_>,
        clock: &dyn ClockPort,
        freq: Option<FrequencySpec>,
        validation: Validation,
    ) -> Result<Self, TradeTimeError> {
        let date = input.to_date(clock)?;
        let frequency = frequency_or_default(ctx, freq)?;
        let value = Self { date, frequency };
        if validation == Validation::Strict {
            value.validate(ctx)?;
        }
        Ok(value)
    }

    fn validate(&self, ctx: &CalendarContext) -> Result<(), TradeTimeError> {
        if self.is_valid(ctx)? {
            Ok(())
        } else {
            Err(TradeTimeError::NotInFrequency {
                value: self.to_string(),
                frequency: self.frequency.to_string(),
            })
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn quarter(&self) -> u32 {
        (self.date.month() - 1) / 3 + 1
    }

    pub fn frequency(&self) -> FrequencySpec {
        self.frequency
    }

    /// Same date, retagged without validation.
    pub fn with_frequency(&self, frequency: FrequencySpec) -> Self {
        Self::permissive(self.date, frequency)
    }

    /// Whether the date closes a bar of its own frequency.
    pub fn is_valid(&self, ctx: &CalendarContext) -> Result<bool, TradeTimeError> {
        ctx.is_close(self.date, self.frequency)
    }

    pub fn index(&self, ctx: &CalendarContext) -> Result<usize, TradeTimeError> {
        ctx.index_of(self.date, self.frequency)
    }

    /// Close of the enclosing bar of `freq` (own frequency when `None`).
    pub fn close(
        &self,
        ctx: &CalendarContext,
        freq: Option<FrequencySpec>,
        if_break: Option<Direction>,
    ) -> Result<Self, TradeTimeError> {
        let freq = freq.unwrap_or(self.frequency);
        Ok(Self::permissive(ctx.resolve_close(self.date, freq, if_break)?, freq))
    }

    pub fn open(
        &self,
        ctx: &CalendarContext,
        freq: Option<FrequencySpec>,
        if_break: Option<Direction>,
    ) -> Result<Self, TradeTimeError> {
        let freq = freq.unwrap_or(self.frequency);
        Ok(Self::permissive(ctx.resolve_open(self.date, freq, if_break)?, freq))
    }

    pub fn range(
        &self,
        ctx: &CalendarContext,
        freq: Option<FrequencySpec>,
        if_break: Option<Direction>,
    ) -> Result<(Self, Self), TradeTimeError> {
        let freq = freq.unwrap_or(self.frequency);
        let (open, close) = ctx.resolve_range(self.date, freq, if_break)?;
        Ok((Self::permissive(open, freq), Self::permissive(close, freq)))
    }

    pub fn is_open(&self, ctx: &CalendarContext, freq: Option<FrequencySpec>) -> Result<bool, TradeTimeError> {
        ctx.is_open(self.date, freq.unwrap_or(self.frequency))
    }

    pub fn is_close(&self, ctx: &CalendarContext, freq: Option<FrequencySpec>) -> Result<bool, TradeTimeError> {
        ctx.is_close(self.date, freq.unwrap_or(self.frequency))
    }

    /// Itself on a trading day, otherwise the nearest trading day toward
    /// `direction`.
    pub fn nearest(&self, ctx: &CalendarContext, direction: Direction) -> Result<Self, TradeTimeError> {
        Ok(self.with_date(ctx.nearest_trading_day(self.date, direction)?))
    }

    fn with_date(&self, date: NaiveDate) -> Self {
        Self::permissive(date, self.frequency)
    }

    pub fn add_bars(&self, ctx: &CalendarContext, bars: i64) -> Result<Self, TradeTimeError> {
        Ok(self.with_date(ctx.shift(self.date, self.frequency, bars)?))
    }

    pub fn subtract_bars(&self, ctx: &CalendarContext, bars: i64) -> Result<Self, TradeTimeError> {
        self.add_bars(ctx, bars.saturating_neg())
    }

    /// Shifts by `delta.date_bars()` in the delta's own date frequency; the
    /// result carries that frequency.
    pub fn add_delta(&self, ctx: &CalendarContext, delta: &BarDelta) -> Result<Self, TradeTimeError> {
        let freq = delta.date_frequency();
        Ok(Self::permissive(ctx.shift(self.date, freq, delta.date_bars())?, freq))
    }

    pub fn subtract_delta(&self, ctx: &CalendarContext, delta: &BarDelta) -> Result<Self, TradeTimeError> {
        self.add_delta(ctx, &delta.negate())
    }

    /// Ordinary calendar-day arithmetic, re-validated only under
    /// [`Validation::Strict`].
    pub fn add_days(
        &self,
        ctx: &CalendarContext,
        days: i64,
        validation: Validation,
    ) -> Result<Self, TradeTimeError> {
        let date = Duration::try_days(days)
            .and_then(|span| self.date.checked_add_signed(span))
            .ok_or_else(|| TradeTimeError::OutOfRange {
                value: format!("{} {days:+} days", self.date),
                frequency: self.frequency.to_string(),
            })?;
        let value = self.with_date(date);
        if validation == Validation::Strict {
            value.validate(ctx)?;
        }
        Ok(value)
    }

    pub fn subtract_days(
        &self,
        ctx: &CalendarContext,
        days: i64,
        validation: Validation,
    ) -> Result<Self, TradeTimeError> {
        self.add_days(ctx, days.saturating_neg(), validation)
    }

    /// Signed bar distance `self - other`; both must share a frequency.
    pub fn difference(&self, ctx: &CalendarContext, other: &Self) -> Result<BarDelta, TradeTimeError> {
        if self.frequency != other.frequency {
            return Err(TradeTimeError::IncompatibleFrequency {
                left: self.frequency.to_string(),
                right: other.frequency.to_string(),
            });
        }
        let bars = self.index(ctx)? as i64 - other.index(ctx)? as i64;
        Ok(BarDelta::dates(bars, self.frequency))
    }

    fn apply(&self, ctx: &CalendarContext, offset: DateOffset, sign: i64) -> Result<Self, TradeTimeError> {
        match offset {
            DateOffset::Bars(bars) => self.add_bars(ctx, bars.saturating_mul(sign)),
            DateOffset::Delta(delta) if sign < 0 => self.subtract_delta(ctx, &delta),
            DateOffset::Delta(delta) => self.add_delta(ctx, &delta),
            DateOffset::Days(days) => self.add_days(ctx, days.saturating_mul(sign), Validation::Permissive),
        }
    }

    pub fn add(&self, ctx: &CalendarContext, offset: DateOffset) -> Result<Self, TradeTimeError> {
        self.apply(ctx, offset, 1)
    }

    pub fn subtract(&self, ctx: &CalendarContext, offset: DateOffset) -> Result<Self, TradeTimeError> {
        self.apply(ctx, offset, -1)
    }

    fn ensure_reverse_allowed(ctx: &CalendarContext) -> Result<(), TradeTimeError> {
        if ctx.options()?.allow_reverse_arithmetic {
            Ok(())
        } else {
            Err(TradeTimeError::DisabledReverseArithmetic)
        }
    }

    /// `offset + self`; needs `allow_reverse_arithmetic`.
    pub fn reverse_add(&self, ctx: &CalendarContext, offset: DateOffset) -> Result<Self, TradeTimeError> {
        Self::ensure_reverse_allowed(ctx)?;
        self.add(ctx, offset)
    }

    /// `offset - self`, evaluated as `self - offset`; needs
    /// `allow_reverse_arithmetic`.
    pub fn reverse_subtract(&self, ctx: &CalendarContext, offset: DateOffset) -> Result<Self, TradeTimeError> {
        Self::ensure_reverse_allowed(ctx)?;
        self.subtract(ctx, offset)
    }

    /// Bars of `freq` (registry default when `None`) between two dates, see
    /// [`CalendarContext::bars_between`].
    pub fn bars_between(
        ctx: &CalendarContext,
        start: NaiveDate,
        end: NaiveDate,
        freq: Option<FrequencySpec>,
        include_open: bool,
        overflow: bool,
    ) -> Result<Vec<Self>, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(ctx
            .bars_between(start, end, freq, include_open, overflow)?
            .into_iter()
            .map(|date| Self::permissive(date, freq))
            .collect())
    }

    pub fn current(
        ctx: &CalendarContext,
        clock: &dyn ClockPort,
        freq: Option<FrequencySpec>,
        if_break: Option<Direction>,
    ) -> Result<Self, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(Self::permissive(ctx.current(clock, freq, if_break)?, freq))
    }

    pub fn future(
        ctx: &CalendarContext,
        clock: &dyn ClockPort,
        bars: i64,
        freq: Option<FrequencySpec>,
    ) -> Result<Self, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(Self::permissive(ctx.future(clock, freq, bars)?, freq))
    }

    pub fn previous(
        ctx: &CalendarContext,
        clock: &dyn ClockPort,
        bars: i64,
        freq: Option<FrequencySpec>,
    ) -> Result<Self, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(Self::permissive(ctx.previous(clock, freq, bars)?, freq))
    }
}

impl PartialEq for TradingDate {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for TradingDate {}

impl PartialOrd for TradingDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TradingDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl Hash for TradingDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
    }
}

impl PartialEq<NaiveDate> for TradingDate {
    fn eq(&self, other: &NaiveDate) -> bool {
        self.date == *other
    }
}

impl fmt::Display for TradingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}
