//! Frequency-tagged trading time of day.

use crate::domain::bar_delta::BarDelta;
use crate::domain::breaks::Direction;
use crate::domain::convert::TimeInput;
use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use crate::domain::session::SessionContext;
use crate::domain::trading_date::Validation;
use crate::ports::clock_port::ClockPort;
use chrono::{Duration, NaiveTime, Timelike};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Right-hand operand of time arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOffset {
    /// Bars of the time's own frequency.
    Bars(i64),
    /// Only `time_bars` is used.
    Delta(BarDelta),
    /// Wall-clock span; wraps around midnight and is not validated.
    Span(Duration),
}

/// A time of day tagged with an intraday frequency.
///
/// Equality, ordering and hashing look at the time only.
#[derive(Debug, Clone, Copy)]
pub struct TradingTime {
    time: NaiveTime,
    frequency: FrequencySpec,
}

fn frequency_or_default(
    ctx: &SessionContext,
    freq: Option<FrequencySpec>,
) -> Result<FrequencySpec, TradeTimeError> {
    match freq {
        Some(freq) => Ok(freq),
        None => ctx.default_frequency(),
    }
}

impl TradingTime {
    /// A time that must close a bar of `freq` (the registry default when
    /// `None`).
    pub fn new(
        ctx: &SessionContext,
        time: NaiveTime,
        freq: Option<FrequencySpec>,
    ) -> Result<Self, TradeTimeError> {
        let frequency = frequency_or_default(ctx, freq)?;
        let value = Self::permissive(time, frequency);
        value.validate(ctx)?;
        Ok(value)
    }

    pub fn from_hms(
        ctx: &SessionContext,
        hour: u32,
        minute: u32,
        second: u32,
        freq: Option<FrequencySpec>,
    ) -> Result<Self, TradeTimeError> {
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            TradeTimeError::InvalidFormat {
                value: format!("{hour}:{minute}:{second}"),
                reason: "no such time of day".into(),
            }
        })?;
        Self::new(ctx, time, freq)
    }

    /// Skips membership validation. Sub-second precision is dropped.
    pub fn permissive(time: NaiveTime, frequency: FrequencySpec) -> Self {
        Self {
            time: time.with_nanosecond(0).unwrap_or(time),
            frequency,
        }
    }

    pub fn from_input(
        ctx: &SessionContext,
        input: TimeInput<'_>,
        clock: &dyn ClockPort,
        freq: Option<FrequencySpec>,
        validation: Validation,
    ) -> Result<Self, TradeTimeError> {
        let time = input.to_time(clock)?;
        let value = Self::permissive(time, frequency_or_default(ctx, freq)?);
        if validation == Validation::Strict {
            value.validate(ctx)?;
        }
        Ok(value)
    }

    fn validate(&self, ctx: &SessionContext) -> Result<(), TradeTimeError> {
        if self.is_valid(ctx)? {
            Ok(())
        } else {
            Err(TradeTimeError::NotInFrequency {
                value: self.to_string(),
                frequency: self.frequency.to_string(),
            })
        }
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    pub fn second(&self) -> u32 {
        self.time.second()
    }

    pub fn frequency(&self) -> FrequencySpec {
        self.frequency
    }

    pub fn with_frequency(&self, frequency: FrequencySpec) -> Self {
        Self::permissive(self.time, frequency)
    }

    fn with_time(&self, time: NaiveTime) -> Self {
        Self::permissive(time, self.frequency)
    }

    pub fn is_valid(&self, ctx: &SessionContext) -> Result<bool, TradeTimeError> {
        Ok(ctx.table(self.frequency)?.contains(&self.time))
    }

    pub fn index(&self, ctx: &SessionContext) -> Result<usize, TradeTimeError> {
        ctx.index_of(self.time, self.frequency)
    }

    pub fn close(&self, ctx: &SessionContext, if_break: Option<Direction>) -> Result<Self, TradeTimeError> {
        Ok(self.with_time(ctx.resolve_close(self.time, self.frequency, if_break)?))
    }

    pub fn open(&self, ctx: &SessionContext, if_break: Option<Direction>) -> Result<Self, TradeTimeError> {
        Ok(self.with_time(ctx.resolve_open(self.time, self.frequency, if_break)?))
    }

    pub fn range(
        &self,
        ctx: &SessionContext,
        if_break: Option<Direction>,
    ) -> Result<(Self, Self), TradeTimeError> {
        let (open, close) = ctx.resolve_range(self.time, self.frequency, if_break)?;
        Ok((self.with_time(open), self.with_time(close)))
    }

    pub fn nearest(&self, ctx: &SessionContext, direction: Direction) -> Result<Self, TradeTimeError> {
        Ok(self.with_time(ctx.nearest_trading_instant(self.time, direction)?))
    }

    pub fn add_bars(&self, ctx: &SessionContext, bars: i64) -> Result<Self, TradeTimeError> {
        Ok(self.with_time(ctx.shift(self.time, self.frequency, bars)?))
    }

    pub fn subtract_bars(&self, ctx: &SessionContext, bars: i64) -> Result<Self, TradeTimeError> {
        self.add_bars(ctx, bars.saturating_neg())
    }

    pub fn add_delta(&self, ctx: &SessionContext, delta: &BarDelta) -> Result<Self, TradeTimeError> {
        self.add_bars(ctx, delta.time_bars())
    }

    pub fn subtract_delta(&self, ctx: &SessionContext, delta: &BarDelta) -> Result<Self, TradeTimeError> {
        self.add_bars(ctx, delta.time_bars().saturating_neg())
    }

    /// Wall-clock arithmetic wrapping around midnight, re-validated only
    /// under [`Validation::Strict`].
    pub fn add_duration(
        &self,
        ctx: &SessionContext,
        span: Duration,
        validation: Validation,
    ) -> Result<Self, TradeTimeError> {
        let (time, _) = self.time.overflowing_add_signed(span);
        let value = self.with_time(time);
        if validation == Validation::Strict {
            value.validate(ctx)?;
        }
        Ok(value)
    }

    pub fn subtract_duration(
        &self,
        ctx: &SessionContext,
        span: Duration,
        validation: Validation,
    ) -> Result<Self, TradeTimeError> {
        let (time, _) = self.time.overflowing_sub_signed(span);
        let value = self.with_time(time);
        if validation == Validation::Strict {
            value.validate(ctx)?;
        }
        Ok(value)
    }

    /// Signed bar distance `self - other` as `time_bars`.
    pub fn difference(&self, ctx: &SessionContext, other: &Self) -> Result<BarDelta, TradeTimeError> {
        if self.frequency != other.frequency {
            return Err(TradeTimeError::IncompatibleFrequency {
                left: self.frequency.to_string(),
                right: other.frequency.to_string(),
            });
        }
        let bars = self.index(ctx)? as i64 - other.index(ctx)? as i64;
        Ok(BarDelta::times(bars))
    }

    pub fn add(&self, ctx: &SessionContext, offset: TimeOffset) -> Result<Self, TradeTimeError> {
        match offset {
            TimeOffset::Bars(bars) => self.add_bars(ctx, bars),
            TimeOffset::Delta(delta) => self.add_delta(ctx, &delta),
            TimeOffset::Span(span) => self.add_duration(ctx, span, Validation::Permissive),
        }
    }

    pub fn subtract(&self, ctx: &SessionContext, offset: TimeOffset) -> Result<Self, TradeTimeError> {
        match offset {
            TimeOffset::Bars(bars) => self.subtract_bars(ctx, bars),
            TimeOffset::Delta(delta) => self.subtract_delta(ctx, &delta),
            TimeOffset::Span(span) => self.subtract_duration(ctx, span, Validation::Permissive),
        }
    }

    /// Bars of `freq` (registry default when `None`) between two times, see
    /// [`SessionContext::bars_between`].
    pub fn bars_between(
        ctx: &SessionContext,
        start: NaiveTime,
        end: NaiveTime,
        freq: Option<FrequencySpec>,
        include_open: bool,
        overflow: bool,
    ) -> Result<Vec<Self>, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(ctx
            .bars_between(start, end, freq, include_open, overflow)?
            .into_iter()
            .map(|time| Self::permissive(time, freq))
            .collect())
    }

    /// `None` once the session has closed.
    pub fn current(
        ctx: &SessionContext,
        clock: &dyn ClockPort,
        freq: Option<FrequencySpec>,
    ) -> Result<Option<Self>, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(ctx.current(clock, freq)?.map(|time| Self::permissive(time, freq)))
    }

    pub fn future(
        ctx: &SessionContext,
        clock: &dyn ClockPort,
        bars: i64,
        freq: Option<FrequencySpec>,
    ) -> Result<Option<Self>, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(ctx
            .future(clock, freq, bars)?
            .map(|time| Self::permissive(time, freq)))
    }

    pub fn previous(
        ctx: &SessionContext,
        clock: &dyn ClockPort,
        bars: i64,
        freq: Option<FrequencySpec>,
    ) -> Result<Option<Self>, TradeTimeError> {
        let freq = frequency_or_default(ctx, freq)?;
        Ok(ctx
            .previous(clock, freq, bars)?
            .map(|time| Self::permissive(time, freq)))
    }
}

impl PartialEq for TradingTime {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl Eq for TradingTime {}

impl PartialOrd for TradingTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TradingTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
    }
}

impl Hash for TradingTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.time.hash(state);
    }
}

impl PartialEq<NaiveTime> for TradingTime {
    fn eq(&self, other: &NaiveTime) -> bool {
        self.time == *other
    }
}

impl fmt::Display for TradingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M:%S"))
    }
}
