//! Session registry: one intraday bar table per bar width.
//!
//! Tables cover a single trading day built from two fixed half-sessions.
//! The lunch break is an internal break; before the open and after the close
//! are external breaks.

use crate::domain::bar_table::{OrderedBarTable, ShiftMode};
use crate::domain::breaks::{BreakKind, Direction};
use crate::domain::convert::whole_seconds;
use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use crate::domain::registry::InitOnce;
use crate::domain::resample;
use crate::ports::clock_port::ClockPort;
use chrono::NaiveTime;
use std::collections::BTreeMap;
use tracing::{debug, info};

const REGISTRY: &str = "session";

/// Where an instant sits relative to the trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketPhase {
    BeforeMarket,
    Morning,
    LunchBreak,
    Afternoon,
    AfterMarket,
}

impl MarketPhase {
    pub fn is_trading(self) -> bool {
        matches!(self, Self::Morning | Self::Afternoon)
    }

    pub fn break_kind(self) -> Option<BreakKind> {
        match self {
            Self::Morning | Self::Afternoon => None,
            Self::LunchBreak => Some(BreakKind::Internal),
            Self::BeforeMarket | Self::AfterMarket => Some(BreakKind::External),
        }
    }
}

/// Opening and closing instants of the two half-sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHours {
    pub morning_open: NaiveTime,
    pub morning_close: NaiveTime,
    pub afternoon_open: NaiveTime,
    pub afternoon_close: NaiveTime,
}

impl Default for SessionHours {
    fn default() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
        Self {
            morning_open: hm(9, 30),
            morning_close: hm(11, 30),
            afternoon_open: hm(13, 0),
            afternoon_close: hm(15, 0),
        }
    }
}

impl SessionHours {
    /// Session boundaries count as trading.
    pub fn phase(&self, time: NaiveTime) -> MarketPhase {
        if time < self.morning_open {
            MarketPhase::BeforeMarket
        } else if time <= self.morning_close {
            MarketPhase::Morning
        } else if time < self.afternoon_open {
            MarketPhase::LunchBreak
        } else if time <= self.afternoon_close {
            MarketPhase::Afternoon
        } else {
            MarketPhase::AfterMarket
        }
    }

    pub fn is_trading(&self, time: NaiveTime) -> bool {
        self.phase(time).is_trading()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub default_frequency: FrequencySpec,
    /// Keeps the 09:30 auction instant as a bar of its own in the one-minute
    /// table (241 bars instead of 240).
    pub include_opening_auction: bool,
    pub shift_mode: ShiftMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_frequency: FrequencySpec::ONE_MINUTE,
            include_opening_auction: true,
            shift_mode: ShiftMode::Wrap,
        }
    }
}

/// Bar closes at the edges of the trading day and of each half-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEndpoints {
    pub first: NaiveTime,
    pub last: NaiveTime,
    pub morning_first: NaiveTime,
    pub morning_last: NaiveTime,
    pub afternoon_first: NaiveTime,
    pub afternoon_last: NaiveTime,
}

#[derive(Debug)]
struct SessionState {
    options: SessionOptions,
    hours: SessionHours,
    /// Keyed by bar width in minutes, so `60min` and `1H` share a table.
    tables: BTreeMap<u32, OrderedBarTable<NaiveTime>>,
}

impl SessionState {
    fn build(options: SessionOptions, hours: SessionHours) -> Result<Self, TradeTimeError> {
        let default_minutes =
            options
                .default_frequency
                .bar_minutes()
                .ok_or_else(|| TradeTimeError::InvalidFrequency {
                    token: options.default_frequency.to_string(),
                    reason: "session default frequency must be intraday".into(),
                })?;

        let mut tables = BTreeMap::new();
        for freq in FrequencySpec::SESSION_FREQUENCIES
            .into_iter()
            .chain(std::iter::once(options.default_frequency))
        {
            let Some(minutes) = freq.bar_minutes() else {
                continue;
            };
            if tables.contains_key(&minutes) {
                continue;
            }
            let bars = resample::session_bars(&hours, freq, options.include_opening_auction)?;
            let table = OrderedBarTable::build(freq, bars)?;
            debug!(frequency = %freq, bars = table.len(), "built session table");
            tables.insert(minutes, table);
        }
        debug_assert!(tables.contains_key(&default_minutes));

        Ok(Self {
            options,
            hours,
            tables,
        })
    }
}

/// Time-side registry, the intraday counterpart of
/// [`CalendarContext`](crate::domain::calendar::CalendarContext).
#[derive(Debug, Default)]
pub struct SessionContext {
    state: InitOnce<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configured(options: SessionOptions) -> Result<Self, TradeTimeError> {
        let ctx = Self::new();
        ctx.configure(options)?;
        Ok(ctx)
    }

    /// Builds the standard 1/5/15/30-minute and 1-hour tables plus the
    /// default frequency's. No-op once configured.
    pub fn configure(&self, options: SessionOptions) -> Result<bool, TradeTimeError> {
        let built = self
            .state
            .init_with(|| SessionState::build(options, SessionHours::default()))?;
        if !built {
            debug!("session already configured, keeping existing tables");
        }
        Ok(built)
    }

    pub fn reset(&mut self) {
        if self.state.reset().is_some() {
            info!("session registry reset");
        }
    }

    pub fn is_configured(&self) -> bool {
        self.state.get().is_some()
    }

    fn state(&self) -> Result<&SessionState, TradeTimeError> {
        self.state
            .get()
            .ok_or(TradeTimeError::NotConfigured { registry: REGISTRY })
    }

    pub fn options(&self) -> Result<SessionOptions, TradeTimeError> {
        Ok(self.state()?.options)
    }

    pub fn default_frequency(&self) -> Result<FrequencySpec, TradeTimeError> {
        Ok(self.state()?.options.default_frequency)
    }

    pub fn hours(&self) -> Result<SessionHours, TradeTimeError> {
        Ok(self.state()?.hours)
    }

    pub fn table(&self, freq: FrequencySpec) -> Result<&OrderedBarTable<NaiveTime>, TradeTimeError> {
        let state = self.state()?;
        let missing = || TradeTimeError::InvalidFrequency {
            token: freq.to_string(),
            reason: "no session table for this frequency".into(),
        };
        let minutes = freq.bar_minutes().ok_or_else(missing)?;
        state.tables.get(&minutes).ok_or_else(missing)
    }

    pub fn phase(&self, time: NaiveTime) -> Result<MarketPhase, TradeTimeError> {
        Ok(self.state()?.hours.phase(time))
    }

    pub fn is_trading(&self, time: NaiveTime) -> Result<bool, TradeTimeError> {
        Ok(self.phase(time)?.is_trading())
    }

    /// `None` while trading, `Internal` over lunch, `External` outside the
    /// trading day.
    pub fn classify_break(&self, time: NaiveTime) -> Result<Option<BreakKind>, TradeTimeError> {
        Ok(self.phase(time)?.break_kind())
    }

    /// `time` itself while trading, otherwise the closest session boundary
    /// toward `direction`.
    pub fn nearest_trading_instant(
        &self,
        time: NaiveTime,
        direction: Direction,
    ) -> Result<NaiveTime, TradeTimeError> {
        let hours = self.hours()?;
        let found = match (hours.phase(time), direction) {
            (MarketPhase::Morning | MarketPhase::Afternoon, _) => Some(time),
            (MarketPhase::BeforeMarket, Direction::Future) => Some(hours.morning_open),
            (MarketPhase::LunchBreak, Direction::Past) => Some(hours.morning_close),
            (MarketPhase::LunchBreak, Direction::Future) => Some(hours.afternoon_open),
            (MarketPhase::AfterMarket, Direction::Past) => Some(hours.afternoon_close),
            (MarketPhase::BeforeMarket, Direction::Past)
            | (MarketPhase::AfterMarket, Direction::Future) => None,
        };
        found.ok_or_else(|| TradeTimeError::OutOfRange {
            value: time.to_string(),
            frequency: REGISTRY.to_string(),
        })
    }

    /// Trading instants map to their enclosing bar. Lunch resolves to the
    /// last morning bar, or the first afternoon bar with `Future`. Outside
    /// the trading day a direction is required.
    ///
    /// Unlike the calendar, `Past` over lunch takes no extra step back:
    /// lunch lies between bars, so the last morning bar already precedes it.
    fn resolve_index(
        &self,
        time: NaiveTime,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<usize, TradeTimeError> {
        let table = self.table(freq)?;
        let anchor = match self.classify_break(time)? {
            None => time,
            Some(BreakKind::Internal) => {
                self.nearest_trading_instant(time, if_break.unwrap_or(Direction::Past))?
            }
            Some(BreakKind::External) => {
                let direction = if_break.ok_or_else(|| TradeTimeError::AmbiguousBreak {
                    value: time.to_string(),
                })?;
                self.nearest_trading_instant(time, direction)?
            }
        };
        Ok(table.locate(&anchor))
    }

    pub fn resolve_close(
        &self,
        time: NaiveTime,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<NaiveTime, TradeTimeError> {
        let i = self.resolve_index(time, freq, if_break)?;
        Ok(self.table(freq)?.at(i as i64).1)
    }

    pub fn resolve_open(
        &self,
        time: NaiveTime,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<NaiveTime, TradeTimeError> {
        let i = self.resolve_index(time, freq, if_break)?;
        Ok(self.table(freq)?.at(i as i64).0)
    }

    pub fn resolve_range(
        &self,
        time: NaiveTime,
        freq: FrequencySpec,
        if_break: Option<Direction>,
    ) -> Result<(NaiveTime, NaiveTime), TradeTimeError> {
        let i = self.resolve_index(time, freq, if_break)?;
        Ok(self.table(freq)?.at(i as i64))
    }

    /// Closes (or opens) of the bars from the one `start` resolves to
    /// (toward the future) through the last one ending by `end` (toward the
    /// past). Without `overflow` a final bar still open after `end` is
    /// dropped.
    pub fn bars_between(
        &self,
        start: NaiveTime,
        end: NaiveTime,
        freq: FrequencySpec,
        include_open: bool,
        overflow: bool,
    ) -> Result<Vec<NaiveTime>, TradeTimeError> {
        let table = self.table(freq)?;
        let start_id = match self.resolve_index(start, freq, Some(Direction::Future)) {
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

    pub fn index_of(&self, time: NaiveTime, freq: FrequencySpec) -> Result<usize, TradeTimeError> {
        self.table(freq)?
            .position(&time)
            .ok_or_else(|| TradeTimeError::NotInFrequency {
                value: time.to_string(),
                frequency: freq.to_string(),
            })
    }

    /// Close of the bar `bars` steps away within the day, under the
    /// configured shift mode.
    pub fn shift(&self, time: NaiveTime, freq: FrequencySpec, bars: i64) -> Result<NaiveTime, TradeTimeError> {
        let table = self.table(freq)?;
        let i = self.index_of(time, freq)?;
        let target = table
            .shift_with(i, bars, self.state()?.options.shift_mode)
            .ok_or_else(|| TradeTimeError::OutOfRange {
                value: format!("{time} {bars:+} bars"),
                frequency: freq.to_string(),
            })?;
        Ok(table.at(target as i64).1)
    }

    /// Close of bar `n`; negative `n` counts from the end, anything past
    /// either end clamps.
    pub fn bar(&self, freq: FrequencySpec, n: i64) -> Result<NaiveTime, TradeTimeError> {
        Ok(self.table(freq)?.at(n).1)
    }

    /// Closes of bars `start..end` with slice semantics: either bound may be
    /// negative (from the end) or omitted, out-of-range bounds clamp.
    pub fn bar_slice(
        &self,
        freq: FrequencySpec,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<NaiveTime>, TradeTimeError> {
        let closes = self.table(freq)?.closes();
        let len = closes.len() as i64;
        let clamp = |bound: i64| {
            let i = if bound < 0 { bound + len } else { bound };
            i.clamp(0, len) as usize
        };
        let from = start.map_or(0, clamp);
        let to = end.map_or(closes.len(), clamp);
        if from >= to {
            return Ok(Vec::new());
        }
        Ok(closes[from..to].to_vec())
    }

    pub fn bar_count(&self, freq: FrequencySpec) -> Result<usize, TradeTimeError> {
        Ok(self.table(freq)?.len())
    }

    pub fn endpoints(&self, freq: FrequencySpec) -> Result<SessionEndpoints, TradeTimeError> {
        let table = self.table(freq)?;
        let hours = self.hours()?;
        let closes = table.closes();
        let morning_last = table.locate(&hours.morning_close).min(closes.len() - 1);
        let afternoon_first = (morning_last + 1).min(closes.len() - 1);
        Ok(SessionEndpoints {
            first: table.first().1,
            last: table.last().1,
            morning_first: table.first().1,
            morning_last: closes[morning_last],
            afternoon_first: closes[afternoon_first],
            afternoon_last: table.last().1,
        })
    }

    /// Close of the bar the clock's time falls in. Before the open this is
    /// the first bar, over lunch the first afternoon bar; after the close
    /// there is no current bar. The clock is read to the whole second.
    pub fn current(&self, clock: &dyn ClockPort, freq: FrequencySpec) -> Result<Option<NaiveTime>, TradeTimeError> {
        let table = self.table(freq)?;
        let now = whole_seconds(clock.now());
        Ok(table.get(table.locate(&now)).map(|bar| bar.1))
    }

    pub fn future(
        &self,
        clock: &dyn ClockPort,
        freq: FrequencySpec,
        bars: i64,
    ) -> Result<Option<NaiveTime>, TradeTimeError> {
        self.current(clock, freq)?
            .map(|now| self.shift(now, freq, bars))
            .transpose()
    }

    pub fn previous(
        &self,
        clock: &dyn ClockPort,
        freq: FrequencySpec,
        bars: i64,
    ) -> Result<Option<NaiveTime>, TradeTimeError> {
        self.future(clock, freq, bars.saturating_neg())
    }
}
