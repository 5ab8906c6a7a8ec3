//! Ordered bar boundary table.
//!
//! One table per frequency: `opens[i] <= closes[i] < opens[i + 1]`. Every
//! lookup goes through [`OrderedBarTable::locate`], a bisection over the
//! closes. The same type backs date calendars (`NaiveDate`) and intraday
//! sessions (`NaiveTime`).

use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use std::fmt::Display;

/// How an index shift that runs off either end of a table is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftMode {
    /// `(index + delta) mod len`. Overshooting lands on the opposite end.
    #[default]
    Wrap,
    /// Clamp to the first or last bar.
    Saturate,
    /// Overshooting is an error.
    Strict,
}

impl ShiftMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "wrap" => Some(Self::Wrap),
            "saturate" => Some(Self::Saturate),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderedBarTable<T> {
    frequency: FrequencySpec,
    opens: Vec<T>,
    closes: Vec<T>,
}

impl<T: Copy + Ord + Display> OrderedBarTable<T> {
    /// Validates and stores already-resampled `(open, close)` pairs.
    pub fn build<I>(frequency: FrequencySpec, bars: I) -> Result<Self, TradeTimeError>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let malformed = |reason: String| TradeTimeError::MalformedTable {
            frequency: frequency.to_string(),
            reason,
        };

        let (opens, closes): (Vec<T>, Vec<T>) = bars.into_iter().unzip();
        if closes.is_empty() {
            return Err(malformed("table has no bars".to_string()));
        }

        for (i, (open, close)) in opens.iter().zip(&closes).enumerate() {
            if open > close {
                return Err(malformed(format!(
                    "bar {i} opens at {open} after it closes at {close}"
                )));
            }
            if let Some(next_open) = opens.get(i + 1) {
                if close >= next_open {
                    return Err(malformed(format!(
                        "bar {i} closes at {close}, not before bar {} opens at {next_open}",
                        i + 1
                    )));
                }
            }
        }

        Ok(Self {
            frequency,
            opens,
            closes,
        })
    }

    pub fn frequency(&self) -> FrequencySpec {
        self.frequency
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn opens(&self) -> &[T] {
        &self.opens
    }

    pub fn closes(&self) -> &[T] {
        &self.closes
    }

    /// Smallest index whose close is `>= value`; `len()` when `value` lies
    /// after the last close.
    pub fn locate(&self, value: &T) -> usize {
        self.closes.partition_point(|close| close < value)
    }

    /// Index of the bar closing exactly at `value`.
    pub fn position(&self, value: &T) -> Option<usize> {
        let i = self.locate(value);
        (self.closes.get(i) == Some(value)).then_some(i)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.position(value).is_some()
    }

    pub fn get(&self, index: usize) -> Option<(T, T)> {
        Some((*self.opens.get(index)?, *self.closes.get(index)?))
    }

    /// Bar at `index`. Negative indices count from the end; anything beyond
    /// the table in either direction clamps to the first or last bar.
    pub fn at(&self, index: i64) -> (T, T) {
        let len = self.len() as i64;
        let i = if index >= len {
            len - 1
        } else if index < -len {
            0
        } else {
            index.rem_euclid(len)
        };
        (self.opens[i as usize], self.closes[i as usize])
    }

    pub fn first(&self) -> (T, T) {
        (self.opens[0], self.closes[0])
    }

    pub fn last(&self) -> (T, T) {
        let i = self.len() - 1;
        (self.opens[i], self.closes[i])
    }

    /// `(index + delta) mod len`. Reduces `delta` first so any `i64` works.
    pub fn shift(&self, index: usize, delta: i64) -> usize {
        let len = self.len() as i64;
        (index as i64 + delta.rem_euclid(len)).rem_euclid(len) as usize
    }

    /// Shift under an explicit overshoot policy; `None` only in strict mode.
    pub fn shift_with(&self, index: usize, delta: i64, mode: ShiftMode) -> Option<usize> {
        let target = (index as i64).checked_add(delta);
        let last = self.len() as i64 - 1;
        match mode {
            ShiftMode::Wrap => Some(self.shift(index, delta)),
            ShiftMode::Saturate => match target {
                Some(target) => Some(target.clamp(0, last) as usize),
                None if delta > 0 => Some(last as usize),
                None => Some(0),
            },
            ShiftMode::Strict => target
                .filter(|target| (0..=last).contains(target))
                .map(|target| target as usize),
        }
    }

    /// Opens or closes of bars `start..=end`, clamped to the table.
    pub fn slice(&self, start: usize, end: usize, include_open: bool) -> Vec<T> {
        let source = if include_open { &self.opens } else { &self.closes };
        if start > end || start >= source.len() {
            return Vec::new();
        }
        let end = end.min(source.len() - 1);
        source[start..=end].to_vec()
    }
}
