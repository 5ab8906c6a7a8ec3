//! Signed bar offsets.

use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use std::cmp::Ordering;
use std::fmt;

/// A signed offset counted in bars: `date_bars` of `date_frequency` plus
/// `time_bars` of whatever intraday frequency the shifted time carries.
///
/// Deltas only combine or compare with deltas of the same date frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarDelta {
    date_bars: i64,
    time_bars: i64,
    date_frequency: FrequencySpec,
}

impl BarDelta {
    pub fn new(date_bars: i64, time_bars: i64, date_frequency: FrequencySpec) -> Self {
        Self {
            date_bars,
            time_bars,
            date_frequency,
        }
    }

    pub fn dates(date_bars: i64, date_frequency: FrequencySpec) -> Self {
        Self::new(date_bars, 0, date_frequency)
    }

    pub fn times(time_bars: i64) -> Self {
        Self::new(0, time_bars, FrequencySpec::DAY)
    }

    pub fn date_bars(&self) -> i64 {
        self.date_bars
    }

    pub fn time_bars(&self) -> i64 {
        self.time_bars
    }

    pub fn date_frequency(&self) -> FrequencySpec {
        self.date_frequency
    }

    pub fn is_zero(&self) -> bool {
        self.date_bars == 0 && self.time_bars == 0
    }

    pub fn negate(&self) -> Self {
        Self::new(
            self.date_bars.saturating_neg(),
            self.time_bars.saturating_neg(),
            self.date_frequency,
        )
    }

    fn ensure_compatible(&self, other: &Self) -> Result<(), TradeTimeError> {
        if self.date_frequency != other.date_frequency {
            return Err(TradeTimeError::IncompatibleFrequency {
                left: self.date_frequency.to_string(),
                right: other.date_frequency.to_string(),
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, TradeTimeError> {
        self.ensure_compatible(other)?;
        Ok(Self::new(
            self.date_bars.saturating_add(other.date_bars),
            self.time_bars.saturating_add(other.time_bars),
            self.date_frequency,
        ))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self, TradeTimeError> {
        self.checked_add(&other.negate())
    }

    /// Orders by `(date_bars, time_bars)`.
    pub fn compare(&self, other: &Self) -> Result<Ordering, TradeTimeError> {
        self.ensure_compatible(other)?;
        Ok((self.date_bars, self.time_bars).cmp(&(other.date_bars, other.time_bars)))
    }
}

impl Default for BarDelta {
    fn default() -> Self {
        Self::new(0, 0, FrequencySpec::DAY)
    }
}

impl fmt::Display for BarDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut args = Vec::new();
        if self.date_bars != 0 {
            args.push(format!("date_bars={}", self.date_bars));
        }
        if self.time_bars != 0 {
            args.push(format!("time_bars={}", self.time_bars));
        }
        if self.date_bars != 0 {
            args.push(format!("date_freq='{}'", self.date_frequency));
        }
        if args.is_empty() {
            args.push("0".to_string());
        }
        write!(f, "BarDelta({})", args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_componentwise() {
        let a = BarDelta::new(2, 5, FrequencySpec::DAY);
        let b = BarDelta::new(-1, 3, FrequencySpec::DAY);
        assert_eq!(a.checked_add(&b).unwrap(), BarDelta::new(1, 8, FrequencySpec::DAY));
        assert_eq!(a.checked_sub(&b).unwrap(), BarDelta::new(3, 2, FrequencySpec::DAY));
    }

    #[test]
    fn mixing_frequencies_is_an_error() {
        let days = BarDelta::dates(1, FrequencySpec::DAY);
        let weeks = BarDelta::dates(1, FrequencySpec::WEEK);
        assert!(matches!(
            days.checked_add(&weeks),
            Err(TradeTimeError::IncompatibleFrequency { .. })
        ));
        assert!(days.compare(&weeks).is_err());
    }

    #[test]
    fn compares_dates_before_times() {
        let a = BarDelta::new(1, 100, FrequencySpec::MONTH);
        let b = BarDelta::new(2, 0, FrequencySpec::MONTH);
        assert_eq!(a.compare(&b).unwrap(), Ordering::Less);
        assert_eq!(b.compare(&a).unwrap(), Ordering::Greater);
        assert_eq!(a.compare(&a).unwrap(), Ordering::Equal);
    }

    #[test]
    fn display_lists_non_zero_parts() {
        assert_eq!(BarDelta::default().to_string(), "BarDelta(0)");
        assert_eq!(
            BarDelta::dates(3, FrequencySpec::DAY).to_string(),
            "BarDelta(date_bars=3, date_freq='D')"
        );
        assert_eq!(BarDelta::times(-2).to_string(), "BarDelta(time_bars=-2)");
    }

    #[test]
    fn zero_delta() {
        assert!(BarDelta::default().is_zero());
        assert!(!BarDelta::times(1).is_zero());
        assert!(BarDelta::times(1).checked_sub(&BarDelta::times(1)).unwrap().is_zero());
    }
}
