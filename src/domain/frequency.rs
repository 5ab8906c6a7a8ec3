//! Frequency tokens ("D", "W", "5min", "1H", ...).
//!
//! A token is an optional leading multiplier followed by a unit. Date units
//! only support a multiplier of 1; minute multipliers must divide a
//! half-session evenly; hour multipliers are 1 or 2.

use crate::domain::error::TradeTimeError;
use std::fmt;
use std::str::FromStr;

/// Length of each half-session (09:30-11:30, 13:00-15:00) in minutes.
pub const HALF_SESSION_MINUTES: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrequencyUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Minute,
    Hour,
}

impl FrequencyUnit {
    pub fn is_date(self) -> bool {
        matches!(
            self,
            Self::Day | Self::Week | Self::Month | Self::Quarter | Self::Year
        )
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Day => "D",
            Self::Week => "W",
            Self::Month => "M",
            Self::Quarter => "Q",
            Self::Year => "Y",
            Self::Minute => "min",
            Self::Hour => "H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrequencySpec {
    unit: FrequencyUnit,
    multiplier: u32,
}

impl FrequencySpec {
    pub const DAY: Self = Self::unchecked(FrequencyUnit::Day, 1);
    pub const WEEK: Self = Self::unchecked(FrequencyUnit::Week, 1);
    pub const MONTH: Self = Self::unchecked(FrequencyUnit::Month, 1);
    pub const QUARTER: Self = Self::unchecked(FrequencyUnit::Quarter, 1);
    pub const YEAR: Self = Self::unchecked(FrequencyUnit::Year, 1);
    pub const ONE_MINUTE: Self = Self::unchecked(FrequencyUnit::Minute, 1);
    pub const FIVE_MINUTES: Self = Self::unchecked(FrequencyUnit::Minute, 5);
    pub const FIFTEEN_MINUTES: Self = Self::unchecked(FrequencyUnit::Minute, 15);
    pub const THIRTY_MINUTES: Self = Self::unchecked(FrequencyUnit::Minute, 30);
    pub const ONE_HOUR: Self = Self::unchecked(FrequencyUnit::Hour, 1);

    /// Frequencies the calendar registry always builds.
    pub const DATE_FREQUENCIES: [Self; 5] =
        [Self::DAY, Self::WEEK, Self::MONTH, Self::QUARTER, Self::YEAR];

    /// Frequencies the session registry always builds.
    pub const SESSION_FREQUENCIES: [Self; 5] = [
        Self::ONE_MINUTE,
        Self::FIVE_MINUTES,
        Self::FIFTEEN_MINUTES,
        Self::THIRTY_MINUTES,
        Self::ONE_HOUR,
    ];

    const fn unchecked(unit: FrequencyUnit, multiplier: u32) -> Self {
        Self { unit, multiplier }
    }

    /// Builds a frequency after checking the multiplier against its unit.
    pub fn new(unit: FrequencyUnit, multiplier: u32) -> Result<Self, TradeTimeError> {
        let invalid = |reason: &str| TradeTimeError::InvalidFrequency {
            token: format!("{}{}", multiplier, unit.suffix()),
            reason: reason.to_string(),
        };

        if multiplier == 0 {
            return Err(invalid("multiplier must be positive"));
        }
        match unit {
            u if u.is_date() && multiplier != 1 => {
                Err(invalid("date frequencies only support a multiplier of 1"))
            }
            FrequencyUnit::Minute if HALF_SESSION_MINUTES % multiplier != 0 => Err(invalid(
                "minute multiplier must divide 120 (1, 2, 3, 4, 5, 6, 10, ..., 120)",
            )),
            FrequencyUnit::Hour if !matches!(multiplier, 1 | 2) => {
                Err(invalid("hour multiplier must be 1 or 2"))
            }
            _ => Ok(Self::unchecked(unit, multiplier)),
        }
    }

    /// Splits `token` into leading digits (default 1) and a unit suffix.
    pub fn parse(token: &str) -> Result<Self, TradeTimeError> {
        let trimmed = token.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, letters) = trimmed.split_at(split);
        let invalid = |reason: String| TradeTimeError::InvalidFrequency {
            token: token.to_string(),
            reason,
        };

        let multiplier = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|e| invalid(format!("bad multiplier: {e}")))?
        };

        let unit = match letters {
            "D" => FrequencyUnit::Day,
            "W" => FrequencyUnit::Week,
            "M" => FrequencyUnit::Month,
            "Q" => FrequencyUnit::Quarter,
            "Y" => FrequencyUnit::Year,
            "min" | "T" => FrequencyUnit::Minute,
            "H" | "h" => FrequencyUnit::Hour,
            "" => return Err(invalid("missing unit".to_string())),
            other => {
                return Err(invalid(format!(
                    "unknown unit '{other}', expected one of D, W, M, Q, Y, min, T, H"
                )));
            }
        };

        Self::new(unit, multiplier).map_err(|e| match e {
            TradeTimeError::InvalidFrequency { reason, .. } => invalid(reason),
            other => other,
        })
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn is_date(&self) -> bool {
        self.unit.is_date()
    }

    pub fn is_intraday(&self) -> bool {
        !self.unit.is_date()
    }

    /// Width of one intraday bar in minutes; `None` for date frequencies.
    pub fn bar_minutes(&self) -> Option<u32> {
        match self.unit {
            FrequencyUnit::Minute => Some(self.multiplier),
            FrequencyUnit::Hour => Some(self.multiplier * 60),
            _ => None,
        }
    }
}

impl fmt::Display for FrequencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_date() {
            f.write_str(self.unit.suffix())
        } else {
            write!(f, "{}{}", self.multiplier, self.unit.suffix())
        }
    }
}

impl FromStr for FrequencySpec {
    type Err = TradeTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_tokens() {
        assert_eq!(FrequencySpec::parse("D").unwrap(), FrequencySpec::DAY);
        assert_eq!(FrequencySpec::parse("1W").unwrap(), FrequencySpec::WEEK);
        assert_eq!(FrequencySpec::parse(" Q ").unwrap(), FrequencySpec::QUARTER);
        assert!(FrequencySpec::parse("Y").unwrap().is_date());
    }

    #[test]
    fn parses_intraday_tokens() {
        let five = FrequencySpec::parse("5min").unwrap();
        assert_eq!(five, FrequencySpec::FIVE_MINUTES);
        assert_eq!(five.bar_minutes(), Some(5));

        assert_eq!(FrequencySpec::parse("15T").unwrap(), FrequencySpec::FIFTEEN_MINUTES);
        assert_eq!(FrequencySpec::parse("min").unwrap(), FrequencySpec::ONE_MINUTE);
        assert_eq!(FrequencySpec::parse("2H").unwrap().bar_minutes(), Some(120));
        assert_eq!(FrequencySpec::parse("1h").unwrap(), FrequencySpec::ONE_HOUR);
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = FrequencySpec::parse("5sec").unwrap_err();
        assert!(matches!(err, TradeTimeError::InvalidFrequency { ref token, .. } if token == "5sec"));
        assert!(FrequencySpec::parse("").is_err());
        assert!(FrequencySpec::parse("15").is_err());
    }

    #[test]
    fn rejects_minutes_not_dividing_half_session() {
        assert!(FrequencySpec::parse("7min").is_err());
        assert!(FrequencySpec::parse("0min").is_err());
        assert!(FrequencySpec::parse("120min").is_ok());
        assert!(FrequencySpec::parse("40min").is_ok());
    }

    #[test]
    fn rejects_out_of_domain_multipliers() {
        assert!(FrequencySpec::parse("3H").is_err());
        assert!(FrequencySpec::parse("2D").is_err());
        assert!(FrequencySpec::new(FrequencyUnit::Month, 3).is_err());
    }

    #[test]
    fn display_round_trips_canonical_tokens() {
        for token in ["D", "W", "M", "Q", "Y", "1min", "5min", "30min", "1H", "2H"] {
            assert_eq!(FrequencySpec::parse(token).unwrap().to_string(), token);
        }
        assert_eq!(FrequencySpec::parse("5T").unwrap().to_string(), "5min");
    }
}
