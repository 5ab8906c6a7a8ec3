//! Break classification shared by the calendar and session registries.

use std::fmt;

/// Which way to resolve a value that falls in a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Past,
    Future,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "past" => Some(Self::Past),
            "future" => Some(Self::Future),
            _ => None,
        }
    }
}

/// Kind of gap a non-trading value sits in.
///
/// `Internal`: the trading values on either side belong to the same bar, so
/// the enclosing bar is known without a direction. `External`: they belong
/// to different bars (or one side is missing), so a direction is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakKind {
    Internal,
    External,
}

impl fmt::Display for BreakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => f.write_str("internal break"),
            Self::External => f.write_str("external break"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_direction_hints() {
        assert_eq!(Direction::parse("past"), Some(Direction::Past));
        assert_eq!(Direction::parse("FUTURE"), Some(Direction::Future));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test]
    fn break_kind_display() {
        assert_eq!(BreakKind::Internal.to_string(), "internal break");
        assert_eq!(BreakKind::External.to_string(), "external break");
    }
}
