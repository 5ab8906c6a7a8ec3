//! Clock adapters.

use crate::ports::clock_port::ClockPort;
use chrono::{Local, NaiveDate, NaiveTime};

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock stopped at one instant, for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    today: NaiveDate,
    now: NaiveTime,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now: NaiveTime) -> Self {
        Self { today, now }
    }
}

impl ClockPort for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> NaiveTime {
        self.now
    }
}
