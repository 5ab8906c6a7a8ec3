//! Wall-clock port trait, local exchange time only.

use chrono::{NaiveDate, NaiveTime};

pub trait ClockPort {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> NaiveTime;
}
