//! Core calendar and session arithmetic.

pub mod frequency;
pub mod bar_table;
pub mod resample;
pub mod breaks;
pub mod registry;
pub mod calendar;
pub mod session;
pub mod bar_delta;
pub mod trading_date;
pub mod trading_time;
pub mod convert;
pub mod settings;
pub mod error;
