//! Resampling of raw inputs into `(open, close)` bar pairs.
//!
//! Dates: the sorted trading-day list is cut into consecutive buckets (one
//! per day, Monday-Sunday week, month, quarter or year) and each bucket
//! contributes its first and last trading day.
//!
//! Times: each half-session contributes closes stepped by the bar width.
//! One-minute bars optionally keep the 09:30 auction instant as a bar of its
//! own; wider bars fold it into their first bar.

use crate::domain::error::TradeTimeError;
use crate::domain::frequency::{FrequencySpec, FrequencyUnit};
use crate::domain::session::SessionHours;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

fn bucket_key(day: NaiveDate, unit: FrequencyUnit) -> (i32, u32) {
    match unit {
        FrequencyUnit::Week => {
            let week = day.iso_week();
            (week.year(), week.week())
        }
        FrequencyUnit::Month => (day.year(), day.month()),
        FrequencyUnit::Quarter => (day.year(), (day.month() - 1) / 3),
        FrequencyUnit::Year => (day.year(), 0),
        _ => (day.num_days_from_ce(), 0),
    }
}

/// Groups `days` (sorted ascending) into bars of `freq`.
pub fn date_bars(
    days: &[NaiveDate],
    freq: FrequencySpec,
) -> Result<Vec<(NaiveDate, NaiveDate)>, TradeTimeError> {
    if !freq.is_date() {
        return Err(TradeTimeError::InvalidFrequency {
            token: freq.to_string(),
            reason: "not a date frequency".into(),
        });
    }

    let mut bars: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    let mut current_key = None;

    for &day in days {
        let key = bucket_key(day, freq.unit());
        match bars.last_mut() {
            Some(bar) if current_key == Some(key) => bar.1 = day,
            _ => {
                bars.push((day, day));
                current_key = Some(key);
            }
        }
    }

    Ok(bars)
}

/// Builds the intraday bars of one trading day for `freq`.
pub fn session_bars(
    hours: &SessionHours,
    freq: FrequencySpec,
    include_opening_auction: bool,
) -> Result<Vec<(NaiveTime, NaiveTime)>, TradeTimeError> {
    let minutes = freq
        .bar_minutes()
        .ok_or_else(|| TradeTimeError::InvalidFrequency {
            token: freq.to_string(),
            reason: "not an intraday frequency".into(),
        })?;
    let step = Duration::minutes(i64::from(minutes));
    let one_second = Duration::seconds(1);

    let halves = [
        (hours.morning_open, hours.morning_close, true),
        (hours.afternoon_open, hours.afternoon_close, false),
    ];

    let mut bars = Vec::new();
    for (open, close, is_morning) in halves {
        let mut bar_close = if minutes == 1 && is_morning && include_opening_auction {
            open
        } else {
            open + step
        };
        let mut bar_open = open;
        while bar_close <= close {
            bars.push((bar_open, bar_close));
            bar_open = bar_close + one_second;
            bar_close += step;
        }
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn weekdays(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        from.iter_days()
            .take_while(|day| *day <= to)
            .filter(|day| day.weekday().num_days_from_monday() < 5)
            .collect()
    }

    #[test]
    fn daily_bars_open_and_close_on_the_same_day() {
        let days = weekdays(d(2024, 1, 1), d(2024, 1, 5));
        let bars = date_bars(&days, FrequencySpec::DAY).unwrap();
        assert_eq!(bars.len(), 5);
        assert!(bars.iter().all(|(open, close)| open == close));
    }

    #[test]
    fn weekly_bars_run_monday_to_sunday() {
        let days = weekdays(d(2024, 1, 3), d(2024, 1, 16));
        let bars = date_bars(&days, FrequencySpec::WEEK).unwrap();
        assert_eq!(
            bars,
            vec![
                (d(2024, 1, 3), d(2024, 1, 5)),
                (d(2024, 1, 8), d(2024, 1, 12)),
                (d(2024, 1, 15), d(2024, 1, 16)),
            ]
        );
    }

    #[test]
    fn weekly_bars_straddle_the_new_year() {
        // 2024-12-30 (Mon) and 2025-01-03 (Fri) share ISO week 2025-W01.
        let days = weekdays(d(2024, 12, 27), d(2025, 1, 3));
        let bars = date_bars(&days, FrequencySpec::WEEK).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1], (d(2024, 12, 30), d(2025, 1, 3)));
    }

    #[test]
    fn monthly_quarterly_and_yearly_buckets() {
        let days = weekdays(d(2023, 11, 1), d(2024, 4, 30));
        let months = date_bars(&days, FrequencySpec::MONTH).unwrap();
        assert_eq!(months.len(), 6);
        assert_eq!(months[3], (d(2024, 2, 1), d(2024, 2, 29)));

        let quarters = date_bars(&days, FrequencySpec::QUARTER).unwrap();
        assert_eq!(
            quarters,
            vec![
                (d(2023, 11, 1), d(2023, 12, 29)),
                (d(2024, 1, 1), d(2024, 3, 29)),
                (d(2024, 4, 1), d(2024, 4, 30)),
            ]
        );

        let years = date_bars(&days, FrequencySpec::YEAR).unwrap();
        assert_eq!(years.len(), 2);
    }

    #[test]
    fn date_bars_reject_intraday_frequency() {
        let days = weekdays(d(2024, 1, 1), d(2024, 1, 5));
        assert!(date_bars(&days, FrequencySpec::FIVE_MINUTES).is_err());
    }

    #[test]
    fn one_minute_session_with_auction_has_241_bars() {
        let bars = session_bars(&SessionHours::default(), FrequencySpec::ONE_MINUTE, true).unwrap();
        assert_eq!(bars.len(), 241);
        assert_eq!(bars[0], (t(9, 30, 0), t(9, 30, 0)));
        assert_eq!(bars[1], (t(9, 30, 1), t(9, 31, 0)));
        assert_eq!(bars[120].1, t(11, 30, 0));
        assert_eq!(bars[121], (t(13, 0, 0), t(13, 1, 0)));
        assert_eq!(bars[240].1, t(15, 0, 0));
    }

    #[test]
    fn one_minute_session_without_auction_has_240_bars() {
        let bars =
            session_bars(&SessionHours::default(), FrequencySpec::ONE_MINUTE, false).unwrap();
        assert_eq!(bars.len(), 240);
        assert_eq!(bars[0], (t(9, 30, 0), t(9, 31, 0)));
    }

    #[test]
    fn wider_bars_ignore_the_auction_flag() {
        let hours = SessionHours::default();
        let with = session_bars(&hours, FrequencySpec::FIVE_MINUTES, true).unwrap();
        let without = session_bars(&hours, FrequencySpec::FIVE_MINUTES, false).unwrap();
        assert_eq!(with, without);
        assert_eq!(with.len(), 48);
        assert_eq!(with[0], (t(9, 30, 0), t(9, 35, 0)));
        assert_eq!(with[24], (t(13, 0, 0), t(13, 5, 0)));

        let hourly = session_bars(&hours, FrequencySpec::ONE_HOUR, true).unwrap();
        let closes: Vec<NaiveTime> = hourly.iter().map(|bar| bar.1).collect();
        assert_eq!(
            closes,
            vec![t(10, 30, 0), t(11, 30, 0), t(14, 0, 0), t(15, 0, 0)]
        );
    }
}
