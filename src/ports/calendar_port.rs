//! Trading-day provider port trait.

use crate::domain::error::TradeTimeError;
use chrono::NaiveDate;

/// Supplies the master list of trading days the calendar registry is built
/// from. Implementations return the days sorted ascending without duplicates.
pub trait CalendarPort {
    fn trading_days(&self) -> Result<Vec<NaiveDate>, TradeTimeError>;

    /// First day, last day and number of days known to the provider.
    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradeTimeError> {
        let days = self.trading_days()?;
        Ok(match (days.first(), days.last()) {
            (Some(&first), Some(&last)) => Some((first, last, days.len())),
            _ => None,
        })
    }
}
