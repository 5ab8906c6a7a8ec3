//! CSV trading-day list adapter.

use crate::domain::convert::parse_date_text;
use crate::domain::error::TradeTimeError;
use crate::ports::calendar_port::CalendarPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

/// Reads trading days from a CSV file. The `time` column is used when the
/// header has one, otherwise the first column.
pub struct CsvCalendarAdapter {
    path: PathBuf,
}

impl CsvCalendarAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse(&self, content: &str) -> Result<Vec<NaiveDate>, TradeTimeError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| TradeTimeError::CalendarSource {
            reason: format!("CSV header error in {}: {}", self.path.display(), e),
        })?;
        let column = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("time"))
            .unwrap_or(0);

        let mut days = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| TradeTimeError::CalendarSource {
                reason: format!("CSV parse error: {}", e),
            })?;
            let cell = record.get(column).ok_or_else(|| TradeTimeError::CalendarSource {
                reason: format!("row {}: missing date column", row + 1),
            })?;
            let day = parse_date_text(cell).map_err(|e| TradeTimeError::CalendarSource {
                reason: format!("row {}: {}", row + 1, e),
            })?;
            days.push(day);
        }

        days.sort_unstable();
        days.dedup();
        Ok(days)
    }
}

impl CalendarPort for CsvCalendarAdapter {
    fn trading_days(&self) -> Result<Vec<NaiveDate>, TradeTimeError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradeTimeError::CalendarSource {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        self.parse(&content)
    }
}
