//! Typed, validated settings built from the `[calendar]` and `[session]`
//! config sections.

use crate::domain::bar_table::ShiftMode;
use crate::domain::calendar::CalendarOptions;
use crate::domain::error::TradeTimeError;
use crate::domain::frequency::FrequencySpec;
use crate::domain::session::SessionOptions;
use crate::ports::config_port::ConfigPort;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSettings {
    pub data_path: PathBuf,
    pub options: CalendarOptions,
}

impl CalendarSettings {
    /// `data_path` as given when absolute, otherwise joined onto `base`
    /// (the config file's directory).
    pub fn resolve_data_path(&self, base: &Path) -> PathBuf {
        if self.data_path.is_absolute() {
            self.data_path.clone()
        } else {
            base.join(&self.data_path)
        }
    }
}

fn invalid(section: &str, key: &str, reason: String) -> TradeTimeError {
    TradeTimeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn parse_frequency(
    config: &dyn ConfigPort,
    section: &str,
    fallback: FrequencySpec,
    accept: fn(&FrequencySpec) -> bool,
) -> Result<FrequencySpec, TradeTimeError> {
    let Some(raw) = config.get_string(section, "default_frequency") else {
        return Ok(fallback);
    };
    let freq = FrequencySpec::parse(&raw).map_err(|e| invalid(section, "default_frequency", e.to_string()))?;
    if !accept(&freq) {
        return Err(invalid(
            section,
            "default_frequency",
            format!("'{freq}' is not a {section} frequency"),
        ));
    }
    Ok(freq)
}

fn parse_shift_mode(config: &dyn ConfigPort, section: &str) -> Result<ShiftMode, TradeTimeError> {
    match config.get_string(section, "shift_mode") {
        None => Ok(ShiftMode::default()),
        Some(raw) => ShiftMode::parse(&raw).ok_or_else(|| {
            invalid(
                section,
                "shift_mode",
                format!("'{raw}' must be wrap, saturate or strict"),
            )
        }),
    }
}

pub fn build_calendar_settings(config: &dyn ConfigPort) -> Result<CalendarSettings, TradeTimeError> {
    let data_path = match config.get_string("calendar", "data_path") {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => {
            return Err(TradeTimeError::ConfigMissing {
                section: "calendar".to_string(),
                key: "data_path".to_string(),
            });
        }
    };

    let options = CalendarOptions {
        default_frequency: parse_frequency(config, "calendar", FrequencySpec::DAY, FrequencySpec::is_date)?,
        allow_reverse_arithmetic: config.get_bool("calendar", "allow_reverse_arithmetic", false),
        shift_mode: parse_shift_mode(config, "calendar")?,
    };

    Ok(CalendarSettings { data_path, options })
}

/// The whole `[session]` section is optional.
pub fn build_session_options(config: &dyn ConfigPort) -> Result<SessionOptions, TradeTimeError> {
    let bars = config.get_string("session", "bars");
    let include_opening_auction = match bars.as_deref().map(str::trim) {
        None | Some("241") => true,
        Some("240") => false,
        Some(other) => {
            return Err(invalid(
                "session",
                "bars",
                format!("'{other}' must be 240 or 241"),
            ));
        }
    };

    Ok(SessionOptions {
        default_frequency: parse_frequency(
            config,
            "session",
            FrequencySpec::ONE_MINUTE,
            FrequencySpec::is_intraday,
        )?,
        include_opening_auction,
        shift_mode: parse_shift_mode(config, "session")?,
    })
}
