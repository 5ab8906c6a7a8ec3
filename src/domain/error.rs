//! Domain error types.

/// Top-level error type for tradetime.
#[derive(Debug, thiserror::Error)]
pub enum TradeTimeError {
    #[error("invalid frequency '{token}': {reason}")]
    InvalidFrequency { token: String, reason: String },

    #[error("malformed {frequency} bar table: {reason}")]
    MalformedTable { frequency: String, reason: String },

    #[error("{value} is not a bar of frequency '{frequency}'")]
    NotInFrequency { value: String, frequency: String },

    #[error("frequencies '{left}' and '{right}' are inconsistent")]
    IncompatibleFrequency { left: String, right: String },

    #[error("{value} falls in an external break, a direction (past/future) is required")]
    AmbiguousBreak { value: String },

    #[error("reverse arithmetic is disabled (enable allow_reverse_arithmetic)")]
    DisabledReverseArithmetic,

    #[error("{value} is outside the known {frequency} range")]
    OutOfRange { value: String, frequency: String },

    #[error("{registry} registry is not configured")]
    NotConfigured { registry: &'static str },

    #[error("invalid format '{value}': {reason}")]
    InvalidFormat { value: String, reason: String },

    #[error("calendar source error: {reason}")]
    CalendarSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradeTimeError> for std::process::ExitCode {
    fn from(err: &TradeTimeError) -> Self {
        let code: u8 = match err {
            TradeTimeError::Io(_) => 1,
            TradeTimeError::ConfigParse { .. }
            | TradeTimeError::ConfigMissing { .. }
            | TradeTimeError::ConfigInvalid { .. } => 2,
            TradeTimeError::CalendarSource { .. } | TradeTimeError::NotConfigured { .. } => 3,
            TradeTimeError::InvalidFrequency { .. } | TradeTimeError::InvalidFormat { .. } => 4,
            TradeTimeError::MalformedTable { .. }
            | TradeTimeError::NotInFrequency { .. }
            | TradeTimeError::IncompatibleFrequency { .. }
            | TradeTimeError::AmbiguousBreak { .. }
            | TradeTimeError::DisabledReverseArithmetic
            | TradeTimeError::OutOfRange { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = TradeTimeError::NotInFrequency {
            value: "2024-01-06".into(),
            frequency: "D".into(),
        };
        assert_eq!(err.to_string(), "2024-01-06 is not a bar of frequency 'D'");

        let err = TradeTimeError::ConfigInvalid {
            section: "session".into(),
            key: "bars".into(),
            reason: "must be 240 or 241".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [session] bars: must be 240 or 241"
        );
    }

    #[test]
    fn io_errors_convert_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TradeTimeError = io.into();
        assert!(matches!(err, TradeTimeError::Io(_)));
        assert_eq!(err.to_string(), "gone");
    }
}
