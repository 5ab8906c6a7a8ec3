//! INI file configuration adapter.

use crate::domain::error::TradeTimeError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradeTimeError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TradeTimeError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TradeTimeError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TradeTimeError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_both_sections() {
        let content = r#"
[calendar]
data_path = data/calendar.csv
default_frequency = W

[session]
bars = 240
default_frequency = 5min
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("calendar", "data_path"),
            Some("data/calendar.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("session", "default_frequency"),
            Some("5min".to_string())
        );
        assert_eq!(adapter.get_int("session", "bars", 241), 240);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[calendar]\ndata_path = a.csv\n").unwrap();
        assert_eq!(adapter.get_string("calendar", "missing"), None);
        assert_eq!(adapter.get_string("session", "bars"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[session]\nbars = many\n").unwrap();
        assert_eq!(adapter.get_int("session", "bars", 241), 241);
        assert_eq!(adapter.get_int("session", "missing", 7), 7);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[calendar]\na = true\nb = yes\nc = 1\nd = off\ne = No\nf = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("calendar", "a", false));
        assert!(adapter.get_bool("calendar", "b", false));
        assert!(adapter.get_bool("calendar", "c", false));
        assert!(!adapter.get_bool("calendar", "d", true));
        assert!(!adapter.get_bool("calendar", "e", true));
        assert!(adapter.get_bool("calendar", "f", true));
        assert!(!adapter.get_bool("calendar", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[calendar]\ndata_path = /srv/calendar.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("calendar", "data_path"),
            Some("/srv/calendar.csv".to_string())
        );
    }

    #[test]
    fn from_file_reports_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/tradetime.ini");
        assert!(matches!(result, Err(TradeTimeError::ConfigParse { .. })));
    }
}
