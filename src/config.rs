use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_DURATION_SECS: i64 = 30;
pub const DEFAULT_WORD_COUNT: i64 = 50;
pub const DEFAULT_DICTIONARY: &str = "default";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duration must be a positive number of seconds, got {0}")]
    NonPositiveDuration(i64),
    #[error("word count must be a positive number, got {0}")]
    NonPositiveWordCount(i64),
    #[error("dictionary name must not be empty")]
    EmptyDictionaryName,
}

/// Validated settings the core is constructed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub duration: Duration,
    pub word_count: usize,
    pub show_history: bool,
    pub dictionary: String,
    pub history_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(DEFAULT_DURATION_SECS as u64),
            word_count: DEFAULT_WORD_COUNT as usize,
            show_history: false,
            dictionary: DEFAULT_DICTIONARY.to_string(),
            history_path: None,
        }
    }
}

impl Settings {
    /// Builds settings from raw command line values. Counts arrive signed so
    /// that `-d -5` reaches validation instead of failing inside the parser.
    pub fn new(
        duration_secs: i64,
        word_count: i64,
        show_history: bool,
        dictionary: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if duration_secs <= 0 {
            return Err(ConfigError::NonPositiveDuration(duration_secs));
        }
        if word_count <= 0 {
            return Err(ConfigError::NonPositiveWordCount(word_count));
        }
        let dictionary = dictionary.into();
        if dictionary.trim().is_empty() {
            return Err(ConfigError::EmptyDictionaryName);
        }

        Ok(Self {
            duration: Duration::from_secs(duration_secs as u64),
            word_count: word_count as usize,
            show_history,
            dictionary,
            history_path: None,
        })
    }

    pub fn with_history_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.history_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_match_cli_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.duration, Duration::from_secs(30));
        assert_eq!(settings.word_count, 50);
        assert!(!settings.show_history);
        assert_eq!(settings.dictionary, "default");
        assert_eq!(settings.history_path, None);
    }

    #[test]
    fn accepts_positive_values() {
        let settings = Settings::new(60, 25, true, "code").unwrap();
        assert_eq!(settings.duration, Duration::from_secs(60));
        assert_eq!(settings.word_count, 25);
        assert!(settings.show_history);
        assert_eq!(settings.dictionary, "code");
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert_matches!(
            Settings::new(0, 10, false, "default"),
            Err(ConfigError::NonPositiveDuration(0))
        );
        assert_matches!(
            Settings::new(-3, 10, false, "default"),
            Err(ConfigError::NonPositiveDuration(-3))
        );
    }

    #[test]
    fn rejects_non_positive_word_count() {
        assert_matches!(
            Settings::new(30, 0, false, "default"),
            Err(ConfigError::NonPositiveWordCount(0))
        );
    }

    #[test]
    fn rejects_blank_dictionary() {
        assert_matches!(
            Settings::new(30, 10, false, "  "),
            Err(ConfigError::EmptyDictionaryName)
        );
    }

    #[test]
    fn history_path_override() {
        let settings = Settings::default().with_history_path("/tmp/h.json");
        assert_eq!(settings.history_path, Some(PathBuf::from("/tmp/h.json")));
    }
}
