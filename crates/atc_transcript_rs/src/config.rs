use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Tokens after a leading facility/greeting run in which an airline name must appear
/// for the run to be discarded.
pub const DEFAULT_PREFIX_LOOKAHEAD: usize = 4;
pub const DEFAULT_MAX_CALLSIGN_NAME_WORDS: usize = 3;
pub const DEFAULT_MAX_FLIGHT_NUMBER_DIGITS: usize = 4;

const DEFAULT_FACILITY_WORDS: &[&str] = &[
    "PRAHA",
    "PRAGA",
    "PRAGUE",
    "RADAR",
    "TOWER",
    "APPROACH",
    "DEPARTURE",
    "GROUND",
    "CENTER",
    "CENTRE",
    "CONTROL",
    "DELIVERY",
];

const DEFAULT_GREETING_WORDS: &[&str] = &[
    "HELLO",
    "HI",
    "GOOD",
    "MORNING",
    "AFTERNOON",
    "EVENING",
    "DAY",
    "SERVUS",
];

/// How an over-long flight level digit run is cut back into range.
///
/// The first `max_digits` digits are kept, then trailing digits are dropped while the
/// value still exceeds `max_level`: `3303` → `330`, `999` → `99`, `601` → `60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FlightLevelPolicy {
    pub max_digits: usize,
    pub max_level: u16,
}

impl Default for FlightLevelPolicy {
    fn default() -> Self {
        Self {
            max_digits: 3,
            max_level: 600,
        }
    }
}

impl FlightLevelPolicy {
    /// `digits` must be ASCII digits. `None` only for an empty run.
    pub fn apply(&self, digits: &str) -> Option<u16> {
        let kept = &digits[..digits.len().min(self.max_digits)];
        let mut value: u64 = kept.parse().ok()?;
        while value > u64::from(self.max_level) {
            value /= 10;
        }
        u16::try_from(value).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub prefix_lookahead: usize,
    pub max_callsign_name_words: usize,
    pub max_flight_number_digits: usize,
    pub flight_level: FlightLevelPolicy,
    pub facility_words: Vec<String>,
    pub greeting_words: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            prefix_lookahead: DEFAULT_PREFIX_LOOKAHEAD,
            max_callsign_name_words: DEFAULT_MAX_CALLSIGN_NAME_WORDS,
            max_flight_number_digits: DEFAULT_MAX_FLIGHT_NUMBER_DIGITS,
            flight_level: FlightLevelPolicy::default(),
            facility_words: DEFAULT_FACILITY_WORDS.iter().map(|w| w.to_string()).collect(),
            greeting_words: DEFAULT_GREETING_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl ExtractorConfig {
    /// Load extractor configuration from a RON file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: ExtractorConfig = ron::from_str(&contents)?;
        Ok(config)
    }

    /// Load extractor configuration from the crate's resources
    pub fn load_default() -> Result<Self, Error> {
        Self::load_from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/parser/extractor_config.ron"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_level_policy_boundaries() {
        let policy = FlightLevelPolicy::default();
        assert_eq!(policy.apply(""), None);
        assert_eq!(policy.apply("5"), Some(5));
        assert_eq!(policy.apply("24"), Some(24));
        assert_eq!(policy.apply("330"), Some(330));
        assert_eq!(policy.apply("600"), Some(600));
        assert_eq!(policy.apply("601"), Some(60));
        assert_eq!(policy.apply("999"), Some(99));
        assert_eq!(policy.apply("3303"), Some(330));
        assert_eq!(policy.apply("33031"), Some(330));
        assert_eq!(policy.apply("460330"), Some(460));
        assert_eq!(policy.apply("000"), Some(0));
    }

    #[test]
    fn test_flight_level_policy_custom() {
        let policy = FlightLevelPolicy {
            max_digits: 2,
            max_level: 45,
        };
        assert_eq!(policy.apply("330"), Some(33));
        assert_eq!(policy.apply("47"), Some(4));
        assert_eq!(policy.apply("45"), Some(45));
    }

    #[test]
    fn test_default_resource_matches_defaults() {
        let config = ExtractorConfig::load_default().unwrap();
        assert_eq!(config, ExtractorConfig::default());
    }

    #[test]
    fn test_partial_ron_falls_back_to_defaults() {
        let config: ExtractorConfig = ron::from_str("(prefix_lookahead: 2)").unwrap();
        assert_eq!(config.prefix_lookahead, 2);
        assert_eq!(config.max_callsign_name_words, DEFAULT_MAX_CALLSIGN_NAME_WORDS);
        assert_eq!(config.flight_level, FlightLevelPolicy::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ExtractorConfig::load_from_file("/nonexistent/extractor_config.ron"),
            Err(Error::StdIo(_))
        ));
    }
}
