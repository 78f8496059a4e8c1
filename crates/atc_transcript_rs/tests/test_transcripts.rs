//! Tests against a corpus of real-world style transcripts
//!
//! The RON index lists transcripts with the fields the extractor should produce, and a
//! corpus without facility/greeting prefixes on which both callsign modes must agree.

use atc_transcript_rs::{
    CallsignMode, ExtractorConfig, FieldExtractor, ParsedTransmission, compare_modes,
};
use aviation_helper_rs::clearance::airlines::{AirlineTable, Airlines};
use serde::Deserialize;
use std::{collections::HashMap, sync::LazyLock};

static AIRLINES: LazyLock<Airlines> =
    LazyLock::new(|| Airlines::load_airlines_from_file().unwrap());

static EXTRACTOR: LazyLock<FieldExtractor> = LazyLock::new(|| {
    let config = ExtractorConfig::load_default().expect("Failed to load extractor config");
    FieldExtractor::new(&config, AirlineTable::with_airlines(&AIRLINES))
});

static TEST_TRANSCRIPTS_INDEX: LazyLock<TestTranscriptsIndex> =
    LazyLock::new(TestTranscriptsIndex::load_from_file);

#[derive(Debug, Deserialize)]
struct TestTranscript {
    text: String,
    baseline_callsign: Option<String>,
    expected: ParsedTransmission,
}

#[derive(Debug, Deserialize)]
struct TestTranscriptsIndex {
    entries: HashMap<String, TestTranscript>,
    no_prefix_corpus: Vec<String>,
}

impl TestTranscriptsIndex {
    fn load_from_file() -> Self {
        let content = std::fs::read_to_string(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/test-transcripts/index.ron"
        ))
        .expect("Failed to read test transcripts index");

        ron::from_str(&content).expect("Failed to parse test transcripts index")
    }

    fn all_texts(&self) -> impl Iterator<Item = &str> {
        self.entries
            .values()
            .map(|entry| entry.text.as_str())
            .chain(self.no_prefix_corpus.iter().map(String::as_str))
    }
}

#[test]
fn test_enhanced_entries() {
    for (name, entry) in &TEST_TRANSCRIPTS_INDEX.entries {
        let parsed = EXTRACTOR.parse(&entry.text, CallsignMode::Enhanced);
        assert_eq!(parsed, entry.expected, "entry '{name}': {}", entry.text);
    }
}

#[test]
fn test_baseline_callsigns() {
    for (name, entry) in &TEST_TRANSCRIPTS_INDEX.entries {
        let parsed = EXTRACTOR.parse(&entry.text, CallsignMode::Baseline);
        assert_eq!(
            parsed.callsign, entry.baseline_callsign,
            "entry '{name}': {}",
            entry.text
        );
    }
}

#[test]
fn test_enhanced_never_degrades_without_prefix() {
    for text in &TEST_TRANSCRIPTS_INDEX.no_prefix_corpus {
        let comparison = compare_modes(&EXTRACTOR, text);
        assert_eq!(comparison.baseline, comparison.enhanced, "{text}");
        assert!(comparison.changed.is_empty(), "{text}");
    }
}

#[test]
fn test_extraction_is_idempotent() {
    for text in TEST_TRANSCRIPTS_INDEX.all_texts() {
        for mode in [CallsignMode::Baseline, CallsignMode::Enhanced] {
            assert_eq!(EXTRACTOR.parse(text, mode), EXTRACTOR.parse(text, mode), "{text}");
        }
    }
}

#[test]
fn test_numeric_fields_stay_in_range() {
    for text in TEST_TRANSCRIPTS_INDEX.all_texts() {
        for mode in [CallsignMode::Baseline, CallsignMode::Enhanced] {
            let parsed = EXTRACTOR.parse(text, mode);
            assert!(parsed.heading.is_none_or(|heading| heading <= 359), "{text}");
            assert!(
                parsed.flight_level.is_none_or(|level| level <= 600),
                "{text}"
            );
            if parsed.callsign.is_none() {
                assert_eq!(parsed.airline, None, "{text}");
            }
        }
    }
}

#[test]
fn test_loaded_airlines_extend_builtin_table() {
    let table = EXTRACTOR.airlines();
    assert_eq!(table.display_name("SILVERSKY"), Some("Silver Sky"));
    assert_eq!(table.display_name("LUFTHANSA"), Some("Lufthansa"));
    assert!(!table.is_airline("SOUTHERN AIR"));
}
