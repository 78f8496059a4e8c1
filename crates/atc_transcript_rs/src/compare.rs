//! Side by side runs of both callsign modes, and per-field coverage over a batch.

use std::collections::BTreeMap;

use aviation_helper_rs::clearance::transmission::{MessageType, ParsedTransmission, Speaker};
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{callsign::CallsignMode, extractor::FieldExtractor, phonetics::tokenize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Callsign,
    Command,
    Heading,
    FlightLevel,
    Speaker,
    MessageType,
    Airline,
}

impl Field {
    /// Whether the field carries information. `unknown` speakers and `other` message
    /// types count as absent.
    pub fn is_present(&self, parsed: &ParsedTransmission) -> bool {
        match self {
            Field::Callsign => parsed.callsign.is_some(),
            Field::Command => parsed.command.is_some(),
            Field::Heading => parsed.heading.is_some(),
            Field::FlightLevel => parsed.flight_level.is_some(),
            Field::Speaker => parsed.speaker != Speaker::Unknown,
            Field::MessageType => parsed.message_type != MessageType::Other,
            Field::Airline => parsed.airline.is_some(),
        }
    }

    pub fn differs(&self, a: &ParsedTransmission, b: &ParsedTransmission) -> bool {
        match self {
            Field::Callsign => a.callsign != b.callsign,
            Field::Command => a.command != b.command,
            Field::Heading => a.heading != b.heading,
            Field::FlightLevel => a.flight_level != b.flight_level,
            Field::Speaker => a.speaker != b.speaker,
            Field::MessageType => a.message_type != b.message_type,
            Field::Airline => a.airline != b.airline,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeComparison {
    pub text: String,
    pub baseline: ParsedTransmission,
    pub enhanced: ParsedTransmission,
    pub changed: Vec<Field>,
}

pub fn compare_modes(extractor: &FieldExtractor, text: &str) -> ModeComparison {
    let tokens = tokenize(text);
    let baseline = extractor.extract(&tokens, CallsignMode::Baseline);
    let enhanced = extractor.extract(&tokens, CallsignMode::Enhanced);
    let changed = Field::iter()
        .filter(|field| field.differs(&baseline, &enhanced))
        .collect();
    ModeComparison {
        text: text.to_string(),
        baseline,
        enhanced,
        changed,
    }
}

/// How many transcripts of a batch produced each field, per mode.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldCoverage {
    pub transcripts: usize,
    /// Transcripts where the two modes disagree on any field.
    pub changed: usize,
    pub baseline: BTreeMap<Field, usize>,
    pub enhanced: BTreeMap<Field, usize>,
}

impl FieldCoverage {
    pub fn from_comparisons<'a>(comparisons: impl IntoIterator<Item = &'a ModeComparison>) -> Self {
        let mut coverage = Self::default();
        for comparison in comparisons {
            coverage.add(comparison);
        }
        coverage
    }

    pub fn add(&mut self, comparison: &ModeComparison) {
        self.transcripts += 1;
        if !comparison.changed.is_empty() {
            self.changed += 1;
        }
        for field in Field::iter() {
            *self.baseline.entry(field).or_default() +=
                usize::from(field.is_present(&comparison.baseline));
            *self.enhanced.entry(field).or_default() +=
                usize::from(field.is_present(&comparison.enhanced));
        }
    }

    pub fn baseline_count(&self, field: Field) -> usize {
        self.baseline.get(&field).copied().unwrap_or(0)
    }

    pub fn enhanced_count(&self, field: Field) -> usize {
        self.enhanced.get(&field).copied().unwrap_or(0)
    }
}
