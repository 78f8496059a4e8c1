//! Speaker and message type classification
//!
//! Both classifications are plain data: an ordered rule table for the speaker where
//! the first match wins, and a keyword table for the message type where the highest
//! overlap wins and earlier rows win ties.

use std::collections::HashSet;

use aviation_helper_rs::clearance::transmission::{MessageType, Speaker};
use log::trace;

use crate::phonetics::Token;

const IMPERATIVE_VERBS: &[&str] = &[
    "CLEARED", "CLIMB", "CONTACT", "DESCEND", "EXPEDITE", "FLY", "HOLD", "INCREASE",
    "MAINTAIN", "PROCEED", "REDUCE", "SQUAWK", "TURN",
];

const ACKNOWLEDGMENT_WORDS: &[&str] = &["ROGER", "WILCO", "THANKS"];

const READBACK_VERBS: &[&str] = &[
    "CLIMBING",
    "DESCENDING",
    "LEAVING",
    "MAINTAINING",
    "TURNING",
];

/// The words of one transmission as the classification rules see them.
#[derive(Debug, Clone)]
pub struct Cues<'a> {
    words: Vec<&'a str>,
    word_set: HashSet<&'a str>,
    pub has_callsign: bool,
}

impl<'a> Cues<'a> {
    /// `RADAR CONTACT` is a position statement, so its `CONTACT` is left out of the set.
    pub fn new(tokens: &'a [Token], has_callsign: bool) -> Self {
        let words: Vec<&str> = tokens.iter().map(|token| token.raw.as_str()).collect();
        let word_set = words
            .iter()
            .enumerate()
            .filter(|(index, word)| {
                **word != "CONTACT" || *index == 0 || words[index - 1] != "RADAR"
            })
            .map(|(_, word)| *word)
            .collect();
        Self {
            words,
            word_set,
            has_callsign,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_set.contains(word)
    }

    pub fn contains_any(&self, words: &[&str]) -> bool {
        words.iter().any(|word| self.contains(word))
    }

    /// Number of distinct `keywords` present.
    pub fn overlap(&self, keywords: &[&str]) -> usize {
        keywords.iter().filter(|word| self.contains(word)).count()
    }

    pub fn contains_phrase(&self, phrase: &[&str]) -> bool {
        !phrase.is_empty() && self.words.windows(phrase.len()).any(|window| window == phrase)
    }

    pub fn has_imperative(&self) -> bool {
        self.contains_any(IMPERATIVE_VERBS)
    }

    pub fn is_acknowledgment(&self) -> bool {
        self.contains_any(ACKNOWLEDGMENT_WORDS) || self.contains_phrase(&["THANK", "YOU"])
    }
}

pub struct SpeakerRule {
    pub name: &'static str,
    pub speaker: Speaker,
    pub applies: fn(&Cues) -> bool,
}

fn acknowledges(cues: &Cues) -> bool {
    cues.is_acknowledgment() && !cues.has_imperative()
}

fn instructs_aircraft(cues: &Cues) -> bool {
    cues.has_callsign && cues.has_imperative()
}

fn reads_back(cues: &Cues) -> bool {
    cues.contains_any(READBACK_VERBS)
}

pub const SPEAKER_RULES: &[SpeakerRule] = &[
    SpeakerRule {
        name: "acknowledgment",
        speaker: Speaker::Pilot,
        applies: acknowledges,
    },
    SpeakerRule {
        name: "instruction",
        speaker: Speaker::Controller,
        applies: instructs_aircraft,
    },
    SpeakerRule {
        name: "readback",
        speaker: Speaker::Pilot,
        applies: reads_back,
    },
];

pub const MESSAGE_TYPE_KEYWORDS: &[(MessageType, &[&str])] = &[
    (
        MessageType::Acknowledgment,
        &["AFFIRM", "COPIED", "CORRECT", "ROGER", "THANK", "THANKS", "WILCO"],
    ),
    (
        MessageType::Handoff,
        &["CONTACT", "DECIMAL", "FREQUENCY", "MONITOR", "POINT"],
    ),
    (MessageType::Readback, READBACK_VERBS),
    (
        MessageType::Clearance,
        &["CLEARED", "CLIMB", "DESCEND", "MAINTAIN", "TURN"],
    ),
    (
        MessageType::Report,
        &["APPROACHING", "LEVEL", "PASSING", "REACHING"],
    ),
    (MessageType::Request, &["REQUEST", "REQUESTING"]),
];

pub fn classify_speaker(cues: &Cues) -> Speaker {
    SPEAKER_RULES
        .iter()
        .find(|rule| (rule.applies)(cues))
        .map_or(Speaker::Unknown, |rule| {
            trace!("Speaker rule '{}' matched", rule.name);
            rule.speaker
        })
}

pub fn classify_message_type(cues: &Cues) -> MessageType {
    let mut best = (MessageType::Other, 0);
    for (message_type, keywords) in MESSAGE_TYPE_KEYWORDS {
        let score = cues.overlap(keywords);
        if score > best.1 {
            best = (*message_type, score);
        }
    }
    best.0
}
