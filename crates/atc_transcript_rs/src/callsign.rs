//! Callsign assembly
//!
//! The shared assembly rule takes the first digit run that follows name-like words and
//! joins at most `max_callsign_name_words` of those words with the flight number:
//! `"RADAR HELLO LUFTHANSA FIVE"` → `RADARHELLOLUFTHANSA5`. Enhanced mode first discards a
//! leading facility/greeting run when an airline name follows it closely, so the same
//! transcript yields `LUFTHANSA5`.

use std::{collections::HashSet, sync::LazyLock};

use aviation_helper_rs::clearance::airlines::AirlineTable;
use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
    config::ExtractorConfig,
    phonetics::{Token, TokenKind, digit_run},
};

/// ATC phraseology. None of these words is ever part of a spoken callsign.
const PHRASEOLOGY_WORDS: &[&str] = &[
    "AFFIRM",
    "AFFIRMATIVE",
    "AFTER",
    "AGAIN",
    "ALSO",
    "ALTITUDE",
    "AND",
    "APPROACHING",
    "AT",
    "BEFORE",
    "BEHIND",
    "BY",
    "CLEARED",
    "CLIMB",
    "CLIMBING",
    "CONTACT",
    "COPIED",
    "CORRECT",
    "DECIMAL",
    "DESCEND",
    "DESCENDING",
    "DESCENT",
    "DIRECT",
    "ESTABLISHED",
    "EXPECT",
    "EXPEDITE",
    "FEET",
    "FL",
    "FLIGHT",
    "FLY",
    "FOR",
    "FREQUENCY",
    "HEADING",
    "HOLD",
    "HOLDING",
    "IDENT",
    "IDENTIFIED",
    "ILS",
    "IMMEDIATELY",
    "INCREASE",
    "INFORMATION",
    "KNOTS",
    "LAND",
    "LANDING",
    "LEAVING",
    "LEFT",
    "LEVEL",
    "LINE",
    "MAINTAIN",
    "MAINTAINING",
    "MONITOR",
    "NEGATIVE",
    "NOW",
    "NUMBER",
    "OF",
    "OFF",
    "ON",
    "PASSING",
    "PLEASE",
    "POINT",
    "PROCEED",
    "QNH",
    "REACHING",
    "REDUCE",
    "REPORT",
    "REQUEST",
    "REQUESTING",
    "RIGHT",
    "ROGER",
    "RUNWAY",
    "SAY",
    "SHORT",
    "SPEED",
    "SQUAWK",
    "STANDBY",
    "TAKE",
    "TAKEOFF",
    "TAXI",
    "THANK",
    "THANKS",
    "THE",
    "THEN",
    "TO",
    "TRAFFIC",
    "TURN",
    "TURNING",
    "UNTIL",
    "UP",
    "VACATE",
    "VIA",
    "WAIT",
    "WILCO",
    "WITH",
    "YOU",
    "YOUR",
];

static COMPACT_CALLSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,})(\d{1,4})([A-Z]?)$").unwrap());

struct SpokenCallsign {
    callsign: String,
    /// The name run contains an airline callsign or ICAO designator
    anchored: bool,
}

/// Which callsign assembly a call runs.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CallsignMode {
    /// The plain assembly rule on the untouched transcript.
    Baseline,
    /// Facility/greeting prefix discarded before assembly.
    #[default]
    Enhanced,
}

pub fn is_phraseology(word: &str) -> bool {
    PHRASEOLOGY_WORDS.binary_search(&word).is_ok()
}

#[derive(Debug, Clone)]
pub struct CallsignAssembler {
    airlines: AirlineTable,
    prefix_words: HashSet<String>,
    prefix_lookahead: usize,
    max_name_words: usize,
    max_flight_number_digits: usize,
}

impl CallsignAssembler {
    pub fn new(config: &ExtractorConfig, airlines: AirlineTable) -> Self {
        let prefix_words = config
            .facility_words
            .iter()
            .chain(&config.greeting_words)
            .map(|word| word.to_uppercase())
            .collect();
        Self {
            airlines,
            prefix_words,
            prefix_lookahead: config.prefix_lookahead,
            max_name_words: config.max_callsign_name_words,
            max_flight_number_digits: config.max_flight_number_digits,
        }
    }

    pub fn airlines(&self) -> &AirlineTable {
        &self.airlines
    }

    pub fn assemble(&self, tokens: &[Token], mode: CallsignMode) -> Option<String> {
        let tokens = match mode {
            CallsignMode::Baseline => tokens,
            CallsignMode::Enhanced => self.strip_facility_prefix(tokens),
        };
        let spoken = self.spoken_candidates(tokens);
        // Airline-anchored spoken callsign, then a compact token with a known airline,
        // then any spoken name run, then any compact token
        let callsign = spoken
            .iter()
            .find(|candidate| candidate.anchored)
            .map(|candidate| candidate.callsign.clone())
            .or_else(|| self.compact_callsign(tokens, true))
            .or_else(|| spoken.first().map(|candidate| candidate.callsign.clone()))
            .or_else(|| self.compact_callsign(tokens, false));
        debug!("Callsign ({mode}): {callsign:?}");
        callsign
    }

    /// Drops a leading run of facility and greeting words if an airline name appears
    /// within `prefix_lookahead` tokens after it. Name-like words between the run and
    /// the airline go with it. Without such an airline the tokens come back untouched.
    pub fn strip_facility_prefix<'a>(&self, tokens: &'a [Token]) -> &'a [Token] {
        let run_len = tokens
            .iter()
            .take_while(|token| token.is_word() && self.prefix_words.contains(&token.raw))
            .count();
        if run_len == 0 {
            return tokens;
        }
        let window_end = (run_len + self.prefix_lookahead).min(tokens.len());
        for (index, token) in tokens.iter().enumerate().take(window_end).skip(run_len) {
            if self.is_airline_token(token) {
                trace!("Discarding {index} prefix tokens before {}", token.raw);
                return &tokens[index..];
            }
            if !self.is_name_like(token) {
                break;
            }
        }
        tokens
    }

    /// Spoken airline callsign (`LUFTHANSA`, `DELTA`) or ICAO designator (`DLH`).
    pub fn is_airline_token(&self, token: &Token) -> bool {
        !token.is_digits() && self.airlines.display_name(&token.raw).is_some()
    }

    /// Whether the token can be part of the name in front of a flight number.
    pub fn is_name_like(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Word => {
                token.raw.len() >= 2
                    && token.raw.chars().all(|c| c.is_ascii_alphabetic())
                    && !is_phraseology(&token.raw)
            }
            TokenKind::Letter => self.airlines.is_airline(&token.raw),
            TokenKind::Digits => false,
        }
    }

    /// Every name run followed by a flight number, in transcript order.
    fn spoken_candidates(&self, tokens: &[Token]) -> Vec<SpokenCallsign> {
        let mut candidates = Vec::new();
        let mut index = 0;
        while index < tokens.len() {
            if !tokens[index].is_digits() {
                index += 1;
                continue;
            }
            let (digits, consumed) = digit_run(tokens, index);
            if let Some((prefix, anchored)) = self.prefix_before(&tokens[..index]) {
                let number: String = digits.chars().take(self.max_flight_number_digits).collect();
                let suffix = suffix_after(&tokens[index + consumed..]);
                candidates.push(SpokenCallsign {
                    callsign: format!("{prefix}{number}{suffix}"),
                    anchored,
                });
            }
            index += consumed;
        }
        candidates
    }

    /// Name in front of a flight number, and whether it contains an airline.
    fn prefix_before(&self, preceding: &[Token]) -> Option<(String, bool)> {
        let letters = preceding
            .iter()
            .rev()
            .take_while(|token| token.is_letter())
            .count();
        if letters >= 2 {
            let spelled: String = preceding[preceding.len() - letters..]
                .iter()
                .map(|token| token.text.as_str())
                .collect();
            let anchored = self.airlines.display_name(&spelled).is_some();
            return Some((spelled, anchored));
        }

        let mut names: Vec<&Token> = preceding
            .iter()
            .rev()
            .take_while(|token| self.is_name_like(token))
            .take(self.max_name_words)
            .collect();
        if names.is_empty() {
            return None;
        }
        names.reverse();
        let anchored = names.iter().any(|token| self.is_airline_token(token));
        let prefix = names.iter().map(|token| token.raw.as_str()).collect();
        Some((prefix, anchored))
    }

    /// Single token such as `CSA634`. With `known_airline` its letters must name an
    /// airline.
    fn compact_callsign(&self, tokens: &[Token], known_airline: bool) -> Option<String> {
        tokens
            .iter()
            .filter(|token| token.is_word())
            .find(|token| {
                COMPACT_CALLSIGN.captures(&token.raw).is_some_and(|captures| {
                    !is_phraseology(&captures[1])
                        && (!known_airline || self.airlines.display_name(&captures[1]).is_some())
                })
            })
            .map(|token| token.raw.clone())
    }

    pub fn airline_for(&self, callsign: &str) -> Option<String> {
        self.airlines
            .airline_for_callsign(callsign)
            .map(str::to_string)
    }
}

/// A single letter right after the flight number is a suffix; two or more are not.
fn suffix_after(following: &[Token]) -> &str {
    match following {
        [letter, rest @ ..] if letter.is_letter() && !rest.first().is_some_and(Token::is_letter) => {
            &letter.text
        }
        _ => "",
    }
}
