//! Field extractor module
//!
//! Turns one normalized transcript into a [`ParsedTransmission`].
//! Example: "CSA six three four, turn right heading one eight zero" becomes
//! `callsign=CSA634, command=turn, heading=180, speaker=controller, message_type=clearance`.

use aviation_helper_rs::clearance::{
    airlines::AirlineTable,
    transmission::{Command, ParsedTransmission},
};
use log::debug;

use crate::{
    callsign::{CallsignAssembler, CallsignMode},
    classifier::{Cues, classify_message_type, classify_speaker},
    config::{ExtractorConfig, FlightLevelPolicy},
    phonetics::{Token, digit_run, tokenize},
};

const HEADING_DIGITS: usize = 3;
const MAX_HEADING: u16 = 359;

#[derive(Debug, Clone)]
pub struct FieldExtractor {
    assembler: CallsignAssembler,
    flight_level_policy: FlightLevelPolicy,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default(), AirlineTable::default())
    }
}

impl FieldExtractor {
    pub fn new(config: &ExtractorConfig, airlines: AirlineTable) -> Self {
        Self {
            assembler: CallsignAssembler::new(config, airlines),
            flight_level_policy: config.flight_level,
        }
    }

    pub fn airlines(&self) -> &AirlineTable {
        self.assembler.airlines()
    }

    /// Tokenizes and extracts in one go.
    pub fn parse(&self, text: &str, mode: CallsignMode) -> ParsedTransmission {
        self.extract(&tokenize(text), mode)
    }

    /// Best-effort extraction. Never fails; whatever the tokens do not contain stays `None`.
    pub fn extract(&self, tokens: &[Token], mode: CallsignMode) -> ParsedTransmission {
        let callsign = self.assembler.assemble(tokens, mode);
        let airline = callsign
            .as_deref()
            .and_then(|callsign| self.assembler.airline_for(callsign));
        let command = detect_command(tokens);
        let cues = Cues::new(tokens, callsign.is_some());

        let parsed = ParsedTransmission {
            heading: extract_heading(tokens),
            flight_level: extract_flight_level(tokens, &self.flight_level_policy),
            speaker: classify_speaker(&cues),
            message_type: classify_message_type(&cues),
            callsign,
            command,
            airline,
        };
        debug!("Extracted ({mode}): {parsed:?}");
        parsed
    }
}

/// `HEADING` followed by at least three digits; the first three are the heading.
pub fn extract_heading(tokens: &[Token]) -> Option<u16> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.is_word() && token.is("HEADING"))
        .find_map(|(index, _)| {
            let (digits, _) = digit_run(tokens, index + 1);
            if digits.len() < HEADING_DIGITS {
                return None;
            }
            let heading: u16 = digits[..HEADING_DIGITS].parse().ok()?;
            (heading <= MAX_HEADING).then_some(heading)
        })
}

/// `FLIGHT LEVEL` followed by a digit run, cut back into range by `policy`.
pub fn extract_flight_level(tokens: &[Token], policy: &FlightLevelPolicy) -> Option<u16> {
    tokens.windows(2).enumerate().find_map(|(index, pair)| {
        if !(pair[0].is("FLIGHT") && pair[1].is("LEVEL")) {
            return None;
        }
        let (digits, _) = digit_run(tokens, index + 2);
        policy.apply(&digits)
    })
}

/// First command keyword in the order spoken.
pub fn detect_command(tokens: &[Token]) -> Option<Command> {
    tokens.iter().enumerate().find_map(|(index, token)| {
        let previous = index.checked_sub(1).map(|previous| tokens[previous].raw.as_str());
        let next = tokens.get(index + 1).map(|next| next.raw.as_str());
        match token.raw.as_str() {
            "TURN" | "TURNING" => Some(Command::Turn),
            "CLIMB" | "CLIMBING" => Some(Command::Climb),
            "DESCEND" | "DESCENDING" | "DESCENT" => Some(Command::Descend),
            "MAINTAIN" | "MAINTAINING" => Some(Command::Maintain),
            "CONTACT" if previous != Some("RADAR") => Some(Command::Contact),
            "LAND" | "LANDING" => Some(Command::Land),
            "TAKEOFF" => Some(Command::Takeoff),
            "TAKE" if next == Some("OFF") => Some(Command::Takeoff),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviation_helper_rs::clearance::transmission::{MessageType, Speaker};

    use std::sync::LazyLock;

    static EXTRACTOR: LazyLock<FieldExtractor> = LazyLock::new(FieldExtractor::default);

    fn heading(text: &str) -> Option<u16> {
        extract_heading(&tokenize(text))
    }

    fn flight_level(text: &str) -> Option<u16> {
        extract_flight_level(&tokenize(text), &FlightLevelPolicy::default())
    }

    fn command(text: &str) -> Option<Command> {
        detect_command(&tokenize(text))
    }

    #[test]
    fn test_turn_clearance() {
        let parsed = EXTRACTOR.parse(
            "CSA SIX THREE FOUR TURN RIGHT HEADING ONE EIGHT ZERO",
            CallsignMode::Enhanced,
        );
        assert_eq!(parsed.callsign.as_deref(), Some("CSA634"));
        assert_eq!(parsed.heading, Some(180));
        assert_eq!(parsed.command, Some(Command::Turn));
        assert_eq!(parsed.speaker, Speaker::Controller);
        assert_eq!(parsed.message_type, MessageType::Clearance);
        assert_eq!(parsed.airline.as_deref(), Some("Czech Airlines"));
        assert_eq!(parsed.flight_level, None);
    }

    #[test]
    fn test_roger() {
        let parsed = EXTRACTOR.parse("ROGER", CallsignMode::Enhanced);
        assert_eq!(parsed.speaker, Speaker::Pilot);
        assert_eq!(parsed.callsign, None);
        assert_eq!(parsed.command, None);
        assert_eq!(parsed.airline, None);
        assert_eq!(parsed.message_type, MessageType::Acknowledgment);
    }

    #[test]
    fn test_facility_prefix_airline() {
        let text = "PRAHA RADAR HELLO LUFTHANSA FIVE MIKE ECHO";
        let enhanced = EXTRACTOR.parse(text, CallsignMode::Enhanced);
        assert_eq!(enhanced.callsign.as_deref(), Some("LUFTHANSA5"));
        assert_eq!(enhanced.airline.as_deref(), Some("Lufthansa"));
        let baseline = EXTRACTOR.parse(text, CallsignMode::Baseline);
        assert_eq!(baseline.callsign.as_deref(), Some("RADARHELLOLUFTHANSA5"));
        assert_eq!(baseline.airline, None);
    }

    #[test]
    fn test_heading() {
        assert_eq!(heading("HEADING ZERO NINE ZERO"), Some(90));
        assert_eq!(heading("heading 270"), Some(270));
        assert_eq!(heading("HEADING 3 5 9"), Some(359));
        assert_eq!(heading("HEADING 3 6 0"), None);
        assert_eq!(heading("HEADING 9 9"), None);
        assert_eq!(heading("HEADING"), None);
        assert_eq!(heading("TURN LEFT 270"), None);
        assert_eq!(heading("HEADING 2 7 0 1"), Some(270));
    }

    #[test]
    fn test_flight_level_truncation() {
        assert_eq!(flight_level("FLIGHT LEVEL FIVE"), Some(5));
        assert_eq!(flight_level("FLIGHT LEVEL TWO FOUR"), Some(24));
        assert_eq!(flight_level("FLIGHT LEVEL THREE THREE ZERO"), Some(330));
        assert_eq!(flight_level("FLIGHT LEVEL THREE THREE ZERO THREE"), Some(330));
        assert_eq!(flight_level("FLIGHT LEVEL 9 9 9 9 9"), Some(99));
        assert_eq!(flight_level("FLIGHT LEVEL 6 5 0 1 2 3"), Some(65));
        assert_eq!(flight_level("FLIGHT LEVEL"), None);
        assert_eq!(flight_level("LEVEL FLIGHT 330"), None);
    }

    #[test]
    fn test_flight_level_skips_leading_numbers() {
        assert_eq!(
            flight_level("FOUR SIX ZERO FLIGHT LEVEL THREE THREE ZERO THREE ONE ZERO"),
            Some(330)
        );
    }

    #[test]
    fn test_commands_in_encounter_order() {
        assert_eq!(command("TURN LEFT THEN CLIMB"), Some(Command::Turn));
        assert_eq!(command("CLIMB AND MAINTAIN"), Some(Command::Climb));
        assert_eq!(command("DESCENDING FLIGHT LEVEL 240"), Some(Command::Descend));
        assert_eq!(command("MAINTAIN FLIGHT LEVEL 330"), Some(Command::Maintain));
        assert_eq!(command("CONTACT TOWER"), Some(Command::Contact));
        assert_eq!(command("CLEARED TO LAND"), Some(Command::Land));
        assert_eq!(command("CLEARED FOR TAKE OFF"), Some(Command::Takeoff));
        assert_eq!(command("CLEARED FOR TAKEOFF"), Some(Command::Takeoff));
        assert_eq!(command("GOOD MORNING"), None);
    }

    #[test]
    fn test_radar_contact_is_not_a_command() {
        assert_eq!(command("RADAR CONTACT"), None);
        assert_eq!(command("RADAR CONTACT CLIMB"), Some(Command::Climb));
    }

    #[test]
    fn test_pilot_readback() {
        let parsed = EXTRACTOR.parse(
            "descending flight level two four zero, lufthansa five",
            CallsignMode::Enhanced,
        );
        assert_eq!(parsed.callsign.as_deref(), Some("LUFTHANSA5"));
        assert_eq!(parsed.command, Some(Command::Descend));
        assert_eq!(parsed.flight_level, Some(240));
        assert_eq!(parsed.speaker, Speaker::Pilot);
        assert_eq!(parsed.message_type, MessageType::Readback);
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(
            EXTRACTOR.parse("", CallsignMode::Enhanced),
            ParsedTransmission::default()
        );
    }
}
