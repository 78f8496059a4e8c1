use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The one instruction a transmission is reduced to.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum Command {
    Turn,
    Climb,
    Descend,
    Maintain,
    Contact,
    Land,
    Takeoff,
}

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
pub enum Speaker {
    Pilot,
    Controller,
    #[default]
    Unknown,
}

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
pub enum MessageType {
    Clearance,
    Report,
    Acknowledgment,
    Handoff,
    Readback,
    Request,
    #[default]
    Other,
}

/// Structured fields of one transmission. Anything the text did not contain stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParsedTransmission {
    pub callsign: Option<String>,
    pub command: Option<Command>,
    pub heading: Option<u16>,
    pub flight_level: Option<u16>,
    pub speaker: Speaker,
    pub message_type: MessageType,
    pub airline: Option<String>,
}

impl ParsedTransmission {
    pub fn has_callsign(&self) -> bool {
        self.callsign.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_enum_names_are_lowercase() {
        assert_eq!(Command::Takeoff.to_string(), "takeoff");
        assert_eq!(Speaker::Controller.as_ref(), "controller");
        assert_eq!(MessageType::from_str("handoff").unwrap(), MessageType::Handoff);
    }

    #[test]
    fn test_default_is_empty_unknown_other() {
        let parsed = ParsedTransmission::default();
        assert_eq!(parsed.speaker, Speaker::Unknown);
        assert_eq!(parsed.message_type, MessageType::Other);
        assert!(!parsed.has_callsign());
    }

    #[test]
    fn test_json_shape_keeps_nulls() {
        let parsed = ParsedTransmission {
            callsign: Some("CSA634".into()),
            command: Some(Command::Turn),
            heading: Some(180),
            speaker: Speaker::Controller,
            message_type: MessageType::Clearance,
            airline: Some("Czech Airlines".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["callsign"], "CSA634");
        assert_eq!(json["command"], "turn");
        assert_eq!(json["heading"], 180);
        assert!(json["flight_level"].is_null());
        assert_eq!(json["speaker"], "controller");
        assert_eq!(json["message_type"], "clearance");
    }
}
