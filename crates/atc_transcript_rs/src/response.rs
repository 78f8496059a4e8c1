//! Controller replies to a parsed transmission.

use aviation_helper_rs::clearance::transmission::{Command, ParsedTransmission, Speaker};

use crate::phonetics::expand_callsign_inline;

const UNKNOWN_STATION: &str = "Aircraft";

/// Deterministic reply text. Pilot calls get a controller approval, controller
/// instructions get the matching pilot readback.
pub fn controller_response(parsed: &ParsedTransmission) -> String {
    let callsign = parsed.callsign.as_deref().unwrap_or(UNKNOWN_STATION);
    let level = parsed.flight_level.unwrap_or(0);
    let heading = parsed.heading.unwrap_or(0);

    match (parsed.speaker, parsed.command) {
        (Speaker::Pilot, Some(Command::Descend)) => {
            format!("{callsign}, roger. Descend to flight level {level} approved.")
        }
        (Speaker::Pilot, Some(Command::Climb)) => {
            format!("{callsign}, roger. Climb and maintain flight level {level} approved.")
        }
        (Speaker::Pilot, Some(Command::Turn)) => {
            format!("{callsign}, roger. Turn heading {heading} approved.")
        }
        (Speaker::Pilot, Some(Command::Maintain)) => {
            format!("{callsign}, roger. Maintain current flight level {level}.")
        }
        (Speaker::Pilot, _) => format!("{callsign}, say again."),
        (Speaker::Controller, Some(Command::Descend)) => {
            format!("{callsign}, wilco. Descending to flight level {level}.")
        }
        (Speaker::Controller, Some(Command::Climb)) => {
            format!("{callsign}, wilco. Climbing to flight level {level}.")
        }
        (Speaker::Controller, Some(Command::Turn)) => {
            format!("{callsign}, wilco. Turning heading {heading}.")
        }
        (Speaker::Controller, Some(Command::Maintain)) => {
            format!("{callsign}, wilco. Maintaining flight level {level}.")
        }
        (Speaker::Controller, _) => format!("{callsign}, wilco."),
        (Speaker::Unknown, _) => format!("{callsign}, say again, transmission unclear."),
    }
}

/// [`controller_response`] with the callsign spelled out for speech synthesis.
pub fn spoken_response(parsed: &ParsedTransmission) -> String {
    expand_callsign_inline(&controller_response(parsed), parsed.callsign.as_deref())
}
