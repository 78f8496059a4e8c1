//! Single next action for the controller, picked from the current conflicts, the
//! latest transmission and the traffic picture.

use std::cmp::Reverse;

use aviation_helper_rs::clearance::transmission::{ParsedTransmission, Speaker};
use serde::{Deserialize, Serialize};

use crate::{conflict::Conflict, store::AircraftState};

const UNIDENTIFIED: &str = "Unidentified aircraft";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NextActionSuggestion {
    pub title: String,
    pub summary: String,
    pub rationale: String,
}

/// First match wins: worst conflict, then a pending pilot call, then a scan of the
/// most recently heard aircraft.
pub fn suggest_next_action<S: AsRef<AircraftState>>(
    conflicts: &[Conflict],
    latest: Option<&ParsedTransmission>,
    states: &[S],
) -> Option<NextActionSuggestion> {
    if let Some(conflict) = conflicts
        .iter()
        .min_by_key(|conflict| Reverse(conflict.severity))
    {
        return Some(NextActionSuggestion {
            title: format!("Resolve {} {} conflict", conflict.severity, conflict.kind),
            summary: conflict.resolution.clone(),
            rationale: conflict.description.clone(),
        });
    }

    let pilot_call = latest
        .filter(|parsed| parsed.speaker == Speaker::Pilot)
        .and_then(|parsed| Some((parsed, parsed.command?)));
    if let Some((parsed, command)) = pilot_call {
        let callsign = parsed.callsign.as_deref().unwrap_or(UNIDENTIFIED);
        return Some(NextActionSuggestion {
            title: format!("Acknowledge {callsign}"),
            summary: format!("Respond to {callsign} and confirm the {command} request."),
            rationale: format!("{callsign} called with a {command} request that is not yet answered."),
        });
    }

    states
        .iter()
        .map(|state| state.as_ref())
        .min_by(|a, b| {
            b.last_heard
                .cmp(&a.last_heard)
                .then_with(|| a.callsign.cmp(&b.callsign))
        })
        .map(|state| {
            let level = state
                .flight_level
                .map(|level| level.to_string())
                .unwrap_or_else(|| "unknown level".to_string());
            NextActionSuggestion {
                title: "Scan traffic".to_string(),
                summary: format!("Check on {} at {level}.", state.callsign),
                rationale: format!(
                    "No conflicts or pending calls; {} is the most recently heard aircraft.",
                    state.callsign
                ),
            }
        })
}
