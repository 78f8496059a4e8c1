//! Aircraft state store
//!
//! In-memory map from callsign to the last known state of that aircraft. Every entry
//! is an `Arc<AircraftState>` that is replaced as a whole under the write lock, so
//! a reader holding a snapshot never sees a half-applied update.
//! Simulated entries can additionally be changed through [`AirspaceStore::perturb_simulated`];
//! live entries never go through that path.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use aviation_helper_rs::{
    clearance::transmission::{Command, ParsedTransmission, Speaker},
    types::{altitude::FlightLevel, heading::Heading, position::Position},
};
use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Origin {
    #[default]
    Live,
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AircraftState {
    pub callsign: String,
    pub heading: Option<Heading>,
    pub flight_level: Option<FlightLevel>,
    /// Knots
    pub speed: Option<f64>,
    pub command: Option<Command>,
    pub speaker: Option<Speaker>,
    pub position: Option<Position>,
    pub last_heard: DateTime<Utc>,
    pub origin: Origin,
}

impl AircraftState {
    fn new(callsign: &str, timestamp: DateTime<Utc>, origin: Origin) -> Self {
        Self {
            callsign: callsign.to_string(),
            heading: None,
            flight_level: None,
            speed: None,
            command: None,
            speaker: None,
            position: None,
            last_heard: timestamp,
            origin,
        }
    }

    /// New non-null values overwrite, nulls never erase.
    pub fn merged(&self, patch: &StatePatch, timestamp: DateTime<Utc>) -> Self {
        Self {
            callsign: self.callsign.clone(),
            heading: patch.heading.or(self.heading),
            flight_level: patch.flight_level.or(self.flight_level),
            speed: patch.speed.or(self.speed),
            command: patch.command.or(self.command),
            speaker: patch.speaker.or(self.speaker),
            position: patch.position.or(self.position),
            last_heard: self.last_heard.max(timestamp),
            origin: self.origin,
        }
    }

    /// Fills only the fields still unknown.
    fn filled(&self, patch: &StatePatch) -> Self {
        Self {
            heading: self.heading.or(patch.heading),
            flight_level: self.flight_level.or(patch.flight_level),
            speed: self.speed.or(patch.speed),
            position: self.position.or(patch.position),
            ..self.clone()
        }
    }

    pub fn has_kinematics(&self) -> bool {
        self.heading.is_some()
            || self.flight_level.is_some()
            || self.speed.is_some()
            || self.position.is_some()
    }

    pub fn is_simulated(&self) -> bool {
        self.origin == Origin::Simulated
    }

    pub fn is_stale(&self, now: DateTime<Utc>, horizon: Duration) -> bool {
        now - self.last_heard > horizon
    }
}

/// Partial update for one aircraft. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub heading: Option<Heading>,
    pub flight_level: Option<FlightLevel>,
    pub speed: Option<f64>,
    pub command: Option<Command>,
    pub speaker: Option<Speaker>,
    pub position: Option<Position>,
}

impl From<&ParsedTransmission> for StatePatch {
    fn from(parsed: &ParsedTransmission) -> Self {
        Self {
            heading: parsed
                .heading
                .and_then(|heading| Heading::from_degrees(u32::from(heading)).ok()),
            flight_level: parsed
                .flight_level
                .and_then(|level| FlightLevel::new(u32::from(level)).ok()),
            speed: None,
            command: parsed.command,
            speaker: match parsed.speaker {
                Speaker::Unknown => None,
                speaker => Some(speaker),
            },
            position: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Upserted {
    pub state: Arc<AircraftState>,
    /// The callsign was not in the store before this update
    pub created: bool,
}

#[derive(Debug, Default)]
pub struct AirspaceStore {
    entries: RwLock<HashMap<String, Arc<AircraftState>>>,
}

impl AirspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are swapped whole, so a panicking writer cannot leave one half-updated
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<AircraftState>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<AircraftState>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merges `patch` into the state of `callsign`, creating a live entry if needed.
    pub fn upsert(&self, callsign: &str, patch: &StatePatch, timestamp: DateTime<Utc>) -> Upserted {
        let mut entries = self.write();
        let (current, created) = match entries.get(callsign) {
            Some(current) => (current.as_ref().clone(), false),
            None => {
                info!("New aircraft {callsign}");
                (AircraftState::new(callsign, timestamp, Origin::Live), true)
            }
        };
        let state = Arc::new(current.merged(patch, timestamp));
        entries.insert(callsign.to_string(), state.clone());
        Upserted { state, created }
    }

    /// Hands an aircraft to the simulation: `kinematics` fills whatever is still
    /// unknown and the entry becomes simulated. Creates the entry if needed.
    pub fn adopt_simulated(
        &self,
        callsign: &str,
        kinematics: &StatePatch,
        timestamp: DateTime<Utc>,
    ) -> Arc<AircraftState> {
        let mut entries = self.write();
        let current = entries
            .get(callsign)
            .map(|current| current.as_ref().clone())
            .unwrap_or_else(|| AircraftState::new(callsign, timestamp, Origin::Simulated));
        let state = Arc::new(AircraftState {
            origin: Origin::Simulated,
            ..current.filled(kinematics)
        });
        info!("Aircraft {callsign} is now simulated");
        entries.insert(callsign.to_string(), state.clone());
        state
    }

    /// Applies `step` to every simulated entry and returns how many changed. Only the
    /// kinematic fields of the returned patch are applied; live entries never reach `step`.
    /// Entries are visited in callsign order.
    pub fn perturb_simulated<F>(&self, mut step: F) -> usize
    where
        F: FnMut(&AircraftState) -> Option<StatePatch>,
    {
        let mut entries = self.write();
        let mut simulated: Vec<String> = entries
            .values()
            .filter(|state| state.is_simulated())
            .map(|state| state.callsign.clone())
            .collect();
        simulated.sort();

        let mut changed = 0;
        for callsign in simulated {
            let Some(state) = entries.get_mut(&callsign) else {
                continue;
            };
            let Some(patch) = step(state.as_ref()) else {
                continue;
            };
            let next = AircraftState {
                heading: patch.heading.or(state.heading),
                flight_level: patch.flight_level.or(state.flight_level),
                speed: patch.speed.or(state.speed),
                position: patch.position.or(state.position),
                ..state.as_ref().clone()
            };
            *state = Arc::new(next);
            changed += 1;
        }
        changed
    }

    pub fn get(&self, callsign: &str) -> Option<Arc<AircraftState>> {
        self.read().get(callsign).cloned()
    }

    pub fn contains(&self, callsign: &str) -> bool {
        self.read().contains_key(callsign)
    }

    /// All states, most recently heard first, ties by callsign.
    pub fn snapshot(&self) -> Vec<Arc<AircraftState>> {
        let mut states: Vec<_> = self.read().values().cloned().collect();
        states.sort_by(|a, b| {
            b.last_heard
                .cmp(&a.last_heard)
                .then_with(|| a.callsign.cmp(&b.callsign))
        });
        states
    }

    /// Callsigns not heard within `horizon`. Advisory only, nothing is evicted.
    pub fn stale_callsigns(&self, now: DateTime<Utc>, horizon: Duration) -> Vec<String> {
        self.snapshot()
            .iter()
            .filter(|state| state.is_stale(now, horizon))
            .map(|state| state.callsign.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
