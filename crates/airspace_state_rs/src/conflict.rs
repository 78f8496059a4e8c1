//! Pairwise conflict heuristics over a set of aircraft states.
//!
//! Three independent checks run per pair: vertical, heading and lateral proximity.
//! A check only applies when both aircraft carry the fields it needs.

use std::{cmp::Reverse, collections::BTreeMap};

use aviation_helper_rs::{
    conversions::flight_level_to_feet,
    types::{
        altitude::VerticalDirection,
        heading::{Heading, TurnDirection},
    },
};
use log::debug;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{config::ConflictThresholds, store::AircraftState};

/// Flight levels the lower-ranked aircraft is moved by in a vertical resolution
const RESOLUTION_LEVEL_STEP: u32 = 20;
const RESOLUTION_TURN_DEG: f64 = 30.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
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
pub enum Severity {
    Low,
    Moderate,
    High,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
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
pub enum ConflictKind {
    Vertical,
    Heading,
    Proximity,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Conflict {
    /// Callsigns in ascending order
    pub aircraft_pair: (String, String),
    pub kind: ConflictKind,
    pub severity: Severity,
    pub metric: String,
    pub description: String,
    pub resolution: String,
}

impl Conflict {
    /// Stable identity, e.g. `vertical-CSA634|DLH5`.
    pub fn key(&self) -> String {
        format!(
            "{}-{}|{}",
            self.kind, self.aircraft_pair.0, self.aircraft_pair.1
        )
    }

    pub fn involves(&self, callsign: &str) -> bool {
        self.aircraft_pair.0 == callsign || self.aircraft_pair.1 == callsign
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    thresholds: ConflictThresholds,
}

impl ConflictDetector {
    pub fn new(thresholds: ConflictThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ConflictThresholds {
        &self.thresholds
    }

    /// Every conflict among `states`, at most one per kind and pair, highest severity
    /// first and then by key.
    pub fn detect<S: AsRef<AircraftState>>(&self, states: &[S]) -> Vec<Conflict> {
        let mut found: BTreeMap<String, Conflict> = BTreeMap::new();

        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                let (a, b) = (a.as_ref(), b.as_ref());
                if a.callsign == b.callsign {
                    continue;
                }
                let (first, second) = if a.callsign < b.callsign {
                    (a, b)
                } else {
                    (b, a)
                };
                let checks = [
                    self.check_vertical(first, second),
                    self.check_heading(first, second),
                    self.check_proximity(first, second),
                ];
                for conflict in checks.into_iter().flatten() {
                    found.entry(conflict.key()).or_insert(conflict);
                }
            }
        }

        // BTreeMap yields key order, the stable sort keeps it within a severity
        let mut conflicts: Vec<Conflict> = found.into_values().collect();
        conflicts.sort_by_key(|conflict| Reverse(conflict.severity));
        debug!("Detected {} conflicts among {} aircraft", conflicts.len(), states.len());
        conflicts
    }

    fn check_vertical(&self, a: &AircraftState, b: &AircraftState) -> Option<Conflict> {
        let (level_a, level_b) = (a.flight_level?, b.flight_level?);
        let diff = level_a.separation(level_b);
        if diff > self.thresholds.vertical_flag_levels {
            return None;
        }
        let severity = if diff <= self.thresholds.vertical_high_levels {
            Severity::High
        } else {
            Severity::Moderate
        };

        let feet = flight_level_to_feet(diff);
        let (verb, direction) = if level_b.get() >= RESOLUTION_LEVEL_STEP {
            ("Descend", VerticalDirection::Descend)
        } else {
            ("Climb", VerticalDirection::Climb)
        };
        let target = level_b.offset(direction, RESOLUTION_LEVEL_STEP);

        Some(Conflict {
            aircraft_pair: (a.callsign.clone(), b.callsign.clone()),
            kind: ConflictKind::Vertical,
            severity,
            metric: format!("Vertical separation {feet} ft"),
            description: format!(
                "{} at {level_a} and {} at {level_b} are within {feet} ft vertically.",
                a.callsign, b.callsign
            ),
            resolution: format!(
                "{verb} {} to {target} to restore vertical separation from {}.",
                b.callsign, a.callsign
            ),
        })
    }

    fn check_heading(&self, a: &AircraftState, b: &AircraftState) -> Option<Conflict> {
        let (heading_a, heading_b) = (a.heading?, b.heading?);
        let delta = heading_a.angular_distance(heading_b);
        if delta > self.thresholds.heading_flag_deg {
            return None;
        }
        let severity = if delta <= self.thresholds.heading_high_deg {
            Severity::High
        } else if delta <= self.thresholds.heading_moderate_deg {
            Severity::Moderate
        } else {
            Severity::Low
        };
        let diverging = TurnDirection::Left.apply(heading_b, RESOLUTION_TURN_DEG);

        Some(Conflict {
            aircraft_pair: (a.callsign.clone(), b.callsign.clone()),
            kind: ConflictKind::Heading,
            severity,
            metric: format!("Heading delta {delta:.0}°"),
            description: format!(
                "{} heading {heading_a} and {} heading {heading_b} are within {delta:.0}° of each other.",
                a.callsign, b.callsign
            ),
            resolution: format!(
                "Turn {} left heading {diverging} to diverge from {}.",
                b.callsign, a.callsign
            ),
        })
    }

    fn check_proximity(&self, a: &AircraftState, b: &AircraftState) -> Option<Conflict> {
        let (position_a, position_b) = (a.position?, b.position?);
        let distance = position_a.distance_nm(&position_b);
        if distance > self.thresholds.proximity_flag_nm {
            return None;
        }
        let severity = if distance <= self.thresholds.proximity_high_nm {
            Severity::High
        } else if distance <= self.thresholds.proximity_moderate_nm {
            Severity::Moderate
        } else {
            Severity::Low
        };

        // Away from b; coincident positions fall back to a right turn off a's heading
        let away = position_b
            .bearing_to(&position_a)
            .or_else(|| a.heading.map(|heading| TurnDirection::Right.apply(heading, 90.)))
            .unwrap_or(Heading::new(90.));

        Some(Conflict {
            aircraft_pair: (a.callsign.clone(), b.callsign.clone()),
            kind: ConflictKind::Proximity,
            severity,
            metric: format!("Lateral distance {distance:.1} NM"),
            description: format!(
                "{} and {} are {distance:.1} NM apart.",
                a.callsign, b.callsign
            ),
            resolution: format!(
                "Turn {} heading {away} away from {}.",
                a.callsign, b.callsign
            ),
        })
    }
}
