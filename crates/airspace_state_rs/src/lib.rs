//! Airspace State Library
//!
//! Shared per-callsign aircraft state, heuristic pairwise conflict detection, a
//! next-action advisor and a seeded perturbation of simulated traffic.

pub mod advisor;
pub mod config;
pub mod conflict;
pub mod errors;
pub mod simulation;
pub mod store;

pub use advisor::{NextActionSuggestion, suggest_next_action};
pub use config::{AirspaceConfig, ConflictThresholds, SimulationConfig};
pub use conflict::{Conflict, ConflictDetector, ConflictKind, Severity};
pub use errors::Error;
pub use simulation::{PerturbationHandle, Perturber, spawn_background};
pub use store::{AircraftState, AirspaceStore, Origin, StatePatch, Upserted};
