//! One controller position: every transcript goes through extraction, the shared
//! store, conflict detection and the advisor, in that order.

use std::sync::Arc;

use airspace_state_rs::{
    AircraftState, AirspaceConfig, AirspaceStore, Conflict, ConflictDetector,
    NextActionSuggestion, Perturber, StatePatch, suggest_next_action,
};
use atc_transcript_rs::{
    CallsignMode, FieldExtractor, ParsedTransmission,
    phonetics::replace_callsign_at_start,
    response::{controller_response, spoken_response},
};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    /// Transcript with a leading ICAO style callsign spelled out
    pub transcript: String,
    pub parsed: ParsedTransmission,
    /// State of the addressed aircraft after the update
    pub state: Option<AircraftState>,
    pub conflicts: Vec<Conflict>,
    pub suggestion: Option<NextActionSuggestion>,
    pub response: String,
    pub spoken_response: String,
    pub stale: Vec<String>,
}

pub struct Session {
    extractor: FieldExtractor,
    store: Arc<AirspaceStore>,
    detector: ConflictDetector,
    staleness_horizon: Duration,
    synthesizer: Option<Perturber<ChaCha8Rng>>,
}

impl Session {
    pub fn new(extractor: FieldExtractor, store: Arc<AirspaceStore>, config: &AirspaceConfig) -> Self {
        Self {
            extractor,
            store,
            detector: ConflictDetector::new(config.conflict),
            staleness_horizon: config.staleness_horizon(),
            synthesizer: None,
        }
    }

    /// New aircraft heard without kinematics get some from `synthesizer` and become
    /// simulated.
    pub fn with_synthesis(mut self, synthesizer: Perturber<ChaCha8Rng>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn store(&self) -> &Arc<AirspaceStore> {
        &self.store
    }

    pub fn ingest(&mut self, transcript: &str, mode: CallsignMode, now: DateTime<Utc>) -> IngestOutcome {
        let parsed = self.extractor.parse(transcript, mode);
        let state = parsed
            .callsign
            .as_deref()
            .map(|callsign| self.update_store(callsign, &parsed, now));

        // Conflicts are computed on a snapshot taken after the update
        let snapshot = self.store.snapshot();
        let conflicts = self.detector.detect(&snapshot);
        let suggestion = suggest_next_action(&conflicts, Some(&parsed), &snapshot);
        debug!(
            "Ingested {:?}: {} aircraft, {} conflicts",
            parsed.callsign,
            snapshot.len(),
            conflicts.len()
        );

        IngestOutcome {
            transcript: replace_callsign_at_start(transcript, parsed.callsign.as_deref()),
            response: controller_response(&parsed),
            spoken_response: spoken_response(&parsed),
            stale: self.store.stale_callsigns(now, self.staleness_horizon),
            state: state.map(|state| state.as_ref().clone()),
            parsed,
            conflicts,
            suggestion,
        }
    }

    fn update_store(
        &mut self,
        callsign: &str,
        parsed: &ParsedTransmission,
        now: DateTime<Utc>,
    ) -> Arc<AircraftState> {
        let upserted = self.store.upsert(callsign, &StatePatch::from(parsed), now);
        match &mut self.synthesizer {
            Some(synthesizer) if upserted.created && !upserted.state.has_kinematics() => {
                let kinematics = synthesizer.synthesize();
                self.store.adopt_simulated(callsign, &kinematics, now)
            }
            _ => upserted.state,
        }
    }
}
