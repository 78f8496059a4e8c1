//! Live ingestion racing the background perturbation on a shared store.

use std::{
    sync::{Arc, LazyLock},
    thread,
    time::Duration,
};

use airspace_state_rs::{
    AirspaceConfig, AirspaceStore, ConflictDetector, Origin, Perturber, StatePatch,
    spawn_background, suggest_next_action,
};
use aviation_helper_rs::types::{altitude::FlightLevel, heading::Heading};
use chrono::{DateTime, TimeZone, Utc};

static CONFIG: LazyLock<AirspaceConfig> = LazyLock::new(|| {
    let mut config = AirspaceConfig::load_default().expect("Failed to load airspace config");
    config.simulation.interval_ms = 1;
    config.simulation.level_change_probability = 0.5;
    config
});

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn live_patch(level: u32, heading: f64) -> StatePatch {
    StatePatch {
        flight_level: FlightLevel::new(level).ok(),
        heading: Some(Heading::new(heading)),
        ..Default::default()
    }
}

#[test]
fn test_perturbation_never_touches_live_aircraft() {
    let store = Arc::new(AirspaceStore::new());
    let mut synthesizer = Perturber::seeded(CONFIG.simulation);
    for callsign in ["SIM1", "SIM2"] {
        let kinematics = synthesizer.synthesize();
        store.adopt_simulated(callsign, &kinematics, at(0));
    }
    let simulated_before = store.get("SIM1").unwrap();

    let handle = spawn_background(store.clone(), Perturber::seeded(CONFIG.simulation)).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|writer| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let callsign = format!("LIVE{writer}");
                    store.upsert(&callsign, &live_patch(300 + writer, 90.), at(i));
                    // Every reader sees whole entries
                    for state in store.snapshot() {
                        if state.origin == Origin::Live {
                            assert_eq!(state.heading, Some(Heading::new(90.)));
                        }
                    }
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    thread::sleep(Duration::from_millis(10));
    handle.stop();

    for writer in 0..4 {
        let state = store.get(&format!("LIVE{writer}")).unwrap();
        assert_eq!(state.origin, Origin::Live);
        assert_eq!(state.flight_level, FlightLevel::new(300 + writer).ok());
        assert_eq!(state.heading, Some(Heading::new(90.)));
        assert_eq!(state.last_heard, at(199));
    }
    let simulated_after = store.get("SIM1").unwrap();
    assert_eq!(simulated_after.origin, Origin::Simulated);
    assert_ne!(simulated_after.position, simulated_before.position);
}

#[test]
fn test_snapshot_pipeline() {
    let store = AirspaceStore::new();
    store.upsert("DLH5", &live_patch(330, 90.), at(0));
    store.upsert("CSA634", &live_patch(330, 270.), at(1));
    let detector = ConflictDetector::new(CONFIG.conflict);

    let snapshot = store.snapshot();
    let conflicts = detector.detect(&snapshot);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].metric, "Vertical separation 0 ft");

    let suggestion = suggest_next_action(&conflicts, None, &snapshot).unwrap();
    assert_eq!(suggestion.summary, conflicts[0].resolution);

    store.upsert("CSA634", &live_patch(350, 270.), at(2));
    let conflicts = detector.detect(&store.snapshot());
    assert!(conflicts.is_empty());
    let suggestion = suggest_next_action(&conflicts, None, &store.snapshot()).unwrap();
    assert_eq!(suggestion.summary, "Check on CSA634 at FL350.");
}
