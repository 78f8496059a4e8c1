//! Simulated traffic
//!
//! [`Perturber`] jitters the kinematics of simulated aircraft a little every tick and
//! synthesizes plausible kinematics for aircraft that were heard without any. It only
//! reaches the store through [`AirspaceStore::perturb_simulated`], so live aircraft are
//! never moved.

use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use aviation_helper_rs::types::{
    altitude::{FlightLevel, VerticalDirection},
    heading::Heading,
    position::Position,
};
use log::{debug, trace};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

use crate::{
    config::SimulationConfig,
    errors::Error,
    store::{AircraftState, AirspaceStore, StatePatch},
};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

pub struct Perturber<R> {
    rng: R,
    config: SimulationConfig,
}

impl Perturber<ChaCha8Rng> {
    /// Perturber on a ChaCha8 stream seeded from `config.seed`.
    pub fn seeded(config: SimulationConfig) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(config.seed), config)
    }
}

impl<R: RngCore> Perturber<R> {
    pub fn new(rng: R, config: SimulationConfig) -> Self {
        Self { rng, config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Uniform in `[-amplitude, amplitude]`
    fn jitter(&mut self, amplitude: f64) -> f64 {
        let amplitude = amplitude.abs();
        self.rng.random_range(-amplitude..=amplitude)
    }

    fn random_level(&mut self) -> Option<FlightLevel> {
        let low = self.config.min_level.min(self.config.max_level);
        let high = self.config.min_level.max(self.config.max_level);
        // Whole tens, like cleared levels
        let level = self.rng.random_range(low..=high) / 10 * 10;
        FlightLevel::new(level.max(low)).ok()
    }

    /// Next kinematics for one simulated aircraft. Fields the aircraft does not have
    /// stay unknown.
    pub fn step(&mut self, state: &AircraftState) -> Option<StatePatch> {
        if !state.has_kinematics() {
            return None;
        }

        let heading = match state.heading {
            Some(heading) => Some(heading + self.jitter(self.config.heading_jitter_deg)),
            None => None,
        };
        let (min_speed, max_speed) = (
            self.config.min_speed_kt.min(self.config.max_speed_kt),
            self.config.min_speed_kt.max(self.config.max_speed_kt),
        );
        let speed = match state.speed {
            Some(speed) => {
                Some((speed + self.jitter(self.config.speed_jitter_kt)).clamp(min_speed, max_speed))
            }
            None => None,
        };
        let flight_level = match state.flight_level {
            Some(level) => {
                let probability = self.config.level_change_probability.clamp(0.0, 1.0);
                if self.rng.random_bool(probability) {
                    let direction = if self.rng.random_bool(0.5) {
                        VerticalDirection::Climb
                    } else {
                        VerticalDirection::Descend
                    };
                    Some(level.offset(direction, self.config.level_step))
                } else {
                    Some(level)
                }
            }
            None => None,
        };
        let position = match (state.position, heading, speed) {
            (Some(position), Some(heading), Some(speed)) => {
                let hours = self.config.interval_ms as f64 / MILLIS_PER_HOUR;
                Some(position.advanced(heading, speed * hours))
            }
            (position, ..) => position,
        };

        Some(StatePatch {
            heading,
            flight_level,
            speed,
            position,
            ..Default::default()
        })
    }

    /// One perturbation pass over the store. Returns how many aircraft moved.
    pub fn tick(&mut self, store: &AirspaceStore) -> usize {
        let changed = store.perturb_simulated(|state| self.step(state));
        trace!("Perturbed {changed} simulated aircraft");
        changed
    }

    /// Full set of plausible kinematics for an aircraft heard without any.
    pub fn synthesize(&mut self) -> StatePatch {
        let radius = self.config.sector_radius_nm.abs();
        let (min_speed, max_speed) = (
            self.config.min_speed_kt.min(self.config.max_speed_kt),
            self.config.min_speed_kt.max(self.config.max_speed_kt),
        );
        StatePatch {
            heading: Some(Heading::new(self.rng.random_range(0.0..360.0))),
            flight_level: self.random_level(),
            speed: Some(self.rng.random_range(min_speed..=max_speed)),
            position: Some(Position::new(
                self.rng.random_range(-radius..=radius),
                self.rng.random_range(-radius..=radius),
            )),
            ..Default::default()
        }
    }
}

/// Running background perturbation. Stops on [`PerturbationHandle::stop`] or drop.
pub struct PerturbationHandle {
    stop: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl PerturbationHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender wakes the thread as well
        if let Some(stop) = self.stop.take() {
            stop.send(()).ok();
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                debug!("Perturbation thread panicked");
            }
        }
    }
}

impl Drop for PerturbationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Ticks `perturber` against `store` every `interval_ms` on its own thread.
pub fn spawn_background<R>(
    store: Arc<AirspaceStore>,
    mut perturber: Perturber<R>,
) -> Result<PerturbationHandle, Error>
where
    R: RngCore + Send + 'static,
{
    let interval = Duration::from_millis(perturber.config.interval_ms.max(1));
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let thread = thread::Builder::new()
        .name("airspace-perturbation".to_string())
        .spawn(move || {
            debug!("Perturbation running every {interval:?}");
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        perturber.tick(&store);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("Perturbation stopped");
        })
        .map_err(Error::SpawnThread)?;

    Ok(PerturbationHandle {
        stop: Some(stop_tx),
        thread: Some(thread),
    })
}
