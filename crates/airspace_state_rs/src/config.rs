//! Airspace configuration, loaded from RON.

use chrono::TimeDelta;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Heuristic advisory limits. Not regulatory separation minima.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictThresholds {
    /// Level difference at or below which a vertical conflict is flagged
    pub vertical_flag_levels: u32,
    /// Level difference at or below which a vertical conflict is high
    pub vertical_high_levels: u32,
    pub heading_flag_deg: f64,
    pub heading_moderate_deg: f64,
    pub heading_high_deg: f64,
    pub proximity_flag_nm: f64,
    pub proximity_moderate_nm: f64,
    pub proximity_high_nm: f64,
}

impl Default for ConflictThresholds {
    fn default() -> Self {
        Self {
            vertical_flag_levels: 10,
            vertical_high_levels: 0,
            heading_flag_deg: 20.0,
            heading_moderate_deg: 15.0,
            heading_high_deg: 5.0,
            proximity_flag_nm: 12.0,
            proximity_moderate_nm: 8.0,
            proximity_high_nm: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub interval_ms: u64,
    /// Largest heading change per tick, either way
    pub heading_jitter_deg: f64,
    pub speed_jitter_kt: f64,
    /// Chance per tick that a simulated aircraft changes level
    pub level_change_probability: f64,
    pub level_step: u32,
    /// Synthesize kinematics for aircraft first heard without any
    pub synthesize_missing: bool,
    pub min_level: u32,
    pub max_level: u32,
    pub min_speed_kt: f64,
    pub max_speed_kt: f64,
    /// Half width of the square sector synthesized positions fall into
    pub sector_radius_nm: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0xA7C0,
            interval_ms: 1000,
            heading_jitter_deg: 3.0,
            speed_jitter_kt: 5.0,
            level_change_probability: 0.05,
            level_step: 10,
            synthesize_missing: false,
            min_level: 100,
            max_level: 400,
            min_speed_kt: 220.0,
            max_speed_kt: 480.0,
            sector_radius_nm: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirspaceConfig {
    pub conflict: ConflictThresholds,
    /// Seconds since `last_heard` after which an aircraft is reported stale
    pub staleness_horizon_secs: i64,
    pub simulation: SimulationConfig,
}

impl Default for AirspaceConfig {
    fn default() -> Self {
        Self {
            conflict: ConflictThresholds::default(),
            staleness_horizon_secs: 120,
            simulation: SimulationConfig::default(),
        }
    }
}

impl AirspaceConfig {
    /// Load airspace configuration from a RON file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: AirspaceConfig = ron::from_str(&contents)?;
        Ok(config)
    }

    /// Load airspace configuration from the crate's resources
    pub fn load_default() -> Result<Self, Error> {
        Self::load_from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/airspace/airspace_config.ron"
        ))
    }

    /// Out of range values saturate: negative ones report everything stale, huge ones
    /// nothing.
    pub fn staleness_horizon(&self) -> TimeDelta {
        let secs = self.staleness_horizon_secs;
        TimeDelta::try_seconds(secs).unwrap_or_else(|| {
            warn!("Staleness horizon of {secs}s is out of range");
            if secs < 0 {
                TimeDelta::zero()
            } else {
                TimeDelta::MAX
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resource_matches_defaults() {
        let config = AirspaceConfig::load_default().unwrap();
        assert_eq!(config, AirspaceConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: AirspaceConfig =
            ron::from_str("(conflict: (proximity_flag_nm: 5.0), staleness_horizon_secs: 30)")
                .unwrap();
        assert_eq!(config.conflict.proximity_flag_nm, 5.0);
        assert_eq!(config.conflict.vertical_flag_levels, 10);
        assert_eq!(config.staleness_horizon(), TimeDelta::seconds(30));
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn test_staleness_horizon_saturates() {
        let config = AirspaceConfig {
            staleness_horizon_secs: i64::MAX,
            ..Default::default()
        };
        assert_eq!(config.staleness_horizon(), TimeDelta::MAX);
        let config = AirspaceConfig {
            staleness_horizon_secs: i64::MIN,
            ..Default::default()
        };
        assert_eq!(config.staleness_horizon(), TimeDelta::zero());
    }

    #[test]
    fn test_bad_ron_is_reported() {
        let dir = std::env::temp_dir().join("airspace_state_rs_bad_config.ron");
        std::fs::write(&dir, "(conflict: [)").unwrap();
        assert!(matches!(
            AirspaceConfig::load_from_file(&dir),
            Err(Error::RonDeserialize(_))
        ));
        std::fs::remove_file(&dir).ok();
    }
}
