use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{conversions::flight_level_to_feet, errors::Error};

pub const MAX_FLIGHT_LEVEL: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum VerticalDirection {
    Climb,
    Descend,
}

/// Pressure altitude in hundreds of feet (FL330 = 33,000 ft).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FlightLevel(u32);

impl FlightLevel {
    pub fn new(val: u32) -> Result<Self, Error> {
        match val {
            0..=MAX_FLIGHT_LEVEL => Ok(Self(val)),
            _ => Err(Error::InvalidFlightLevel(val)),
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn as_feet(self) -> u32 {
        flight_level_to_feet(self.0)
    }

    /// Vertical distance in flight levels.
    pub fn separation(self, other: FlightLevel) -> u32 {
        self.0.abs_diff(other.0)
    }

    /// Level `steps` flight levels away in `direction`, kept inside `[0, MAX_FLIGHT_LEVEL]`.
    pub fn offset(self, direction: VerticalDirection, steps: u32) -> FlightLevel {
        match direction {
            VerticalDirection::Climb => Self((self.0 + steps).min(MAX_FLIGHT_LEVEL)),
            VerticalDirection::Descend => Self(self.0.saturating_sub(steps)),
        }
    }
}

impl Display for FlightLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FL{:03}", self.0)
    }
}
