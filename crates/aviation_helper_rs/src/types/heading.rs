use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};

use crate::{
    conversions::{aviation_degrees_to_planar_rotation, planar_rotation_to_aviation_degrees},
    errors::Error,
};

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Heading(f64);

// Headings are always finite and normalized
impl Eq for Heading {}

// Compares to a plain degree value within 0.1 degrees
impl PartialEq<f64> for Heading {
    fn eq(&self, other: &f64) -> bool {
        (self.0 - other).abs() < 0.1
    }
}

impl Add<f64> for Heading {
    type Output = Heading;

    fn add(self, rhs: f64) -> Self::Output {
        Heading((self.0 + rhs).rem_euclid(360.))
    }
}

impl Sub<f64> for Heading {
    type Output = Heading;

    fn sub(self, rhs: f64) -> Self::Output {
        Heading((self.0 - rhs).rem_euclid(360.))
    }
}

impl Heading {
    pub fn new(val: f64) -> Self {
        Heading(val.rem_euclid(360.))
    }

    /// Strict constructor for spoken headings, which never wrap.
    pub fn from_degrees(val: u32) -> Result<Self, Error> {
        match val {
            0..360 => Ok(Heading(val as f64)),
            _ => Err(Error::InvalidHeading(val)),
        }
    }

    pub fn to_planar_rotation(self) -> f64 {
        let Heading(heading) = self;
        aviation_degrees_to_planar_rotation(heading)
    }

    pub fn from_planar_rotation(value: f64) -> Self {
        let heading = planar_rotation_to_aviation_degrees(value);
        Heading(heading)
    }

    /// Smallest angle between the two headings, in `[0, 180]`.
    pub fn angular_distance(self, other: Heading) -> f64 {
        let diff = (self.0 - other.0).abs();
        diff.min(360. - diff)
    }

    /// Whole degrees in `[0, 359]`.
    pub fn whole_degrees(self) -> u16 {
        (self.0.round() as u16) % 360
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.whole_degrees())
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Deserialize, Serialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    pub fn apply(self, heading: Heading, degrees: f64) -> Heading {
        match self {
            TurnDirection::Left => heading - degrees,
            TurnDirection::Right => heading + degrees,
        }
    }
}

impl Display for TurnDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnDirection::Left => write!(f, "left"),
            TurnDirection::Right => write!(f, "right"),
        }
    }
}
