use serde::{Deserialize, Serialize};

use super::heading::Heading;

/// Point on the abstract sector plane, in nautical miles (x east, y north).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_nm(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Aviation bearing from `self` towards `other`. `None` if both points coincide.
    pub fn bearing_to(&self, other: &Position) -> Option<Heading> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(Heading::from_planar_rotation(dy.atan2(dx)))
    }

    /// Position after flying `distance_nm` along `heading`.
    pub fn advanced(&self, heading: Heading, distance_nm: f64) -> Position {
        let rotation = heading.to_planar_rotation();
        Position {
            x: self.x + distance_nm * rotation.cos(),
            y: self.y + distance_nm * rotation.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Position::new(0., 0.);
        let b = Position::new(3., 4.);
        assert_eq!(a.distance_nm(&b), 5.);
    }

    #[test]
    fn test_bearing_follows_compass() {
        let origin = Position::default();
        assert_eq!(origin.bearing_to(&Position::new(0., 10.)).unwrap(), 0.);
        assert_eq!(origin.bearing_to(&Position::new(10., 0.)).unwrap(), 90.);
        assert_eq!(origin.bearing_to(&Position::new(0., -10.)).unwrap(), 180.);
        assert_eq!(origin.bearing_to(&Position::new(-10., 0.)).unwrap(), 270.);
        assert!(origin.bearing_to(&origin).is_none());
    }

    #[test]
    fn test_advance_east() {
        let moved = Position::default().advanced(Heading::new(90.), 2.);
        assert!((moved.x - 2.).abs() < 1e-9);
        assert!(moved.y.abs() < 1e-9);
    }
}
