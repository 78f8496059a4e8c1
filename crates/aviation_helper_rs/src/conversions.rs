pub const FEET_PER_FLIGHT_LEVEL: u32 = 100;

/// Converts an aviation bearing (0 = north, clockwise) into a math angle in radians
/// (0 = east, counter-clockwise).
pub fn aviation_degrees_to_planar_rotation(degrees: f64) -> f64 {
    (90.0 - degrees).to_radians()
}

pub fn planar_rotation_to_aviation_degrees(rotation: f64) -> f64 {
    let degrees = (90.0 - rotation.to_degrees()).rem_euclid(360.0);
    // float noise just below 360 is north
    if 360.0 - degrees < 1e-9 { 0.0 } else { degrees }
}

pub fn flight_level_to_feet(flight_level: u32) -> u32 {
    flight_level * FEET_PER_FLIGHT_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_round_trip_cardinals() {
        for degrees in [0.0, 90.0, 180.0, 270.0] {
            let back = planar_rotation_to_aviation_degrees(aviation_degrees_to_planar_rotation(degrees));
            assert!((back - degrees).abs() < 1e-9, "{degrees} came back as {back}");
        }
    }

    #[test]
    fn test_north_points_up() {
        let rotation = aviation_degrees_to_planar_rotation(0.0);
        assert!(rotation.cos().abs() < 1e-9);
        assert!((rotation.sin() - 1.0).abs() < 1e-9);
    }
}
