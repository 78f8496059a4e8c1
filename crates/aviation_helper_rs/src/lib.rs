//! Shared aviation vocabulary: headings, flight levels, sector positions, the airline
//! table and the structured form of a radio transmission.

pub mod conversions;
pub mod errors;

pub mod types {
    pub mod altitude;
    pub mod heading;
    pub mod position;
}

pub mod clearance {
    pub mod airlines;
    pub mod transmission;
}

pub use errors::Error;
