//! ATC Transcript Library
//!
//! Turns short, noisy, phonetically spelled ATC transcripts into structured
//! [`ParsedTransmission`] records: callsign, command, heading, flight level, speaker
//! and message type.

pub mod callsign;
pub mod classifier;
pub mod compare;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod phonetics;
pub mod response;

pub use callsign::CallsignMode;
pub use compare::{Field, FieldCoverage, ModeComparison, compare_modes};
pub use config::{DEFAULT_PREFIX_LOOKAHEAD, ExtractorConfig, FlightLevelPolicy};
pub use errors::Error;
pub use extractor::FieldExtractor;
pub use phonetics::{Token, tokenize};

// Re-export the transmission model for convenience
pub use aviation_helper_rs::clearance::transmission::{
    Command, MessageType, ParsedTransmission, Speaker,
};
