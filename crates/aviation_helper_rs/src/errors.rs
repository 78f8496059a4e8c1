use thiserror::Error;
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid heading: {}",.0)]
    InvalidHeading(u32),
    #[error("Invalid flight level: {}",.0)]
    InvalidFlightLevel(u32),
    #[error("Serde Json (de)serialization failed!")]
    SerdeDeserialize(#[from] serde_json::Error),
    #[error("Std Io Error!")]
    StdIo(#[from] std::io::Error),
}
