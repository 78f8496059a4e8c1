use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Std Io Error!")]
    StdIo(#[from] std::io::Error),
    #[error("Ron config error: {0}")]
    RonDeserialize(#[from] ron::error::SpannedError),
}
