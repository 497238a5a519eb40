use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
