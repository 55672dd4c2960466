use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed construction or training parameters.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying read/write failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Readable bytes that do not describe a valid network or dataset.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_format(msg: impl Into<String>) -> Self {
        Error::InvalidFormat(msg.into())
    }
}
