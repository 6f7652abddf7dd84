use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The active granularity table has no entries to choose from.
    #[error("invalid bucketing configuration: {0}")]
    InvalidConfiguration(String),

    /// A range whose length is not exactly one of the friendly durations.
    #[error("no friendly duration spans exactly {seconds} seconds")]
    NoMatchingFriendlyRange { seconds: i64 },

    #[error("unknown friendly duration label: {0:?}")]
    UnknownFriendlyDuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
