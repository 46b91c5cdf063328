// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

use rust7::S7Error;
use thiserror::Error;

use crate::block::DbRange;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The `host:port` string could not be understood
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Inconsistent or unparsable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested DB slice is not addressable
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Buffer length differs from the requested read length
    #[error("Buffer length mismatch: expected {expected} byte, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// TCP, ISO or PDU negotiation failure
    #[error("Connection to {endpoint} failed: {cause}")]
    Connect { endpoint: String, cause: S7Error },

    /// The read job was refused or the telegram was broken
    #[error("Read of {range} failed: {cause}")]
    Read { range: DbRange, cause: S7Error },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
