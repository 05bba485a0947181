//! Error types shared by the codes and the fuzzy extractor.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building codes, encoding, decoding or extracting keys
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument is malformed (symbol out of range, missing helper data, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A word does not have the length the code expects
    #[error("Invalid length: expected {expected} symbols, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The requested code or extractor cannot be built with these parameters
    #[error("Construction error: {0}")]
    Construction(String),

    /// The received word lies outside the correction radius or the decoding system is degenerate
    #[error("Uncorrectable: {0}")]
    Uncorrectable(String),

    /// The operation exists but has no decoder for this configuration
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Shorthand for [`Error::Uncorrectable`]
    pub fn uncorrectable(msg: impl Into<String>) -> Self {
        Error::Uncorrectable(msg.into())
    }

    /// Returns true if this error reports a decoding failure rather than bad input
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Error::Uncorrectable(_) | Error::NotImplemented(_))
    }
}
