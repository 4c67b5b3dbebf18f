//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! rejected world-state input, numeric failures during noise evaluation, invalid render
//! configuration, cancelled runs, IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid world parameters: {0}")]
    InvalidInput(String),

    #[error("noise computation error: {0}")]
    Noise(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("generation cancelled after {rows_completed} rows")]
    Cancelled { rows_completed: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_message_reports_progress() {
        let err = Error::Cancelled { rows_completed: 300 };
        assert_eq!(err.to_string(), "generation cancelled after 300 rows");
    }

    #[test]
    fn input_errors_are_prefixed() {
        let err = Error::InvalidInput("p_season out of range".into());
        assert_eq!(
            err.to_string(),
            "invalid world parameters: p_season out of range"
        );
    }
}
