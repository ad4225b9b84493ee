//! Errors
//!
//! Custom error types used throughout the `robust_warp` crate.
use thiserror::Error;

/// Errors that can occur when computing the robust WARP loss.
#[derive(Debug, Error)]
pub enum RobustWarpError {
    /// Label and prediction matrices disagree on the number of classes.
    #[error("Label matrix has {0} columns, expected the {1} prediction columns plus a trailing weight column.")]
    ClassCountMismatch(usize, usize),
    /// Label and prediction matrices disagree on the number of examples.
    #[error("Label matrix has {0} rows but prediction matrix has {1}.")]
    BatchSizeMismatch(usize, usize),
    /// The batch contains no examples.
    #[error("The batch must contain at least one example.")]
    EmptyBatch,
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to serialize a configuration.
    #[error("Unable to write configuration: {0}")]
    UnableToWrite(String),
    /// Unable to deserialize a configuration.
    #[error("Unable to read configuration: {0}")]
    UnableToRead(String),
}
