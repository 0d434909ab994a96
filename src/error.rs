//! Error types for the netprofile binary crate.

use thiserror::Error;

/// Main error type for a profiling run.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from decoding, sessions or the capture source
    #[error(transparent)]
    Core(#[from] netprofile_core::Error),

    /// Error building the capture filter expression
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Error serializing the profile
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error writing the report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<netprofile_core::ProfileError> for Error {
    fn from(err: netprofile_core::ProfileError) -> Self {
        Error::Core(err.into())
    }
}

/// Errors from the application filter table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The tag is not in the table
    #[error("unknown application '{tag}' (expected one of: {known})")]
    UnknownApplication { tag: String, known: String },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
