// Generation errors
use thiserror::Error;

/// Errors raised before or during pattern generation
///
/// Generation is all-or-nothing: any of these aborts the whole call.
#[derive(Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("Unsupported genre '{0}'. Choose from house, breaks, ukg or dnb")]
    InvalidGenre(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown pattern '{0}'")]
    UnknownPattern(String),
}

pub type GenerateResult<T> = Result<T, GenerateError>;
