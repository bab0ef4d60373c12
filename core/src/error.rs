use thiserror::Error;

/// Errors returned by the AUC engine. None of them are fatal; the caller
/// decides whether to report, skip or fall back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AucError {
    #[error("insufficient data: {operation} needs at least {required} sample(s), got {got}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        got: usize,
    },

    #[error("index {index} out of range for a series of {len} sample(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("malformed sample: {reason}")]
    MalformedSample { reason: String },
}

impl AucError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        AucError::MalformedSample { reason: reason.into() }
    }
}

pub type AucResult<T> = Result<T, AucError>;

/// Errors from the JSON entry points.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid JSON at `{path}`: {message}")]
    Json { path: String, message: String },

    #[error(transparent)]
    Engine(#[from] AucError),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl<E: std::fmt::Display> From<serde_path_to_error::Error<E>> for InputError {
    fn from(err: serde_path_to_error::Error<E>) -> Self {
        InputError::Json {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}
