//! Error taxonomy shared by every fetch and save path.
//!
//! Every concrete source reports the same [`FetchError::DataNotFound`] when
//! its transfer comes back empty, so callers can match on one set of kinds
//! regardless of which source was injected.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The transfer produced no bytes (connection failure, missing file,
    /// empty response).
    #[error("data not found")]
    DataNotFound,

    /// Bytes were retrieved but did not parse as the requested type.
    #[error("failed to decode payload: {0}")]
    Decoding(String),

    /// A save could not serialize the value or write the store.
    #[error("failed to persist `{key}`: {reason}")]
    Persist { key: String, reason: String },

    /// A source was built from configuration that cannot describe a location.
    #[error("invalid request configuration: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    pub fn persist(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Persist {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decoding(error.to_string())
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
