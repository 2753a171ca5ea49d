//! Payload decoding.

use serde::de::DeserializeOwned;

use crate::error::FetchResult;

/// Converts raw bytes into a typed value.
///
/// One decoder serves every value type; the target type is chosen at the
/// call site. Failures come back as [`FetchError::Decoding`](crate::error::FetchError)
/// and never panic.
pub trait PayloadDecoder: Send + Sync {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> FetchResult<T>;
}

/// JSON decoding via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl PayloadDecoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> FetchResult<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
