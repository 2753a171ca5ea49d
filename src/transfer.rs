//! The transfer boundary: turn a [`RequestDescriptor`] into bytes, or nothing.
//!
//! A transfer never reports *why* it came back empty. Connection failures,
//! missing files and empty bodies all collapse into `None`, and the fetcher
//! turns that into [`FetchError::DataNotFound`](crate::error::FetchError).
//! The reason is logged here instead.

use std::fs;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::request::RequestDescriptor;

pub trait Transfer: Send + Sync {
    /// Perform the I/O for `request`. `None` means no bytes were obtained.
    fn perform(&self, request: &RequestDescriptor) -> Option<Vec<u8>>;
}

/// Production transfer: HTTP through an injected blocking client, files
/// through `std::fs`.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn get(&self, url: &url::Url) -> Option<Vec<u8>> {
        let response = match self.client.get(url.clone()).send() {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            // Handed to the decoder as-is; only "decodable or not" matters.
            debug!(%url, %status, "non-success status");
        }

        match response.bytes() {
            Ok(body) => {
                debug!(%url, bytes = body.len(), "response received");
                Some(body.to_vec())
            }
            Err(e) => {
                warn!(%url, error = %e, "failed to read response body");
                None
            }
        }
    }

    fn read_file(&self, path: &std::path::Path) -> Option<Vec<u8>> {
        match fs::read(path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "file read");
                Some(bytes)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read file");
                None
            }
        }
    }
}

impl Transfer for Transport {
    fn perform(&self, request: &RequestDescriptor) -> Option<Vec<u8>> {
        match request {
            RequestDescriptor::Get { url } => self.get(url),
            RequestDescriptor::File { path } => self.read_file(path),
        }
    }
}
