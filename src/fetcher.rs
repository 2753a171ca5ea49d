//! The fetch-and-decode contract and its composed implementation.
//!
//! ```text
//! make_request() ──► perform() ──► decode::<T>() ──► completion(Result<T>)
//!   RequestSource     Transfer      PayloadDecoder
//! ```
//!
//! [`Fetcher`] is generic over all three collaborators, so a remote source
//! and a file source plug in without the fetcher knowing which one it has.

use std::sync::Arc;
use std::thread;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::decode::PayloadDecoder;
use crate::error::{FetchError, FetchResult};
use crate::request::RequestSource;
use crate::transfer::Transfer;

/// "Get me a `T`", reported through a completion callback.
///
/// The completion runs exactly once per call, with either the decoded value
/// or the error that ended the attempt. It may run on another thread.
pub trait DataFetcher: Send + Sync {
    fn fetch<T, F>(&self, completion: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(FetchResult<T>) + Send + 'static;
}

/// Composes one request source, one transfer and one decoder.
///
/// Cloning is cheap; clones share the same collaborators.
pub struct Fetcher<S, X, D> {
    inner: Arc<Parts<S, X, D>>,
}

struct Parts<S, X, D> {
    source: S,
    transfer: X,
    decoder: D,
}

impl<S, X, D> Clone for Fetcher<S, X, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, X, D> Fetcher<S, X, D>
where
    S: RequestSource,
    X: Transfer,
    D: PayloadDecoder,
{
    pub fn new(source: S, transfer: X, decoder: D) -> Self {
        Self {
            inner: Arc::new(Parts {
                source,
                transfer,
                decoder,
            }),
        }
    }

    /// Run the whole pipeline on the calling thread.
    pub fn fetch_now<T: DeserializeOwned>(&self) -> FetchResult<T> {
        let parts = &*self.inner;
        let request = parts.source.make_request();
        debug!(%request, "fetching");

        match parts.transfer.perform(&request) {
            Some(bytes) if !bytes.is_empty() => parts.decoder.decode(&bytes),
            _ => {
                warn!(%request, "no data");
                Err(FetchError::DataNotFound)
            }
        }
    }
}

impl<S, X, D> DataFetcher for Fetcher<S, X, D>
where
    S: RequestSource + 'static,
    X: Transfer + 'static,
    D: PayloadDecoder + 'static,
{
    fn fetch<T, F>(&self, completion: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(FetchResult<T>) + Send + 'static,
    {
        let fetcher = self.clone();
        thread::spawn(move || completion(fetcher.fetch_now()));
    }
}
