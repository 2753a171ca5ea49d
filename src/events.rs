//! Messages from background work to the UI thread.
//!
//! Loads run on a fetcher thread and saves complete inside a key handler;
//! both report back over an [`mpsc`] channel that the main loop drains every
//! tick. A completion that fires after the UI has exited finds the receiver
//! gone and silently does nothing.

use std::sync::mpsc;

use crate::animal::{AnimalLoader, AnimalViewData};
use crate::error::{FetchError, FetchResult};

pub enum AppMsg {
    /// A load finished with these items.
    Loaded(Vec<AnimalViewData>),
    /// A load failed.
    LoadFailed(FetchError),
    /// A favorite was saved under this key.
    Saved(String),
    /// A favorite could not be saved.
    SaveFailed(FetchError),
}

impl From<FetchResult<String>> for AppMsg {
    fn from(outcome: FetchResult<String>) -> Self {
        match outcome {
            Ok(key) => AppMsg::Saved(key),
            Err(e) => AppMsg::SaveFailed(e),
        }
    }
}

/// Start a load whose result is delivered as an [`AppMsg`].
pub fn spawn_load(loader: &dyn AnimalLoader, tx: mpsc::Sender<AppMsg>) {
    loader.load(Box::new(move |result| {
        let msg = match result {
            Ok(items) => AppMsg::Loaded(items),
            Err(e) => AppMsg::LoadFailed(e),
        };
        // Receiver gone means the UI has exited.
        let _ = tx.send(msg);
    }));
}

/// A save observer that forwards outcomes to the UI.
pub fn save_notifier(tx: mpsc::Sender<AppMsg>) -> impl Fn(FetchResult<String>) + Send + Sync + 'static {
    move |outcome| {
        let _ = tx.send(AppMsg::from(outcome));
    }
}
