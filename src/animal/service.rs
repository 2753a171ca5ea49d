//! The service layer between the UI and the fetch/persist collaborators.
//!
//! [`AnimalService`] fetches wire records, projects them into
//! [`AnimalViewData`], and wires each view's favorite action to the
//! persister. The UI talks to it through the object-safe [`AnimalLoader`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};

use super::record::AnimalRecord;
use super::view::{AnimalViewData, FavoriteAction};
use crate::error::FetchResult;
use crate::fetcher::DataFetcher;
use crate::persist::{favorite_key, Lookup, Persister};

pub type LoadCompletion = Box<dyn FnOnce(FetchResult<Vec<AnimalViewData>>) + Send>;

/// Receives the key of every successful favorite save, or the error.
pub type SaveObserver = Arc<dyn Fn(FetchResult<String>) + Send + Sync>;

/// Load animals as view data.
pub trait AnimalLoader: Send + Sync {
    /// Category label for the loaded items (e.g. `dogs`).
    fn category(&self) -> &str;

    fn load(&self, completion: LoadCompletion);
}

pub struct AnimalService<F, P> {
    fetcher: F,
    store: Arc<P>,
    category: String,
    observer: Option<SaveObserver>,
}

impl<F, P> AnimalService<F, P>
where
    F: DataFetcher,
    P: Persister + Lookup + 'static,
{
    pub fn new(fetcher: F, store: Arc<P>, category: impl Into<String>) -> Self {
        Self {
            fetcher,
            store,
            category: category.into(),
            observer: None,
        }
    }

    /// Report favorite save outcomes to `observer`.
    pub fn on_saved(mut self, observer: impl Fn(FetchResult<String>) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }
}

impl<F, P> AnimalLoader for AnimalService<F, P>
where
    F: DataFetcher,
    P: Persister + Lookup + 'static,
{
    fn category(&self) -> &str {
        &self.category
    }

    fn load(&self, completion: LoadCompletion) {
        let projector = Projector {
            store: Arc::downgrade(&self.store),
            category: self.category.clone(),
            observer: self.observer.clone(),
        };

        self.fetcher.fetch::<Vec<AnimalRecord>, _>(move |result| {
            let views = result.map(|records| {
                info!(count = records.len(), category = %projector.category, "animals loaded");
                records
                    .into_iter()
                    .map(|record| projector.project(record))
                    .collect()
            });
            completion(views);
        });
    }
}

/// Everything a completion needs to build view data, without keeping the
/// service or its store alive.
struct Projector<P> {
    store: Weak<P>,
    category: String,
    observer: Option<SaveObserver>,
}

impl<P> Projector<P>
where
    P: Persister + Lookup + 'static,
{
    fn project(&self, record: AnimalRecord) -> AnimalViewData {
        let key = favorite_key(&self.category, record.id);
        let saved = self
            .store
            .upgrade()
            .is_some_and(|store| store.contains(&key));
        let favorite = Arc::new(AtomicBool::new(saved));

        let (title, subtitle) = match (&record.name, &record.origin) {
            (Some(name), Some(origin)) => (name.clone(), Some(format!("{} · {origin}", record.breed))),
            (Some(name), None) => (name.clone(), Some(record.breed.clone())),
            (None, origin) => (record.breed.clone(), origin.clone()),
        };

        let action = self.favorite_action(record, key, Arc::clone(&favorite));
        AnimalViewData::new(title, subtitle, favorite, action)
    }

    fn favorite_action(&self, record: AnimalRecord, key: String, favorite: Arc<AtomicBool>) -> FavoriteAction {
        let store = self.store.clone();
        let observer = self.observer.clone();

        FavoriteAction::new(move || {
            let Some(store) = store.upgrade() else {
                debug!(key = %key, "store dropped, ignoring favorite");
                return;
            };

            let favorite = Arc::clone(&favorite);
            let observer = observer.clone();
            let saved_key = key.clone();
            store.save(record.clone(), &key, move |result| {
                let outcome = result.map(|_| {
                    favorite.store(true, Ordering::SeqCst);
                    saved_key
                });
                if let Err(e) = &outcome {
                    warn!(error = %e, "favorite not saved");
                }
                if let Some(observer) = observer {
                    observer(outcome);
                }
            });
        })
    }
}
