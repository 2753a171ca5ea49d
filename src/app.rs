use std::sync::mpsc;

use chrono::Local;
use ratatui::widgets::ListState;

use crate::animal::{AnimalLoader, AnimalViewData};
use crate::events::{self, AppMsg};

pub struct App {
    /// Items from the most recent successful load.
    pub items: Vec<AnimalViewData>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last load/save status message.
    pub status: String,
    /// True while a load is in flight.
    pub loading: bool,
    loader: Box<dyn AnimalLoader>,
    tx: mpsc::Sender<AppMsg>,
}

impl App {
    pub fn new(loader: Box<dyn AnimalLoader>, tx: mpsc::Sender<AppMsg>) -> Self {
        Self {
            items: Vec::new(),
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
            loading: false,
            loader,
            tx,
        }
    }

    pub fn category(&self) -> &str {
        self.loader.category()
    }

    // -- actions -------------------------------------------------------------

    /// Start a (re)load unless one is already running.
    pub fn reload(&mut self) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.status = format!("Loading {}…", self.loader.category());
        events::spawn_load(self.loader.as_ref(), self.tx.clone());
    }

    /// Run the favorite action of the selected item.
    pub fn favorite_selected(&mut self) {
        let Some(item) = self.list_state.selected().and_then(|i| self.items.get(i)) else {
            return;
        };
        if item.is_favorite() {
            self.status = format!("{} is already a favorite", item.title);
            return;
        }
        item.mark_favorite();
    }

    /// Apply one message from background work.
    pub fn handle(&mut self, msg: AppMsg) {
        let now = Local::now().format("%H:%M:%S");
        match msg {
            AppMsg::Loaded(items) => {
                self.loading = false;
                self.status = format!("[{now}] Loaded {} {}", items.len(), self.loader.category());
                self.replace_items(items);
            }
            AppMsg::LoadFailed(e) => {
                self.loading = false;
                self.status = format!("[{now}] Error: {e}");
            }
            AppMsg::Saved(key) => {
                self.status = format!("[{now}] Saved {key}");
            }
            AppMsg::SaveFailed(e) => {
                self.status = format!("[{now}] Error: {e}");
            }
        }
    }

    fn replace_items(&mut self, items: Vec<AnimalViewData>) {
        self.items = items;
        let selected = match self.list_state.selected() {
            _ if self.items.is_empty() => None,
            Some(i) => Some(i.min(self.items.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(self.items.len() - 1));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::animal::{FavoriteAction, LoadCompletion};
    use crate::error::FetchError;

    /// Loader that counts calls and never completes.
    pub(crate) struct Idle(pub Arc<AtomicUsize>);

    impl AnimalLoader for Idle {
        fn category(&self) -> &str {
            "dogs"
        }

        fn load(&self, _completion: LoadCompletion) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn make_item(title: &str, action: FavoriteAction) -> AnimalViewData {
        AnimalViewData::new(title, None, Arc::new(AtomicBool::new(false)), action)
    }

    pub(crate) fn sample_items() -> Vec<AnimalViewData> {
        vec![
            make_item("Husky", FavoriteAction::noop()),
            make_item("Beagle", FavoriteAction::noop()),
            make_item("Akita", FavoriteAction::noop()),
        ]
    }

    pub(crate) fn new_app() -> (App, Arc<AtomicUsize>, mpsc::Receiver<AppMsg>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        (App::new(Box::new(Idle(Arc::clone(&loads))), tx), loads, rx)
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let (app, loads, _rx) = new_app();
        assert!(app.items.is_empty());
        assert!(!app.quit);
        assert!(!app.loading);
        assert!(app.list_state.selected().is_none());
        assert_eq!(loads.load(Ordering::SeqCst), 0);
        assert_eq!(app.category(), "dogs");
    }

    // -- messages ------------------------------------------------------------

    #[test]
    fn loaded_replaces_items_and_selects_first() {
        let (mut app, _, _rx) = new_app();
        app.reload();
        app.handle(AppMsg::Loaded(sample_items()));

        assert!(!app.loading);
        assert_eq!(app.items.len(), 3);
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(app.status.contains("Loaded 3 dogs"));
    }

    #[test]
    fn reload_keeps_selection_within_bounds() {
        let (mut app, _, _rx) = new_app();
        app.handle(AppMsg::Loaded(sample_items()));
        app.select_last();

        app.handle(AppMsg::Loaded(vec![make_item("Pug", FavoriteAction::noop())]));
        assert_eq!(app.list_state.selected(), Some(0));

        app.handle(AppMsg::Loaded(Vec::new()));
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn load_failure_keeps_previous_items() {
        let (mut app, _, _rx) = new_app();
        app.handle(AppMsg::Loaded(sample_items()));
        app.reload();
        app.handle(AppMsg::LoadFailed(FetchError::DataNotFound));

        assert!(!app.loading);
        assert_eq!(app.items.len(), 3);
        assert!(app.status.contains("Error: data not found"));
    }

    #[test]
    fn save_messages_update_status() {
        let (mut app, _, _rx) = new_app();
        app.handle(AppMsg::Saved("favorite-dogs-1".into()));
        assert!(app.status.contains("Saved favorite-dogs-1"));

        app.handle(AppMsg::SaveFailed(FetchError::persist("favorite-dogs-1", "denied")));
        assert!(app.status.contains("Error: failed to persist"));
    }

    // -- actions -------------------------------------------------------------

    #[test]
    fn reload_is_ignored_while_loading() {
        let (mut app, loads, _rx) = new_app();
        app.reload();
        app.reload();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(app.loading);
    }

    #[test]
    fn favorite_runs_action_of_selected_item() {
        let (mut app, _, _rx) = new_app();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        app.handle(AppMsg::Loaded(vec![
            make_item("Husky", FavoriteAction::noop()),
            make_item(
                "Beagle",
                FavoriteAction::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            ),
        ]));

        app.favorite_selected();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        app.select_next();
        app.favorite_selected();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn favorite_with_nothing_selected_is_noop() {
        let (mut app, _, _rx) = new_app();
        app.favorite_selected();
        assert_eq!(app.status, "Starting…");
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn navigation_on_empty_is_noop() {
        let (mut app, _, _rx) = new_app();
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_clamps_at_last_item() {
        let (mut app, _, _rx) = new_app();
        app.handle(AppMsg::Loaded(sample_items()));

        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let (mut app, _, _rx) = new_app();
        app.handle(AppMsg::Loaded(sample_items()));

        app.select_last();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_first();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
