//! Presentation-side projection of an animal.
//!
//! `AnimalViewData` carries only what a screen shows plus a "mark as
//! favorite" action. No backend identifier or wire annotation reaches it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A zero-argument action attached to a view item.
#[derive(Clone)]
pub struct FavoriteAction(Arc<dyn Fn() + Send + Sync>);

impl FavoriteAction {
    pub fn new(action: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(action))
    }

    pub fn run(&self) {
        (self.0)()
    }
}

#[cfg(test)]
impl FavoriteAction {
    /// An action that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }
}

impl fmt::Debug for FavoriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FavoriteAction")
    }
}

#[derive(Debug, Clone)]
pub struct AnimalViewData {
    /// Headline: the animal's name, or its breed when unnamed.
    pub title: String,

    /// Secondary line, if there is anything left to say.
    pub subtitle: Option<String>,

    /// Shared with the favorite action, which sets it after a successful save.
    favorite: Arc<AtomicBool>,

    on_favorite: FavoriteAction,
}

impl AnimalViewData {
    pub fn new(
        title: impl Into<String>,
        subtitle: Option<String>,
        favorite: Arc<AtomicBool>,
        on_favorite: FavoriteAction,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle,
            favorite,
            on_favorite,
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite.load(Ordering::SeqCst)
    }

    /// Invoke the attached "mark as favorite" behavior.
    pub fn mark_favorite(&self) {
        self.on_favorite.run();
    }
}
