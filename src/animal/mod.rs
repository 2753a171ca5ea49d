//! Animal domain: wire records, view data, and the service that maps one to
//! the other.
//!
//! ## For contributors — adding a new animal payload
//!
//! 1. If the backend shape differs, add fields to `AnimalRecord` in `record.rs`
//!    (or a new record type next to it) with the serde attributes it needs.
//! 2. Extend the projection in `service.rs` so the new fields show up in
//!    [`AnimalViewData`]. Do not expose the record type to the UI.
//! 3. Point a [`RequestSource`](crate::request::RequestSource) at the new
//!    resource in `main.rs`.

mod record;
mod service;
mod view;

pub use service::{AnimalLoader, AnimalService};
pub use view::AnimalViewData;

#[cfg(test)]
pub use service::LoadCompletion;
#[cfg(test)]
pub use view::FavoriteAction;
